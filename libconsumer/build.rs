//! Refreshes the checked-in gRPC stubs from `proto/provider.proto`.

const PROTO: &str = "proto/provider.proto";
const REGENERATE: &str = "LIBCONSUMER_REGENERATE_PROTO";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed={PROTO}");
    println!("cargo:rerun-if-env-changed={REGENERATE}");

    // Needs protoc on PATH, so only on request.
    if std::env::var_os(REGENERATE).is_none() {
        return Ok(());
    }

    tonic_build::configure()
        .build_server(false)
        .out_dir("src/provider/generated")
        .compile_protos(&[PROTO], &["proto"])?;
    Ok(())
}
