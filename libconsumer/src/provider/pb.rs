//! Wire messages and client stub for the `provider.OCSProvider` service.
//!
//! `generated/provider.rs` is tonic-build output for `proto/provider.proto`,
//! checked in so a plain build needs no `protoc`. Building with
//! `LIBCONSUMER_REGENERATE_PROTO=1` rewrites it from the `.proto`.

include!("generated/provider.rs");

pub use ocs_provider_client::OcsProviderClient;

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::*;

    const PROTO: &str = include_str!("../../proto/provider.proto");
    const GENERATED: &str = include_str!("generated/provider.rs");

    #[test]
    fn generated_client_covers_every_rpc() {
        let rpcs: Vec<&str> = PROTO
            .lines()
            .filter_map(|line| line.trim().strip_prefix("rpc "))
            .filter_map(|rest| rest.split_whitespace().next())
            .collect();
        assert_eq!(
            rpcs,
            ["OnboardConsumer", "GetStorageConfig", "OffboardConsumer", "UpdateCapacity"]
        );
        for rpc in rpcs {
            let path = format!("\"/provider.OCSProvider/{rpc}\"");
            assert!(GENERATED.contains(&path), "{rpc} missing from generated client");
        }
    }

    #[test]
    fn external_resource_wire_layout() {
        let msg = StorageConfigResponse {
            external_resource: vec![ExternalResource {
                name: "rook-ceph-mon".into(),
                kind: "Secret".into(),
                data: br#"{"key":"value"}"#.to_vec(),
            }],
        };
        let bytes = msg.encode_to_vec();
        // field 1, length-delimited
        assert_eq!(bytes[0], 0x0a);
        let decoded = StorageConfigResponse::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn empty_offboard_response_encodes_to_nothing() {
        assert!(OffboardConsumerResponse {}.encode_to_vec().is_empty());
    }
}
