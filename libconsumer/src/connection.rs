//! Connection string handling.
//!
//! The provider admin hands out a connection string: standard base64 of a
//! JSON object `{"onboardingTicket": "...", "serverAddress": "host:port"}`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ConsumerError;
use crate::types::ConnectionDetails;

/// Reason attached to the advisory emitted for an unusable connection string.
pub const INVALID_REASON: &str = "Invalid";
/// Message attached to the advisory emitted for an unusable connection string.
pub const INVALID_MESSAGE: &str = "ConnectionString is Invalid";

/// Decode a connection string into its ticket and provider address.
pub fn decode_connection_string(connection_string: &str) -> Result<ConnectionDetails, ConsumerError> {
    let raw = STANDARD.decode(connection_string)?;
    serde_json::from_slice(&raw).map_err(ConsumerError::Parse)
}

/// Build the connection string for `details`.
pub fn encode_connection_string(details: &ConnectionDetails) -> String {
    let json = serde_json::to_vec(details).unwrap_or_default();
    STANDARD.encode(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_provider_blob() {
        let blob = STANDARD.encode(r#"{"onboardingTicket":"tok1","serverAddress":"prov:50051"}"#);
        let details = decode_connection_string(&blob).unwrap();
        assert_eq!(details.onboarding_ticket, "tok1");
        assert_eq!(details.server_address, "prov:50051");
    }

    #[test]
    fn encode_then_decode_preserves_details() {
        for (ticket, address) in [
            ("tok1", "prov:50051"),
            ("", ""),
            ("eyJhbGciOi.x/y+z==", "[fd00::1]:443"),
            ("ticket with \"quotes\" and ünïcode", "provider.example.com:31659"),
        ] {
            let details = ConnectionDetails {
                onboarding_ticket: ticket.into(),
                server_address: address.into(),
            };
            let decoded = decode_connection_string(&encode_connection_string(&details)).unwrap();
            assert_eq!(decoded, details);
        }
    }

    #[test]
    fn rejects_non_base64() {
        let err = decode_connection_string("not base64!!").unwrap_err();
        assert!(matches!(err, ConsumerError::Decode(_)));
        assert!(err.is_configuration());
    }

    #[test]
    fn rejects_bad_json_and_missing_keys() {
        let not_json = STANDARD.encode("hello");
        assert!(matches!(
            decode_connection_string(&not_json),
            Err(ConsumerError::Parse(_))
        ));

        let missing = STANDARD.encode(r#"{"serverAddress":"prov:50051"}"#);
        assert!(matches!(
            decode_connection_string(&missing),
            Err(ConsumerError::Parse(_))
        ));
    }
}
