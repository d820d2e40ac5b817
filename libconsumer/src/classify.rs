//! Classification of provider RPC failures.
//!
//! [`classify`] maps an `(operation, status code)` pair onto a
//! [`Classification`]: either nothing to report, an advisory for the
//! operator, or a transient condition that should be retried later.  The
//! mapping is a flat lookup table; combinations absent from it propagate the
//! raw error without an advisory.

use std::fmt;
use std::time::Duration;

use tonic::Code;

use crate::event::EventType;

/// Delay requested when the provider reports the consumer is not ready yet.
pub const NOT_READY_REQUEUE: Duration = Duration::from_secs(5);

/// The four provider RPCs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    OnboardConsumer,
    OffboardConsumer,
    UpdateCapacity,
    GetStorageConfig,
}

impl Operation {
    /// RPC method name as it appears on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OnboardConsumer => "OnboardConsumer",
            Self::OffboardConsumer => "OffboardConsumer",
            Self::UpdateCapacity => "UpdateCapacity",
            Self::GetStorageConfig => "GetStorageConfig",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable notification attached to a classified failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advisory {
    /// Event type reported to the sink.
    pub event_type: EventType,
    /// Short machine-friendly reason, e.g. `"TokenInvalid"`.
    pub reason: &'static str,
    /// Remediation hint for the operator.
    pub message: &'static str,
}

/// Outcome of classifying an RPC failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Unmapped combination: propagate the error, report nothing.
    NoAdvisory,
    /// Fatal for this pass: report the advisory and propagate the error.
    Advisory(Advisory),
    /// Transient and benign: report the advisory, retry after `delay`.
    Retry { advisory: Advisory, delay: Duration },
}

impl Classification {
    /// The advisory to emit, if any.
    pub fn advisory(&self) -> Option<&Advisory> {
        match self {
            Self::NoAdvisory => None,
            Self::Advisory(a) | Self::Retry { advisory: a, .. } => Some(a),
        }
    }
}

enum Rule {
    Warn(&'static str, &'static str),
    NotReady(&'static str, &'static str),
}

const UID_INVALID: Rule = Rule::Warn(
    "UIDInvalid",
    "StorageConsumer UID is not valid. Contact the provider admin",
);
const UID_NOT_FOUND: Rule = Rule::Warn(
    "UIDNotFound",
    "StorageConsumer UID not found. Contact the provider admin",
);

const RULES: &[(Operation, Code, Rule)] = &[
    (
        Operation::OnboardConsumer,
        Code::InvalidArgument,
        Rule::Warn(
            "TokenInvalid",
            "Token is invalid. Verify the token again or contact the provider admin",
        ),
    ),
    (
        Operation::OnboardConsumer,
        Code::AlreadyExists,
        Rule::Warn(
            "TokenAlreadyUsed",
            "Token is already used. Contact provider admin for a new token",
        ),
    ),
    (Operation::OffboardConsumer, Code::InvalidArgument, UID_INVALID),
    (
        Operation::UpdateCapacity,
        Code::InvalidArgument,
        Rule::Warn(
            "UIDorCapacityInvalid",
            "StorageConsumer UID or requested capacity is not valid. Contact the provider admin",
        ),
    ),
    (Operation::UpdateCapacity, Code::NotFound, UID_NOT_FOUND),
    (Operation::GetStorageConfig, Code::InvalidArgument, UID_INVALID),
    (Operation::GetStorageConfig, Code::NotFound, UID_NOT_FOUND),
    (
        Operation::GetStorageConfig,
        Code::Unavailable,
        Rule::NotReady(
            "NotReady",
            "StorageConsumer is not ready yet. Will requeue after 5 second",
        ),
    ),
];

/// Classify a failed `operation` that returned `code`.
pub fn classify(operation: Operation, code: Code) -> Classification {
    let Some((_, _, rule)) = RULES
        .iter()
        .find(|(op, c, _)| *op == operation && *c == code)
    else {
        return Classification::NoAdvisory;
    };

    match *rule {
        Rule::Warn(reason, message) => Classification::Advisory(Advisory {
            event_type: EventType::Warning,
            reason,
            message,
        }),
        Rule::NotReady(reason, message) => Classification::Retry {
            advisory: Advisory {
                event_type: EventType::Normal,
                reason,
                message,
            },
            delay: NOT_READY_REQUEUE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(op: Operation, code: Code) -> Option<&'static str> {
        classify(op, code).advisory().map(|a| a.reason)
    }

    #[test]
    fn onboard_token_errors() {
        assert_eq!(
            reason(Operation::OnboardConsumer, Code::InvalidArgument),
            Some("TokenInvalid")
        );
        assert_eq!(
            reason(Operation::OnboardConsumer, Code::AlreadyExists),
            Some("TokenAlreadyUsed")
        );
    }

    #[test]
    fn uid_errors_are_warnings() {
        for (op, code, expected) in [
            (Operation::OffboardConsumer, Code::InvalidArgument, "UIDInvalid"),
            (Operation::UpdateCapacity, Code::InvalidArgument, "UIDorCapacityInvalid"),
            (Operation::UpdateCapacity, Code::NotFound, "UIDNotFound"),
            (Operation::GetStorageConfig, Code::InvalidArgument, "UIDInvalid"),
            (Operation::GetStorageConfig, Code::NotFound, "UIDNotFound"),
        ] {
            let Classification::Advisory(advisory) = classify(op, code) else {
                panic!("{op}/{code:?} should produce an advisory");
            };
            assert_eq!(advisory.event_type, EventType::Warning);
            assert_eq!(advisory.reason, expected);
        }
    }

    #[test]
    fn unavailable_config_is_retried() {
        match classify(Operation::GetStorageConfig, Code::Unavailable) {
            Classification::Retry { advisory, delay } => {
                assert_eq!(delay, Duration::from_secs(5));
                assert_eq!(advisory.event_type, EventType::Normal);
                assert_eq!(advisory.reason, "NotReady");
            }
            other => panic!("unexpected classification {other:?}"),
        }
    }

    #[test]
    fn unmapped_combinations_have_no_advisory() {
        assert_eq!(
            classify(Operation::OnboardConsumer, Code::Unavailable),
            Classification::NoAdvisory
        );
        assert_eq!(
            classify(Operation::OffboardConsumer, Code::NotFound),
            Classification::NoAdvisory
        );
        assert_eq!(
            classify(Operation::UpdateCapacity, Code::Internal),
            Classification::NoAdvisory
        );
    }
}
