use crate::constants::GATEWAY_TIMEOUT;
use crate::constants::VALID_TOKEN;

/// A token presented for validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationRequest {
    /// Subject the token was issued for, typically a user GUID.
    pub subject_id: String,
    /// Raw `Authorization` header value, expected to carry a bearer token.
    pub bearer_token: String,
}

impl ValidationRequest {
    /// Create a new validation request.
    pub fn new(subject_id: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            bearer_token: bearer_token.into(),
        }
    }
}

/// Classified result of a single backend status check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackendOutcome {
    /// Whether the backend judged the token valid.
    pub valid: bool,
    /// Domain response code backing the judgement.
    pub reason: i64,
}

impl BackendOutcome {
    /// The backend confirmed the token.
    pub fn success() -> Self {
        Self {
            valid: true,
            reason: VALID_TOKEN,
        }
    }

    /// The backend rejected the token or could not classify it.
    pub fn failure(reason: i64) -> Self {
        Self {
            valid: false,
            reason,
        }
    }
}

/// Final decision of a validation round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// At least one backend confirmed the token.
    Admitted,
    /// The token was rejected with the given domain response code.
    Denied(i64),
    /// No decision was reached before the deadline.
    TimedOut,
}

impl GateDecision {
    /// Whether the request should be allowed through.
    pub fn is_admitted(&self) -> bool {
        matches!(self, GateDecision::Admitted)
    }

    /// Domain response code to report to the caller, `None` when admitted.
    pub fn reason_code(&self) -> Option<i64> {
        match self {
            GateDecision::Admitted => None,
            GateDecision::Denied(code) => Some(*code),
            GateDecision::TimedOut => Some(GATEWAY_TIMEOUT),
        }
    }
}
