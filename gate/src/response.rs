use http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

use crate::constants::{
    ACCESS_TOKEN_REQUIRED, GATEWAY_TIMEOUT, INVALID_USER_ID, TOKEN_EXPIRED, TOKEN_INVALID,
    VALIDATION_ERRORS, VALID_TOKEN,
};
use crate::outcome::GateDecision;

/// Body returned to the caller for every denial path.
///
/// `error_code` is the domain response code rendered as a string, which is
/// how the platform spells it on the wire.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Fresh id to correlate this denial with server logs.
    pub incident_id: Uuid,
    /// Domain response code as a decimal string.
    pub error_code: String,
    /// Short human readable form of the code.
    pub description: String,
}

impl ErrorResponse {
    /// Build a response for the given domain response code.
    pub fn new(code: i64) -> Self {
        Self {
            incident_id: Uuid::new_v4(),
            error_code: code.to_string(),
            description: describe_code(code).to_string(),
        }
    }

    /// Build a response for a gate decision, `None` when the decision admits.
    pub fn from_decision(decision: GateDecision) -> Option<Self> {
        decision.reason_code().map(Self::new)
    }

    /// HTTP status every denial is reported with.
    pub fn http_status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

/// Human readable form of a domain response code.
pub fn describe_code(code: i64) -> &'static str {
    match code {
        VALID_TOKEN => "Token is valid",
        TOKEN_EXPIRED => "Token has expired",
        TOKEN_INVALID => "Token is invalid",
        INVALID_USER_ID => "Invalid user id",
        ACCESS_TOKEN_REQUIRED => "Access token required",
        VALIDATION_ERRORS => "Validation failed",
        GATEWAY_TIMEOUT => "Gateway timeout",
        _ => "Unknown response code",
    }
}
