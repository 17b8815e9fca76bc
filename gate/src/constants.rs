//! Domain response codes shared with the platform.
//!
//! The numeric values are part of the wire contract and must not be
//! renumbered.

use std::time::Duration;

/// Token is valid.
pub const VALID_TOKEN: i64 = 1152;
/// Token has expired. Terminal: no other backend can contradict it.
pub const TOKEN_EXPIRED: i64 = 1008;
/// Token is invalid. Terminal: no other backend can contradict it.
pub const TOKEN_INVALID: i64 = 1009;
/// Subject id missing or empty. Rejected before any backend call.
pub const INVALID_USER_ID: i64 = 1004;
/// Access token missing or not a bearer token. Rejected before any backend call.
pub const ACCESS_TOKEN_REQUIRED: i64 = 1251;
/// Backend response could not be classified. Soft: other backends may still admit.
pub const VALIDATION_ERRORS: i64 = 1254;
/// The gate's own deadline elapsed before a decision.
pub const GATEWAY_TIMEOUT: i64 = 504;

/// Overall deadline for a validation round across all backends.
pub const DEFAULT_VALIDATION_TIMEOUT: Duration = Duration::from_secs(30);
