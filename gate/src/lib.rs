//! Concurrent token validation for DHP platform services.
//!
//! A [`TokenGate`] fans one status check out over several identity backends
//! and admits a request as soon as any one of them confirms the token.
//! Denials are reported with the platform's domain response codes, see
//! [`constants`].

pub mod constants;

mod gate;
pub use gate::TokenGate;

mod outcome;
pub use outcome::BackendOutcome;
pub use outcome::GateDecision;
pub use outcome::ValidationRequest;

mod response;
pub use response::describe_code;
pub use response::ErrorResponse;
