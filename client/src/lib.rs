//! Signing client for the DHP platform.
//!
//! Builds requests against one deployment, attaches the platform's chained
//! HMAC-SHA256 signature and normalizes the response envelope.

mod client;
pub use client::ApiClient;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::{
    ConfigCredentialProvider, DefaultCredentialProvider, EnvCredentialProvider,
};

mod sign_request;
pub use sign_request::RequestSigner;

mod signature;
pub use signature::Authorization;

mod token_status;

mod constants;
