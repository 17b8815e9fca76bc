use std::fmt::{Debug, Formatter};

use super::constants::*;
use dhpsign_core::{utils::Redact, Context};

/// Config carries all the configuration for the DHP client.
#[derive(Clone, Default)]
pub struct Config {
    /// `api_base_url` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `DHP_API_BASE_URL`
    pub api_base_url: Option<String>,
    /// `application_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `DHP_APPLICATION_NAME`
    pub application_name: Option<String>,
    /// `signing_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `DHP_SIGNING_KEY`
    pub signing_key: Option<String>,
    /// `signing_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `DHP_SIGNING_SECRET`
    pub signing_secret: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set api_base_url
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = Some(api_base_url.into());
        self
    }

    /// Set application_name
    pub fn with_application_name(mut self, application_name: impl Into<String>) -> Self {
        self.application_name = Some(application_name.into());
        self
    }

    /// Set signing_key
    pub fn with_signing_key(mut self, signing_key: impl Into<String>) -> Self {
        self.signing_key = Some(signing_key.into());
        self
    }

    /// Set signing_secret
    pub fn with_signing_secret(mut self, signing_secret: impl Into<String>) -> Self {
        self.signing_secret = Some(signing_secret.into());
        self
    }

    /// Load config from env.
    ///
    /// Explicitly set fields win over the environment.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(DHP_API_BASE_URL) {
            self.api_base_url.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(DHP_APPLICATION_NAME) {
            self.application_name.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(DHP_SIGNING_KEY) {
            self.signing_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(DHP_SIGNING_SECRET) {
            self.signing_secret.get_or_insert(v);
        }

        self
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url)
            .field("application_name", &self.application_name)
            .field("signing_key", &self.signing_key.as_ref().map(Redact::from))
            .field(
                "signing_secret",
                &self.signing_secret.as_ref().map(Redact::from),
            )
            .finish()
    }
}
