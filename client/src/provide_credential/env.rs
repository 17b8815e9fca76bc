use async_trait::async_trait;
use dhpsign_core::{Context, ProvideCredential, Result};

use crate::{constants::*, Credential};

/// EnvCredentialProvider loads the signing credential from environment
/// variables.
///
/// This provider looks for the following environment variables:
/// - `DHP_SIGNING_KEY`: The shared key identifying the application
/// - `DHP_SIGNING_SECRET`: The secret key feeding the MAC chain
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        match (envs.get(DHP_SIGNING_KEY), envs.get(DHP_SIGNING_SECRET)) {
            (Some(key), Some(secret)) => Ok(Some(Credential::new(key.clone(), secret.clone()))),
            _ => Ok(None),
        }
    }
}
