use std::sync::Arc;

use async_trait::async_trait;
use dhpsign_core::{Context, ProvideCredential, Result};

use crate::config::Config;
use crate::credential::Credential;

/// ConfigCredentialProvider loads the credential from explicit config,
/// falling back to the environment for fields the config leaves unset.
#[derive(Debug)]
pub struct ConfigCredentialProvider {
    config: Arc<Config>,
}

impl ConfigCredentialProvider {
    /// Create a new loader via config.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for ConfigCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let config = self.config.as_ref().clone().from_env(ctx);

        if let (Some(key), Some(secret)) = (&config.signing_key, &config.signing_secret) {
            return Ok(Some(Credential::new(key.clone(), secret.clone())));
        }

        Ok(None)
    }
}
