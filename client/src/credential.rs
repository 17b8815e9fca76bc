use std::fmt::{Debug, Formatter};

use dhpsign_core::{utils::Redact, SigningCredential};

/// Credential for the DHP platform.
#[derive(Clone)]
pub struct Credential {
    /// Shared key identifying the calling application. Sent verbatim in the
    /// `Authorization` header.
    pub shared_key: String,
    /// Secret key feeding the MAC chain. Never leaves the process.
    pub secret_key: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(shared_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            shared_key: shared_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("shared_key", &Redact::from(&self.shared_key))
            .field("secret_key", &Redact::from(&self.secret_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.shared_key.is_empty() && !self.secret_key.is_empty()
    }
}
