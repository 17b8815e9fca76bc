use std::fmt::{self, Display, Formatter};

use crate::constants::ALGORITHM_NAME;

/// Value of the `Authorization` header produced by the signer.
///
/// Renders as:
///
/// ```text
/// HmacSHA256;Credential:<shared_key>;SignedHeaders:<h1,h2>;Signature:<base64>
/// ```
///
/// The signed header names are the display names of every header covered by
/// the signature, in the order they were folded into the MAC chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    algorithm: &'static str,
    credential: String,
    signed_headers: Vec<String>,
    signature: String,
}

impl Authorization {
    pub(crate) fn new(credential: String, signed_headers: Vec<String>, signature: String) -> Self {
        Self {
            algorithm: ALGORITHM_NAME,
            credential,
            signed_headers,
            signature,
        }
    }

    /// The fixed algorithm label.
    pub fn algorithm(&self) -> &str {
        self.algorithm
    }

    /// The shared key of the signing credential.
    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// Display names of the headers covered by the signature.
    pub fn signed_headers(&self) -> &[String] {
        &self.signed_headers
    }

    /// The base64 encoded MAC.
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

impl Display for Authorization {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{};Credential:{};SignedHeaders:", self.algorithm, self.credential)?;
        for (i, name) in self.signed_headers.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(name)?;
        }
        write!(f, ";Signature:{}", self.signature)
    }
}
