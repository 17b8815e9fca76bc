use async_trait::async_trait;
use http::header::{self, HeaderValue};
use http::request::Parts;
use http::HeaderMap;
use log::debug;

use dhpsign_core::hash::{base64_hmac_sha256, hmac_sha256};
use dhpsign_core::time::{format_signed_date, now, DateTime};
use dhpsign_core::{Context, Error, Result, SignRequest, SigningRequest};

use crate::constants::{SECRET_KEY_PREFIX, SIGNED_DATE, SIGNED_DATE_LOWER};
use crate::{Authorization, Credential};

/// RequestSigner implementing the platform's chained HMAC-SHA256 scheme.
///
/// The signature covers the method, the raw query string, the body, every
/// header present at signing time and the url path, in that order. A
/// `SignedDate` header is injected first when the request carries none, so
/// the timestamp is always part of the signature.
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new RequestSigner.
    pub fn new() -> Self {
        Self { time: None }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
        body: &[u8],
    ) -> Result<()> {
        let cred = credential
            .ok_or_else(|| Error::credential_invalid("no signing credential available"))?;
        let now = self.time.unwrap_or_else(now);

        let mut signed_req = SigningRequest::build(req)?;

        // The timestamp must be in place before canonicalization so the
        // signature covers it.
        if signed_req.headers.get(SIGNED_DATE_LOWER).is_none() {
            signed_req.headers.insert(
                SIGNED_DATE_LOWER,
                HeaderValue::try_from(format_signed_date(now))?,
            );
        }

        let authorization = sign_context(cred, &signed_req, body)?;

        let mut value: HeaderValue = authorization.to_string().parse()?;
        value.set_sensitive(true);
        signed_req.headers.insert(header::AUTHORIZATION, value);

        // Apply to the request.
        signed_req.apply(req)
    }
}

/// Produce the `Authorization` value for one signing context.
fn sign_context(cred: &Credential, req: &SigningRequest, body: &[u8]) -> Result<Authorization> {
    let canonical_headers = canonical_header_string(&req.headers)?;
    debug!("canonical header string: {canonical_headers}");

    let chained = chain_signing_key(
        &cred.secret_key,
        req.method.as_str(),
        &req.query,
        body,
        &canonical_headers,
    );
    let signature = base64_hmac_sha256(&chained, req.path.as_bytes());

    let signed_headers = signed_header_names(&req.headers)
        .into_iter()
        .map(String::from)
        .collect();

    Ok(Authorization::new(
        cred.shared_key.clone(),
        signed_headers,
        signature,
    ))
}

/// Fold the request pieces into the MAC chain, each digest keying the next.
///
/// The root key is the raw bytes of the prefixed secret, not a digest of
/// them.
fn chain_signing_key(
    secret_key: &str,
    method: &str,
    query: &str,
    body: &[u8],
    canonical_headers: &str,
) -> Vec<u8> {
    let k_secret = [SECRET_KEY_PREFIX.as_bytes(), secret_key.as_bytes()].concat();
    let k_method = hmac_sha256(&k_secret, method.as_bytes());
    let k_query = hmac_sha256(&k_method, query.as_bytes());
    let k_body = hmac_sha256(&k_query, body);

    hmac_sha256(&k_body, canonical_headers.as_bytes())
}

/// Canonical header string: `name:value` entries sorted by stored name,
/// every entry terminated by `;`.
///
/// Only the first value of a repeated header is folded in.
fn canonical_header_string(headers: &HeaderMap) -> Result<String> {
    let mut entries = Vec::with_capacity(headers.len());
    for name in sorted_header_names(headers) {
        let value = headers[name].to_str()?;
        entries.push(format!("{}:{}", display_header_name(name), value));
    }

    Ok(format!("{};", entries.join(";")))
}

/// Display names of the signed headers, in canonical order.
fn signed_header_names(headers: &HeaderMap) -> Vec<&str> {
    sorted_header_names(headers)
        .into_iter()
        .map(display_header_name)
        .collect()
}

fn sorted_header_names(headers: &HeaderMap) -> Vec<&str> {
    let mut names = headers.keys().map(|k| k.as_str()).collect::<Vec<&str>>();
    names.sort_unstable();

    names
}

/// The signed timestamp header keeps its mixed-case spelling on display,
/// every other name is rendered as stored.
fn display_header_name(name: &str) -> &str {
    if name == SIGNED_DATE_LOWER {
        SIGNED_DATE
    } else {
        name
    }
}
