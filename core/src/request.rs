use std::mem;
use std::str::FromStr;

use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;
use http::Uri;

use crate::{Error, Result};

/// Signing context for request.
///
/// The query string is kept verbatim. The signature covers its exact bytes,
/// so parsing it into pairs and reassembling would risk signing something
/// other than what goes on the wire.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path.
    pub path: String,
    /// Raw query string without the leading `?`, empty when absent.
    pub query: String,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq.query().unwrap_or_default().to_string(),

            // Headers move out without copying; apply moves them back.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        // Return headers back.
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme);
            uri_parts.authority = Some(self.authority);
            uri_parts.path_and_query = {
                let paq = if self.query.is_empty() {
                    self.path
                } else {
                    let mut s = self.path;
                    s.reserve(self.query.len() + 1);
                    s.push('?');
                    s.push_str(&self.query);
                    s
                };

                Some(PathAndQuery::from_str(&paq)?)
            };
            Uri::from_parts(uri_parts)?
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use http::Request;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parts_of(uri: &str) -> http::request::Parts {
        let (parts, _) = Request::get(uri).body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_build_splits_path_and_query() -> anyhow::Result<()> {
        let mut parts = parts_of("https://api.example.com/v1/users?applicationName=app&x=1");
        let req = SigningRequest::build(&mut parts)?;

        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path, "/v1/users");
        assert_eq!(req.query, "applicationName=app&x=1");
        Ok(())
    }

    #[test]
    fn test_build_keeps_query_encoding_verbatim() -> anyhow::Result<()> {
        let mut parts = parts_of("https://api.example.com/v1/users?name=a%20b&flag");
        let req = SigningRequest::build(&mut parts)?;

        assert_eq!(req.query, "name=a%20b&flag");
        Ok(())
    }

    #[test]
    fn test_build_defaults_empty_path() -> anyhow::Result<()> {
        let mut parts = parts_of("https://api.example.com");
        let req = SigningRequest::build(&mut parts)?;

        assert_eq!(req.path, "/");
        assert_eq!(req.query, "");
        Ok(())
    }

    #[test]
    fn test_build_rejects_missing_authority() {
        let (mut parts, _) = Request::get("/relative/only")
            .body(())
            .unwrap()
            .into_parts();

        assert!(SigningRequest::build(&mut parts).is_err());
    }

    #[test]
    fn test_apply_round_trips_uri() -> anyhow::Result<()> {
        let uri = "https://api.example.com/v1/users?name=a%20b&flag";
        let mut parts = parts_of(uri);

        let req = SigningRequest::build(&mut parts)?;
        req.apply(&mut parts)?;

        assert_eq!(parts.uri.to_string(), uri);
        Ok(())
    }

    #[test]
    fn test_apply_without_query() -> anyhow::Result<()> {
        let mut parts = parts_of("http://api.example.com/healthz");

        let req = SigningRequest::build(&mut parts)?;
        req.apply(&mut parts)?;

        assert_eq!(parts.uri.to_string(), "http://api.example.com/healthz");
        Ok(())
    }

    #[test]
    fn test_build_takes_headers() -> anyhow::Result<()> {
        let mut parts = parts_of("https://api.example.com/");
        parts.headers.insert("x-request-id", "42".parse()?);

        let req = SigningRequest::build(&mut parts)?;
        assert_eq!(req.headers.len(), 1);
        assert!(parts.headers.is_empty());
        Ok(())
    }
}
