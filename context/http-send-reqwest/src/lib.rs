//! HttpSend implementation backed by [`reqwest`].

use async_trait::async_trait;
use bytes::Bytes;
use dhpsign_core::{Error, HttpSend, Result};
use http_body_util::BodyExt;
use reqwest::{Client, Request};

/// Sends requests through a shared `reqwest::Client`.
///
/// The default construction uses a plain client. Pass a preconfigured one
/// via [`ReqwestHttpSend::new`] to control timeouts, proxies or TLS.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|err| Error::unexpected("failed to convert http request").with_source(err))?;
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|err| Error::unexpected("failed to send http request").with_source(err))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|err| Error::unexpected("failed to read response body").with_source(err))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}
