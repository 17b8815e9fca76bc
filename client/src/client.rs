use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::uri::{Authority, Scheme};
use http::{HeaderMap, HeaderValue, Method, Request, Uri};
use log::debug;

use dhpsign_core::{ApiResponse, Context, Error, Result, Signer};

use crate::provide_credential::DefaultCredentialProvider;
use crate::sign_request::RequestSigner;
use crate::{Config, Credential};

/// ApiClient issues requests against one platform deployment.
///
/// The deployment is addressed by the configured base url; the path of the
/// base url is dropped, endpoints are always absolute. Requests default to
/// JSON content negotiation and can be sent either plain or signed.
#[derive(Clone, Debug)]
pub struct ApiClient {
    ctx: Context,
    scheme: Scheme,
    authority: Authority,
    application_name: Option<String>,
    signer: Signer<Credential>,
}

impl ApiClient {
    /// Create a new ApiClient from config.
    ///
    /// Unset config fields are filled from the environment. The base url
    /// must be absolute; everything else is validated lazily.
    pub fn new(ctx: Context, config: Config) -> Result<Self> {
        let config = config.from_env(&ctx);

        let base_url = config
            .api_base_url
            .clone()
            .ok_or_else(|| Error::config_invalid("api base url must be provided"))?;
        let parsed: Uri = base_url
            .parse()
            .map_err(|err| Error::config_invalid(format!("invalid api base url: {err}")))?;
        let (Some(scheme), Some(authority)) = (parsed.scheme(), parsed.authority()) else {
            return Err(Error::config_invalid(format!(
                "api base url must be absolute: {base_url}"
            )));
        };

        let scheme = scheme.clone();
        let authority = authority.clone();
        let application_name = config.application_name.clone();
        let signer = Signer::new(
            ctx.clone(),
            DefaultCredentialProvider::new(config),
            RequestSigner::new(),
        );

        Ok(Self {
            ctx,
            scheme,
            authority,
            application_name,
            signer,
        })
    }

    /// The application name this client was configured with, if any.
    pub fn application_name(&self) -> Option<&str> {
        self.application_name.as_deref()
    }

    /// Send a request without signing it.
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        query: &str,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<ApiResponse> {
        let req = self.build_request(method, endpoint, query, headers, body)?;
        self.dispatch(req).await
    }

    /// Send a request with the platform signature attached.
    pub async fn send_signed(
        &self,
        method: Method,
        endpoint: &str,
        query: &str,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<ApiResponse> {
        let req = self.build_request(method, endpoint, query, headers, body)?;

        let (mut parts, body) = req.into_parts();
        self.signer.sign(&mut parts, &body).await?;

        self.dispatch(Request::from_parts(parts, body)).await
    }

    fn build_request(
        &self,
        method: Method,
        endpoint: &str,
        query: &str,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Request<Bytes>> {
        let uri = self.build_uri(endpoint, query)?;

        let mut req = Request::builder().method(method).uri(uri).body(body)?;
        *req.headers_mut() = headers;

        let headers = req.headers_mut();
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if !headers.contains_key(ACCEPT) {
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        }

        Ok(req)
    }

    fn build_uri(&self, endpoint: &str, query: &str) -> Result<Uri> {
        let path_and_query = if query.is_empty() {
            endpoint.to_string()
        } else {
            format!("{endpoint}?{query}")
        };

        Ok(Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()?)
    }

    async fn dispatch(&self, req: Request<Bytes>) -> Result<ApiResponse> {
        debug!("sending {} {}", req.method(), req.uri());

        let resp = ApiResponse::from_http(self.ctx.http_send(req).await?);
        debug!(
            "received http status {}, domain code {}",
            resp.status, resp.code
        );

        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use dhpsign_core::HttpSend;
    use http::header::AUTHORIZATION;
    use http::StatusCode;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::constants::SIGNED_DATE_LOWER;

    /// Test transport that records every request and answers with a canned
    /// response.
    #[derive(Debug, Clone)]
    struct MockHttpSend {
        status: StatusCode,
        body: Bytes,
        seen: Arc<Mutex<Vec<Request<Bytes>>>>,
    }

    impl MockHttpSend {
        fn respond(status: StatusCode, body: &'static [u8]) -> Self {
            Self {
                status,
                body: Bytes::from_static(body),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn last_request(&self) -> Request<Bytes> {
            let mut seen = self.seen.lock().unwrap();
            seen.pop().expect("a request must have been sent")
        }
    }

    #[async_trait]
    impl HttpSend for MockHttpSend {
        async fn http_send(&self, req: Request<Bytes>) -> dhpsign_core::Result<http::Response<Bytes>> {
            self.seen.lock().unwrap().push(req);

            Ok(http::Response::builder()
                .status(self.status)
                .body(self.body.clone())
                .unwrap())
        }
    }

    fn test_client(mock: MockHttpSend) -> ApiClient {
        let ctx = Context::new().with_http_send(mock);
        let config = Config::new()
            .with_api_base_url("https://api.example.com")
            .with_application_name("myapp")
            .with_signing_key("test_shared_key")
            .with_signing_secret("test_secret_key");

        ApiClient::new(ctx, config).expect("client must build")
    }

    #[test]
    fn test_new_requires_base_url() {
        let err = ApiClient::new(Context::new(), Config::new())
            .expect_err("client without base url must not build");

        assert_eq!(err.kind(), dhpsign_core::ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_new_rejects_relative_base_url() {
        let config = Config::new().with_api_base_url("/just/a/path");
        let err = ApiClient::new(Context::new(), config)
            .expect_err("client with relative base url must not build");

        assert_eq!(err.kind(), dhpsign_core::ErrorKind::ConfigInvalid);
    }

    #[tokio::test]
    async fn test_send_builds_uri_and_default_headers() -> anyhow::Result<()> {
        let mock = MockHttpSend::respond(StatusCode::OK, br#"{"responseCode":"1152"}"#);
        let client = test_client(mock.clone());

        let resp = client
            .send(Method::GET, "/v1/ping", "", HeaderMap::new(), Bytes::new())
            .await?;

        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.code, 1152);

        let sent = mock.last_request();
        assert_eq!(sent.method(), Method::GET);
        assert_eq!(sent.uri().to_string(), "https://api.example.com/v1/ping");
        assert_eq!(sent.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(sent.headers().get(ACCEPT).unwrap(), "application/json");
        assert!(sent.headers().get(AUTHORIZATION).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_send_appends_query() -> anyhow::Result<()> {
        let mock = MockHttpSend::respond(StatusCode::OK, br#"{"responseCode":"1152"}"#);
        let client = test_client(mock.clone());

        client
            .send(
                Method::GET,
                "/v1/users",
                "applicationName=myapp&page=2",
                HeaderMap::new(),
                Bytes::new(),
            )
            .await?;

        assert_eq!(
            mock.last_request().uri().to_string(),
            "https://api.example.com/v1/users?applicationName=myapp&page=2"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_send_keeps_caller_headers() -> anyhow::Result<()> {
        let mock = MockHttpSend::respond(StatusCode::OK, br#"{"responseCode":"1152"}"#);
        let client = test_client(mock.clone());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "text/plain".parse()?);

        client
            .send(
                Method::POST,
                "/v1/notes",
                "",
                headers,
                Bytes::from_static(b"hello"),
            )
            .await?;

        let sent = mock.last_request();
        assert_eq!(sent.headers().get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(sent.body().as_ref(), b"hello");
        Ok(())
    }

    #[tokio::test]
    async fn test_base_url_path_is_dropped() -> anyhow::Result<()> {
        let mock = MockHttpSend::respond(StatusCode::OK, br#"{"responseCode":"1152"}"#);
        let ctx = Context::new().with_http_send(mock.clone());
        let config = Config::new().with_api_base_url("https://api.example.com/stale/prefix");
        let client = ApiClient::new(ctx, config)?;

        client
            .send(Method::GET, "/v1/ping", "", HeaderMap::new(), Bytes::new())
            .await?;

        assert_eq!(
            mock.last_request().uri().to_string(),
            "https://api.example.com/v1/ping"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_send_signed_attaches_signature() -> anyhow::Result<()> {
        let mock = MockHttpSend::respond(StatusCode::OK, br#"{"responseCode":"1152"}"#);
        let client = test_client(mock.clone());

        client
            .send_signed(Method::GET, "/v1/ping", "", HeaderMap::new(), Bytes::new())
            .await?;

        let sent = mock.last_request();
        let auth = sent.headers().get(AUTHORIZATION).unwrap().to_str()?;
        assert!(auth.starts_with("HmacSHA256;Credential:test_shared_key;SignedHeaders:"));
        assert!(sent.headers().get(SIGNED_DATE_LOWER).is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_send_signed_without_credential_fails() {
        let mock = MockHttpSend::respond(StatusCode::OK, b"{}");
        let ctx = Context::new().with_http_send(mock);
        let config = Config::new().with_api_base_url("https://api.example.com");
        let client = ApiClient::new(ctx, config).expect("client must build");

        let err = client
            .send_signed(Method::GET, "/v1/ping", "", HeaderMap::new(), Bytes::new())
            .await
            .expect_err("signing without credential must fail");

        assert_eq!(err.kind(), dhpsign_core::ErrorKind::CredentialInvalid);
    }

    #[tokio::test]
    async fn test_send_surfaces_transport_errors() {
        let ctx = Context::new();
        let config = Config::new().with_api_base_url("https://api.example.com");
        let client = ApiClient::new(ctx, config).expect("client must build");

        let err = client
            .send(Method::GET, "/v1/ping", "", HeaderMap::new(), Bytes::new())
            .await
            .expect_err("noop transport must fail");

        assert_eq!(err.kind(), dhpsign_core::ErrorKind::Unexpected);
    }
}
