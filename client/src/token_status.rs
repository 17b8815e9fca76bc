use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method};

use dhpsign_core::{ApiResponse, Error, Result, TokenStatus};

use crate::client::ApiClient;
use crate::constants::ACCESS_TOKEN;

#[async_trait]
impl TokenStatus for ApiClient {
    /// Ask the deployment whether `access_token` is currently valid for the
    /// subject.
    ///
    /// Issues a signed `GET /authentication/users/{subject_id}/tokenStatus`
    /// with the token in the `AccessToken` header and the configured
    /// application name as query. The response envelope is returned as-is.
    async fn token_status(&self, subject_id: &str, access_token: &str) -> Result<ApiResponse> {
        let application_name = self.application_name().ok_or_else(|| {
            Error::config_invalid("application name must be configured for token status checks")
        })?;

        let endpoint = format!("/authentication/users/{subject_id}/tokenStatus");
        let query = format!("applicationName={application_name}");

        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(access_token)?;
        token.set_sensitive(true);
        headers.insert(ACCESS_TOKEN, token);

        self.send_signed(Method::GET, &endpoint, &query, headers, Bytes::new())
            .await
    }
}
