use bytes::Bytes;
use http::StatusCode;
use serde::Deserialize;

/// Normalized response envelope returned by platform calls.
///
/// The platform reports its own outcome through a `responseCode` field in
/// the JSON body, independently of the HTTP status line. Both are kept so
/// callers can branch on whichever layer they care about.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Domain code extracted from the body, `0` when none could be parsed.
    pub code: i64,
    /// The raw response body.
    pub body: Bytes,
}

impl ApiResponse {
    /// Build a response from a status line and body, extracting the domain
    /// code on the way.
    pub fn new(status: StatusCode, body: Bytes) -> Self {
        let code = parse_response_code(&body);
        Self { status, code, body }
    }

    /// Build a response from an `http::Response`.
    pub fn from_http(resp: http::Response<Bytes>) -> Self {
        let (parts, body) = resp.into_parts();
        Self::new(parts.status, body)
    }

    /// Whether the body carried no usable domain code.
    ///
    /// Raw responses are passed through as-is; callers that require a domain
    /// verdict treat them as failures.
    pub fn is_raw(&self) -> bool {
        self.code == 0
    }

    /// The body decoded as a string, lossily.
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "responseCode")]
    response_code: Option<ResponseCode>,
}

/// The platform is inconsistent about the JSON type of `responseCode`:
/// some deployments send `"1152"`, others send `1152`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ResponseCode {
    Text(String),
    Number(i64),
}

/// Extract the `responseCode` field from a JSON body.
///
/// Returns `0` for non-JSON bodies, bodies without the field, and values
/// that are neither an integer nor a numeric string.
fn parse_response_code(body: &[u8]) -> i64 {
    let Ok(envelope) = serde_json::from_slice::<Envelope>(body) else {
        return 0;
    };

    match envelope.response_code {
        Some(ResponseCode::Text(s)) => s.parse().unwrap_or(0),
        Some(ResponseCode::Number(n)) => n,
        None => 0,
    }
}
