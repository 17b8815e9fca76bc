use dhpsign_core::{Context, OsEnv};
use dhpsign_http_send_reqwest::ReqwestHttpSend;

/// Context wired with the reqwest HTTP client and the process environment.
///
/// This is the context most services want. Construct a [`Context`] by hand
/// to swap either part out, for instance in tests.
pub fn default_context() -> Context {
    Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}
