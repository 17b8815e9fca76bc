use std::sync::Arc;
use std::time::Duration;

use dhpsign_core::TokenStatus;
use log::debug;
use log::warn;
use tokio::sync::mpsc;

use crate::constants::{
    ACCESS_TOKEN_REQUIRED, DEFAULT_VALIDATION_TIMEOUT, INVALID_USER_ID, TOKEN_EXPIRED,
    TOKEN_INVALID, VALIDATION_ERRORS, VALID_TOKEN,
};
use crate::outcome::{BackendOutcome, GateDecision, ValidationRequest};

/// Scheme marker expected at the front of the token, matched case
/// insensitively.
const BEARER_MARKER: &str = "bearer ";

/// Validates bearer tokens against one or more independent backends.
///
/// Backends usually stand for redundant or sharded identity deployments.
/// One authoritative "yes" admits the token, an authoritative "no" (expired
/// or invalid) denies it immediately, and everything else is treated as
/// backend local noise that only counts once every backend has reported.
///
/// ```no_run
/// use std::sync::Arc;
///
/// use dhpsign_gate::{TokenGate, ValidationRequest};
/// # async fn example(primary: Arc<dyn dhpsign_core::TokenStatus>) {
/// let gate = TokenGate::new(vec![primary]);
/// let decision = gate
///     .validate(&ValidationRequest::new("user-guid", "Bearer token"))
///     .await;
/// if !decision.is_admitted() {
///     // reject the caller with decision.reason_code()
/// }
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct TokenGate {
    backends: Vec<Arc<dyn TokenStatus>>,
    timeout: Duration,
}

impl TokenGate {
    /// Create a gate over the given backends with the default deadline.
    pub fn new(backends: Vec<Arc<dyn TokenStatus>>) -> Self {
        Self {
            backends,
            timeout: DEFAULT_VALIDATION_TIMEOUT,
        }
    }

    /// Overall deadline for one validation round.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Decide whether the presented token admits the subject.
    ///
    /// Malformed input is rejected before any backend is contacted. One
    /// status check per backend runs concurrently afterwards, and outcomes
    /// are applied in arrival order. Backends still in flight when a
    /// decision falls are left to finish on their own, their results are
    /// discarded.
    pub async fn validate(&self, request: &ValidationRequest) -> GateDecision {
        if request.subject_id.is_empty() {
            debug!("validation rejected: empty subject id");
            return GateDecision::Denied(INVALID_USER_ID);
        }
        let Some(token) = extract_bearer_token(&request.bearer_token) else {
            debug!("validation rejected: missing or malformed bearer token");
            return GateDecision::Denied(ACCESS_TOKEN_REQUIRED);
        };

        let (tx, mut rx) = mpsc::channel(self.backends.len().max(1));
        for backend in &self.backends {
            let backend = backend.clone();
            let tx = tx.clone();
            let subject_id = request.subject_id.to_string();
            let token = token.to_string();
            tokio::spawn(async move {
                let outcome = check_backend(backend.as_ref(), &subject_id, &token).await;
                // The receiver is gone once an earlier outcome decided.
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        let deadline = tokio::time::sleep(self.timeout);
        tokio::pin!(deadline);

        let mut reported = 0;
        loop {
            tokio::select! {
                Some(outcome) = rx.recv() => {
                    if outcome.valid {
                        return GateDecision::Admitted;
                    }
                    reported += 1;
                    if reported >= self.backends.len() {
                        return GateDecision::Denied(outcome.reason);
                    }
                    if outcome.reason == TOKEN_EXPIRED || outcome.reason == TOKEN_INVALID {
                        return GateDecision::Denied(outcome.reason);
                    }
                }
                _ = &mut deadline => {
                    warn!("token validation timed out after {:?}", self.timeout);
                    return GateDecision::TimedOut;
                }
            }
        }
    }
}

/// Run one status check and classify the response.
///
/// Transport failures and unparseable bodies are soft failures so that a
/// healthy backend can still admit the token.
async fn check_backend(
    backend: &dyn TokenStatus,
    subject_id: &str,
    access_token: &str,
) -> BackendOutcome {
    let response = match backend.token_status(subject_id, access_token).await {
        Ok(response) => response,
        Err(err) => {
            warn!("token status check failed: {err:?}");
            return BackendOutcome::failure(VALIDATION_ERRORS);
        }
    };

    if response.is_raw() {
        debug!(
            "token status response carried no response code: status={}",
            response.status
        );
        return BackendOutcome::failure(VALIDATION_ERRORS);
    }
    if response.code == VALID_TOKEN {
        return BackendOutcome::success();
    }
    BackendOutcome::failure(response.code)
}

/// Strip the bearer scheme marker, `None` when it is absent.
fn extract_bearer_token(header: &str) -> Option<&str> {
    let marker = header.get(..BEARER_MARKER.len())?;
    marker
        .eq_ignore_ascii_case(BEARER_MARKER)
        .then(|| &header[BEARER_MARKER.len()..])
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;
    use std::time::Instant;

    use bytes::Bytes;
    use dhpsign_core::{ApiResponse, Error, Result};
    use http::StatusCode;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::constants::GATEWAY_TIMEOUT;

    #[derive(Debug)]
    enum Behavior {
        /// Answer with a JSON body carrying the given response code.
        Respond(i64),
        /// Answer with a body no response code can be parsed from.
        Raw,
        /// Fail the call outright.
        Fail,
        /// Never answer.
        Hang,
    }

    #[derive(Debug)]
    struct MockBackend {
        behavior: Behavior,
        delay: Option<Duration>,
        calls: AtomicUsize,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl MockBackend {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                delay: None,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn delayed(behavior: Behavior, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                delay: Some(delay),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn seen(&self) -> Vec<(String, String)> {
            self.seen.lock().expect("lock poisoned").clone()
        }
    }

    #[async_trait::async_trait]
    impl TokenStatus for MockBackend {
        async fn token_status(&self, subject_id: &str, access_token: &str) -> Result<ApiResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .expect("lock poisoned")
                .push((subject_id.to_string(), access_token.to_string()));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.behavior {
                Behavior::Respond(code) => Ok(ApiResponse::new(
                    StatusCode::OK,
                    Bytes::from(format!(r#"{{"responseCode":"{code}"}}"#)),
                )),
                Behavior::Raw => Ok(ApiResponse::new(
                    StatusCode::BAD_GATEWAY,
                    Bytes::from_static(b"upstream exploded"),
                )),
                Behavior::Fail => Err(Error::unexpected("backend unreachable")),
                Behavior::Hang => std::future::pending().await,
            }
        }
    }

    fn request() -> ValidationRequest {
        ValidationRequest::new("user-1", "Bearer tok-123")
    }

    #[tokio::test]
    async fn test_admits_on_first_success() {
        let soft = MockBackend::new(Behavior::Respond(VALIDATION_ERRORS));
        let ok = MockBackend::delayed(
            Behavior::Respond(VALID_TOKEN),
            Duration::from_millis(10),
        );
        let hung = MockBackend::new(Behavior::Hang);
        let gate = TokenGate::new(vec![soft.clone(), ok.clone(), hung.clone()]);

        let started = Instant::now();
        let decision = gate.validate(&request()).await;

        assert_eq!(GateDecision::Admitted, decision);
        assert!(started.elapsed() < Duration::from_secs(5));
        // Every backend was contacted even though one never answers.
        assert_eq!(1, soft.calls());
        assert_eq!(1, ok.calls());
        assert_eq!(1, hung.calls());
    }

    #[tokio::test]
    async fn test_denies_when_every_backend_soft_fails() {
        let a = MockBackend::new(Behavior::Respond(VALIDATION_ERRORS));
        let b = MockBackend::new(Behavior::Raw);
        let gate = TokenGate::new(vec![a, b]);

        let decision = gate.validate(&request()).await;

        assert_eq!(GateDecision::Denied(VALIDATION_ERRORS), decision);
    }

    #[tokio::test]
    async fn test_denial_reason_is_the_last_reported() {
        // Transport failure lands first, the unrecognized code lands last.
        let failing = MockBackend::new(Behavior::Fail);
        let odd = MockBackend::delayed(Behavior::Respond(1911), Duration::from_millis(20));
        let gate = TokenGate::new(vec![failing, odd]);
        assert_eq!(GateDecision::Denied(1911), gate.validate(&request()).await);

        // Reversed arrival order reverses the reported reason.
        let odd = MockBackend::new(Behavior::Respond(1911));
        let failing = MockBackend::delayed(Behavior::Fail, Duration::from_millis(20));
        let gate = TokenGate::new(vec![odd, failing]);
        assert_eq!(
            GateDecision::Denied(VALIDATION_ERRORS),
            gate.validate(&request()).await
        );
    }

    #[tokio::test]
    async fn test_terminal_reason_short_circuits() {
        for code in [TOKEN_EXPIRED, TOKEN_INVALID] {
            let terminal = MockBackend::new(Behavior::Respond(code));
            let hung = MockBackend::new(Behavior::Hang);
            let also_hung = MockBackend::new(Behavior::Hang);
            let gate = TokenGate::new(vec![terminal.clone(), hung.clone(), also_hung.clone()]);

            let started = Instant::now();
            let decision = gate.validate(&request()).await;

            // Denied while two backends are still pending.
            assert_eq!(GateDecision::Denied(code), decision);
            assert!(started.elapsed() < Duration::from_secs(5));
            assert_eq!(1, hung.calls());
            assert_eq!(1, also_hung.calls());
        }
    }

    #[tokio::test]
    async fn test_times_out_when_no_backend_decides() {
        let a = MockBackend::new(Behavior::Hang);
        let b = MockBackend::new(Behavior::Hang);
        let timeout = Duration::from_millis(100);
        let gate = TokenGate::new(vec![a, b]).with_timeout(timeout);

        let started = Instant::now();
        let decision = gate.validate(&request()).await;

        assert_eq!(GateDecision::TimedOut, decision);
        assert_eq!(Some(GATEWAY_TIMEOUT), decision.reason_code());
        assert!(started.elapsed() >= timeout);
    }

    #[tokio::test]
    async fn test_rejects_empty_subject_before_any_call() {
        let backend = MockBackend::new(Behavior::Respond(VALID_TOKEN));
        let gate = TokenGate::new(vec![backend.clone()]);

        let decision = gate
            .validate(&ValidationRequest::new("", "Bearer tok-123"))
            .await;

        assert_eq!(GateDecision::Denied(INVALID_USER_ID), decision);
        assert_eq!(0, backend.calls());
    }

    #[tokio::test]
    async fn test_rejects_token_without_marker_before_any_call() {
        let backend = MockBackend::new(Behavior::Respond(VALID_TOKEN));

        for token in ["", "tok-123", "bearer", "Basic dXNlcjpwYXNz"] {
            let gate = TokenGate::new(vec![backend.clone()]);
            let decision = gate
                .validate(&ValidationRequest::new("user-1", token))
                .await;
            assert_eq!(GateDecision::Denied(ACCESS_TOKEN_REQUIRED), decision);
        }
        assert_eq!(0, backend.calls());
    }

    #[tokio::test]
    async fn test_strips_marker_case_insensitively() {
        for token in ["bearer tok-123", "Bearer tok-123", "BEARER tok-123"] {
            let backend = MockBackend::new(Behavior::Respond(VALID_TOKEN));
            let gate = TokenGate::new(vec![backend.clone()]);

            let decision = gate
                .validate(&ValidationRequest::new("user-1", token))
                .await;

            assert_eq!(GateDecision::Admitted, decision);
            // The backend sees the bare token, marker removed.
            assert_eq!(
                vec![("user-1".to_string(), "tok-123".to_string())],
                backend.seen()
            );
        }
    }

    #[tokio::test]
    async fn test_zero_backends_time_out() {
        let gate = TokenGate::new(Vec::new()).with_timeout(Duration::from_millis(50));

        let decision = gate.validate(&request()).await;

        assert_eq!(GateDecision::TimedOut, decision);
    }

    #[test]
    fn test_extract_bearer_token() {
        let test_cases = vec![
            ("bearer abc", Some("abc")),
            ("Bearer abc", Some("abc")),
            ("BeArEr abc", Some("abc")),
            ("bearer ", Some("")),
            ("bearer  abc", Some(" abc")),
            ("", None),
            ("abc", None),
            ("bearer", None),
            ("Basic dXNlcjpwYXNz", None),
        ];

        for (header, expected) in test_cases {
            assert_eq!(expected, extract_bearer_token(header), "header: {header:?}");
        }
    }
}
