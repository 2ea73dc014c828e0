//! The retry controller that wraps Rest client attempts.
//!
//! The controller only retries what is worth retrying. Rate limits,
//! server errors, and network problems are transient, anything else the
//! server said `4xx` about will not get better by asking again. The
//! classification is a pure function so it can be tested apart from the
//! retry loop, and the loop takes its sleep as an argument so the tests
//! run without real delays.
use super::rest_client::RestClientResult;
use std::time::Duration;

/// The default number of attempts before giving up on a fetch.
pub const MAX_ATTEMPTS: usize = 5;

/// The delay used before the first retry.
const START_DELAY: Duration = Duration::from_secs(1);

/// The backoff delay ceiling.
const MAX_DELAY: Duration = Duration::from_secs(30);

/// The upper bound of the random jitter added to every delay.
const JITTER_MS: u64 = 500;

/// How a fetch failure should be treated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureClass {
    /// The failure is expected to clear if the request is repeated.
    Transient,
    /// Repeating the request will not help.
    Permanent,
}

/// Decide how a Rest client result should be treated.
///
/// Returns `None` for a successful body, otherwise the failure class:
///
/// * 429 and 5xx status codes are transient.
/// * Timeouts, connection errors, and body receive errors are transient.
/// * Any other status code (bad request, bad key, bad location) is permanent.
///
/// # Arguments
///
/// * `result` is the Rest client outcome that will be classified.
///
pub fn classify(result: &RestClientResult) -> Option<FailureClass> {
    use RestClientResult::*;
    match result {
        Body(_) => None,
        Timeout(_) | ConnectionError(_) | ResponseError(_) => Some(FailureClass::Transient),
        RequestError(_) => Some(FailureClass::Permanent),
        HttpStatusCode { code, .. } => match code {
            429 => Some(FailureClass::Transient),
            500..=599 => Some(FailureClass::Transient),
            _ => Some(FailureClass::Permanent),
        },
    }
}

/// Describe a Rest client failure for log messages.
///
/// # Arguments
///
/// * `result` is the Rest client outcome that will be described.
///
pub fn describe(result: &RestClientResult) -> String {
    use RestClientResult::*;
    match result {
        Body(body) => format!("{} byte response", body.len()),
        Timeout(msg) => format!("request timed out ({})", msg),
        ConnectionError(msg) => format!("connection failed ({})", msg),
        ResponseError(msg) => format!("response body error ({})", msg),
        RequestError(msg) => format!("request did not run ({})", msg),
        HttpStatusCode { code, .. } => match code {
            429 => "too many requests".to_string(),
            401 => "API key was not accepted".to_string(),
            404 => "location was not found".to_string(),
            code => format!("HTTP error {}", code),
        },
    }
}

/// The exponential backoff delay sequence.
///
/// Each call to [next_delay](Self::next_delay) returns the current delay and
/// doubles it, capped at the ceiling. Jitter is not applied here so the
/// sequence stays deterministic for testing.
#[derive(Debug)]
pub struct Backoff {
    /// The delay the next retry will wait.
    delay: Duration,
    /// The largest delay the sequence will produce.
    max_delay: Duration,
}
impl Default for Backoff {
    fn default() -> Self {
        Self { delay: START_DELAY, max_delay: MAX_DELAY }
    }
}
impl Backoff {
    /// Get the next delay in the sequence.
    ///
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.delay;
        self.delay = std::cmp::min(delay * 2, self.max_delay);
        delay
    }
}

/// The retry controller.
///
/// The controller runs an attempt, classifies the outcome, and either
/// returns the body, fails fast on a permanent error, or sleeps and tries
/// again until the attempts are exhausted.
pub struct Retrier {
    /// The maximum number of attempts before giving up.
    max_attempts: usize,
    /// How the controller waits between attempts.
    sleep: Box<dyn Fn(Duration) + Send + Sync>,
}
impl std::fmt::Debug for Retrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retrier").field("max_attempts", &self.max_attempts).finish()
    }
}
impl Default for Retrier {
    /// The default controller really sleeps between attempts.
    fn default() -> Self {
        Self { max_attempts: MAX_ATTEMPTS, sleep: Box::new(std::thread::sleep) }
    }
}
impl Retrier {
    /// Create a controller with a caller supplied sleep, used by tests to
    /// observe the delays instead of waiting them out.
    ///
    /// # Arguments
    ///
    /// * `max_attempts` is the attempt limit.
    /// * `sleep` is called with each backoff delay.
    ///
    pub fn with_sleep(max_attempts: usize, sleep: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        Self { max_attempts, sleep: Box::new(sleep) }
    }

    /// Run attempts until one succeeds, one fails permanently, or the
    /// attempts are exhausted.
    ///
    /// # Arguments
    ///
    /// * `what` names the fetch for log and error messages.
    /// * `attempt` runs a single Rest client request.
    ///
    pub fn run(&self, what: &str, mut attempt: impl FnMut() -> RestClientResult) -> crate::Result<Vec<u8>> {
        let mut backoff = Backoff::default();
        for attempt_number in 1..=self.max_attempts {
            let result = attempt();
            match classify(&result) {
                None => {
                    if let RestClientResult::Body(body) = result {
                        return Ok(body);
                    }
                    // classify only returns None for a body
                    unreachable!("classify returned None for a failure");
                }
                Some(FailureClass::Permanent) => {
                    return Err(crate::Error::permanent(format!("{}: {}.", what, describe(&result))));
                }
                Some(FailureClass::Transient) => {
                    if attempt_number == self.max_attempts {
                        break;
                    }
                    let delay = retry_delay(&result, &mut backoff);
                    log::warn!(
                        "{}: {} - retrying in {:.1}s (attempt {}/{})",
                        what,
                        describe(&result),
                        delay.as_secs_f64(),
                        attempt_number,
                        self.max_attempts
                    );
                    (self.sleep)(delay);
                }
            }
        }
        Err(crate::Error::transient(format!("{}: no success after {} attempts.", what, self.max_attempts)))
    }
}

/// Get the delay before the next attempt.
///
/// A numeric `Retry-After` from the server wins, otherwise the backoff
/// sequence is used. Jitter is added either way so a fleet of scheduled
/// jobs does not hammer the endpoint in step.
///
/// # Arguments
///
/// * `result` is the transient failure being waited out.
/// * `backoff` is the delay sequence for this run of attempts.
///
fn retry_delay(result: &RestClientResult, backoff: &mut Backoff) -> Duration {
    use rand::Rng;
    let delay = match result {
        RestClientResult::HttpStatusCode { retry_after: Some(seconds), .. } => Duration::from_secs(*seconds),
        _ => backoff.next_delay(),
    };
    delay + Duration::from_millis(rand::rng().random_range(0..JITTER_MS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn status(code: u16) -> RestClientResult {
        RestClientResult::HttpStatusCode { code, retry_after: None }
    }

    #[test]
    fn classification() {
        assert_eq!(classify(&RestClientResult::Body(vec![])), None);
        assert_eq!(classify(&status(429)), Some(FailureClass::Transient));
        assert_eq!(classify(&status(500)), Some(FailureClass::Transient));
        assert_eq!(classify(&status(503)), Some(FailureClass::Transient));
        assert_eq!(classify(&status(401)), Some(FailureClass::Permanent));
        assert_eq!(classify(&status(404)), Some(FailureClass::Permanent));
        assert_eq!(classify(&status(400)), Some(FailureClass::Permanent));
        assert_eq!(classify(&RestClientResult::Timeout("t".to_string())), Some(FailureClass::Transient));
        assert_eq!(classify(&RestClientResult::ConnectionError("c".to_string())), Some(FailureClass::Transient));
        assert_eq!(classify(&RestClientResult::RequestError("r".to_string())), Some(FailureClass::Permanent));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let mut backoff = Backoff::default();
        let delays: Vec<u64> = (0..7).map(|_| backoff.next_delay().as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 16, 30, 30]);
    }

    #[test]
    fn transient_retries_are_bounded() {
        let attempts = Arc::new(Mutex::new(0usize));
        let sleeps = Arc::new(Mutex::new(vec![]));
        let sleep_log = sleeps.clone();
        let retrier = Retrier::with_sleep(5, move |delay| sleep_log.lock().unwrap().push(delay));
        let counter = attempts.clone();
        let error = retrier
            .run("always 503", move || {
                *counter.lock().unwrap() += 1;
                status(503)
            })
            .unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::Transient);
        assert_eq!(*attempts.lock().unwrap(), 5);
        // no sleep after the last attempt
        assert_eq!(sleeps.lock().unwrap().len(), 4);
    }

    #[test]
    fn permanent_fails_fast() {
        let attempts = Arc::new(Mutex::new(0usize));
        let retrier = Retrier::with_sleep(5, |_| {});
        let counter = attempts.clone();
        let error = retrier
            .run("bad key", move || {
                *counter.lock().unwrap() += 1;
                status(401)
            })
            .unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::Permanent);
        assert_eq!(*attempts.lock().unwrap(), 1);
    }

    #[test]
    fn retries_then_succeeds() {
        let attempts = Arc::new(Mutex::new(0usize));
        let retrier = Retrier::with_sleep(5, |_| {});
        let counter = attempts.clone();
        let body = retrier
            .run("flaky", move || {
                let mut count = counter.lock().unwrap();
                *count += 1;
                match *count {
                    1 => status(500),
                    2 => RestClientResult::Timeout("timed out".to_string()),
                    _ => RestClientResult::Body(b"ok".to_vec()),
                }
            })
            .unwrap();
        assert_eq!(body, b"ok".to_vec());
        assert_eq!(*attempts.lock().unwrap(), 3);
    }

    #[test]
    fn retry_after_overrides_backoff() {
        let mut backoff = Backoff::default();
        let result = RestClientResult::HttpStatusCode { code: 429, retry_after: Some(7) };
        let delay = retry_delay(&result, &mut backoff);
        assert!(delay >= Duration::from_secs(7));
        assert!(delay < Duration::from_secs(8));
        // the backoff sequence was not consumed
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
    }
}
