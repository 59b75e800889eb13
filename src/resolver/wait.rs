//! Bounded polling.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::driver::DriverError;
use crate::error::ActionError;

/// Polling granularity for every wait.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Parameters of a single wait call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSpec {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitSpec {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: POLL_INTERVAL,
        }
    }
}

/// Poll `predicate` until it returns `true` or `spec.timeout` elapses.
///
/// An already-true predicate returns without sleeping. Transient driver errors
/// (no such element, stale element) count as "not yet"; any other error aborts
/// the wait. On expiry the result is [`ActionError::TimedOut`] naming `what`,
/// reported no later than `timeout + poll_interval` after the call. A timeout
/// too large to place on the clock polls until the predicate holds.
pub async fn wait_until<F, Fut>(
    spec: WaitSpec,
    what: &str,
    mut predicate: F,
) -> Result<(), ActionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, DriverError>>,
{
    let deadline = Instant::now().checked_add(spec.timeout);
    if deadline.is_none() {
        log::debug!("timeout {:?} for {what} is unbounded", spec.timeout);
    }

    loop {
        match predicate().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) if e.is_transient() => {
                log::trace!("wait for {what}: {e}");
            }
            Err(e) => return Err(e.into()),
        }

        let pause = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return Err(ActionError::TimedOut {
                        what: what.to_string(),
                        timeout: spec.timeout,
                    });
                }
                spec.poll_interval.min(deadline - now)
            }
            None => spec.poll_interval,
        };
        tokio::time::sleep(pause).await;
    }
}
