use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Fallback request timeout used when the run carries no deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Cancellation signal and optional deadline shared by every outbound call of
/// one run.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RunContext {
    pub fn new(token: CancellationToken) -> Self {
        RunContext {
            token,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// True once the token fired or the deadline passed.
    pub fn is_done(&self) -> bool {
        self.token.is_cancelled()
            || self
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub fn request_timeout(&self) -> Duration {
        match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_fall_back_to_default_timeout_without_deadline() {
        let ctx = RunContext::default();

        assert_eq!(ctx.request_timeout(), DEFAULT_TIMEOUT);
        assert!(!ctx.is_done());
    }

    #[tokio::test]
    async fn should_use_remaining_time_until_deadline() {
        let ctx = RunContext::default().with_deadline(Instant::now() + Duration::from_secs(5));

        let timeout = ctx.request_timeout();

        assert!(timeout <= Duration::from_secs(5));
        assert!(timeout > Duration::from_secs(4));
    }

    #[tokio::test]
    async fn should_be_done_once_deadline_passed() {
        let ctx = RunContext::default().with_deadline(Instant::now());

        assert!(ctx.is_done());
        assert_eq!(ctx.request_timeout(), Duration::ZERO);
    }

    #[test]
    fn should_be_done_once_cancelled() {
        let token = CancellationToken::new();
        let ctx = RunContext::new(token.clone());

        token.cancel();

        assert!(ctx.is_done());
    }
}
