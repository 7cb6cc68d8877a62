use std::time::Duration;
use tokio::time::Instant;

/// Tracks the pacing state of a domain during crawling
///
/// One `DomainState` belongs to exactly one scheduling unit: the sequential
/// pacer, or the worker draining that domain's queue.
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    /// Number of requests made to this domain in the current crawl
    pub request_count: u32,

    /// Timestamp of the last request to this domain
    pub last_request_time: Option<Instant>,

    /// Crawl-delay declared by the domain's robots.txt
    pub crawl_delay: Option<Duration>,
}

impl DomainState {
    /// Creates a new DomainState with no requests recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a request was made to this domain
    ///
    /// Updates the request count and last request time.
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }

    /// Replaces the crawl-delay in effect for this domain
    pub fn set_crawl_delay(&mut self, delay: Option<Duration>) {
        self.crawl_delay = delay;
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, now: Instant) -> Option<Duration> {
        let delay = self.crawl_delay?;
        let last = self.last_request_time?;

        let elapsed = now.saturating_duration_since(last);
        if elapsed < delay {
            Some(delay - elapsed)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paced(delay_ms: u64) -> DomainState {
        let mut state = DomainState::new();
        state.set_crawl_delay(Some(Duration::from_millis(delay_ms)));
        state
    }

    #[test]
    fn test_new_domain_state() {
        let state = DomainState::new();
        assert_eq!(state.request_count, 0);
        assert!(state.last_request_time.is_none());
        assert!(state.crawl_delay.is_none());
    }

    #[test]
    fn test_record_request() {
        let mut state = DomainState::new();
        let now = Instant::now();

        state.record_request(now);
        assert_eq!(state.request_count, 1);
        assert_eq!(state.last_request_time, Some(now));

        state.record_request(now);
        assert_eq!(state.request_count, 2);
    }

    #[test]
    fn test_no_delay_never_waits() {
        let mut state = DomainState::new();
        let now = Instant::now();
        state.record_request(now);

        assert!(state.time_until_next_request(now).is_none());
        assert!(state.time_until_next_request(now).is_none());
    }

    #[test]
    fn test_first_request_never_waits() {
        let state = paced(2000);
        assert!(state.time_until_next_request(Instant::now()).is_none());
    }

    #[test]
    fn test_time_until_next_request() {
        let mut state = paced(1000);
        let now = Instant::now();
        state.record_request(now);

        assert_eq!(
            state.time_until_next_request(now),
            Some(Duration::from_millis(1000))
        );

        let soon = now + Duration::from_millis(400);
        assert_eq!(
            state.time_until_next_request(soon),
            Some(Duration::from_millis(600))
        );
        assert!(state.time_until_next_request(soon).is_some());

        let later = now + Duration::from_millis(1100);
        assert!(state.time_until_next_request(later).is_none());
        assert!(state.time_until_next_request(later).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_elapses_with_tokio_clock() {
        let mut state = paced(2000);
        state.record_request(Instant::now());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let remaining = state.time_until_next_request(Instant::now()).unwrap();
        assert!(remaining <= Duration::from_millis(500));
        assert!(remaining > Duration::ZERO);

        tokio::time::sleep(remaining).await;
        assert!(state.time_until_next_request(Instant::now()).is_none());
    }
}
