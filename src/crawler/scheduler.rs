//! Per-domain request pacing
//!
//! This module handles:
//! - Tracking the last request time of every domain
//! - Applying robots.txt crawl delays before the next request to a domain
//! - Interrupting pacing sleeps when the run is cancelled
//!
//! Pacing is per domain: requests to different domains never wait on each other.

use crate::output::{CrawlEvent, CrawlObserver};
use crate::state::DomainState;
use crate::url::Domain;
use crate::SkimError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Pacer owns the pacing state of the domains it schedules
///
/// A sequential run uses one pacer for every domain. A concurrent run hands
/// each domain worker its own pacer via [`Pacer::split_off`], so no pacing
/// state is ever shared between domains.
pub struct Pacer {
    /// Per-domain state tracking
    domain_states: HashMap<Domain, DomainState>,

    observer: Arc<dyn CrawlObserver>,
}

impl Pacer {
    pub fn new(observer: Arc<dyn CrawlObserver>) -> Self {
        Self {
            domain_states: HashMap::new(),
            observer,
        }
    }

    /// Sets the crawl-delay in effect for `domain`
    ///
    /// # Arguments
    ///
    /// * `domain` - The domain the delay applies to
    /// * `delay` - The delay reported by the gatekeeper; `None` disables pacing
    pub fn set_crawl_delay(&mut self, domain: &Domain, delay: Option<Duration>) {
        self.state_mut(domain).set_crawl_delay(delay);
    }

    /// Waits until a request to `domain` respects its crawl-delay
    ///
    /// Returns immediately when the domain has no delay or has not been
    /// requested yet. The wait is reported to the observer.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - A request may be issued now
    /// * `Err(SkimError::Cancelled)` - The run was cancelled while waiting
    pub async fn wait_turn(
        &mut self,
        domain: &Domain,
        cancel: &CancellationToken,
    ) -> Result<(), SkimError> {
        if cancel.is_cancelled() {
            return Err(SkimError::Cancelled);
        }

        let Some(wait) = self.state_mut(domain).time_until_next_request(Instant::now()) else {
            return Ok(());
        };

        self.observer.on_event(&CrawlEvent::DelayApplied {
            domain: domain.clone(),
            wait,
        });

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SkimError::Cancelled),
            _ = tokio::time::sleep(wait) => Ok(()),
        }
    }

    /// Records that a request was made to a domain
    pub fn record_request(&mut self, domain: &Domain) {
        self.state_mut(domain).record_request(Instant::now());
    }

    /// Moves the state of `domain` into a new pacer of its own
    ///
    /// The returned pacer starts from this pacer's history for the domain (or
    /// from scratch when the domain was never requested).
    pub fn split_off(&mut self, domain: &Domain) -> Pacer {
        let mut pacer = Pacer::new(Arc::clone(&self.observer));
        if let Some(state) = self.domain_states.remove(domain) {
            pacer.domain_states.insert(domain.clone(), state);
        }
        pacer
    }

    /// Gets the domain state for a specific domain
    pub fn domain_state(&self, domain: &Domain) -> Option<&DomainState> {
        self.domain_states.get(domain)
    }

    /// Number of requests recorded for `domain`
    pub fn request_count(&self, domain: &Domain) -> u32 {
        self.domain_states
            .get(domain)
            .map_or(0, |state| state.request_count)
    }

    fn state_mut(&mut self, domain: &Domain) -> &mut DomainState {
        self.domain_states
            .entry(domain.clone())
            .or_insert_with(DomainState::new)
    }
}
