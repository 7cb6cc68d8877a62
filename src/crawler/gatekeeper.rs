//! Fetch gatekeeper
//!
//! Answers "may this URL be fetched?" from the domain's robots policy. The
//! answer carries the domain's crawl-delay; waiting it out is the caller's job.

use crate::output::{CrawlEvent, CrawlObserver};
use crate::robots::PolicyStore;
use crate::url::domain_of;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Verdict for a single URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlDecision {
    /// Whether robots policy permits the fetch
    pub allowed: bool,

    /// Minimum spacing before the next request to the same domain
    pub delay: Option<Duration>,
}

impl CrawlDecision {
    pub fn allow(delay: Option<Duration>) -> Self {
        Self {
            allowed: true,
            delay,
        }
    }

    pub fn deny() -> Self {
        Self {
            allowed: false,
            delay: None,
        }
    }
}

/// Decision point between the crawl driver and the policy store
pub struct Gatekeeper {
    store: Arc<PolicyStore>,
    observer: Arc<dyn CrawlObserver>,
}

impl Gatekeeper {
    pub fn new(store: Arc<PolicyStore>, observer: Arc<dyn CrawlObserver>) -> Self {
        Self { store, observer }
    }

    /// Decides whether `url` may be fetched
    ///
    /// The first call for a domain triggers its robots.txt lookup. A domain
    /// whose robots.txt is missing, broken or unreachable is never denied.
    /// This method does not sleep.
    pub async fn may_fetch(&self, url: &Url) -> CrawlDecision {
        let domain = domain_of(url);
        let record = self.store.get(&domain).await;

        let decision = if record.is_allowed(url) {
            CrawlDecision::allow(record.crawl_delay())
        } else {
            CrawlDecision::deny()
        };

        self.observer.on_event(&CrawlEvent::Decision {
            url: url.to_string(),
            allowed: decision.allowed,
            delay: decision.delay,
        });

        decision
    }

    /// The policy store behind this gatekeeper
    pub fn store(&self) -> &PolicyStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{FetchError, FetchedPage, PageFetcher};
    use crate::output::RecordingObserver;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves robots.txt bodies per origin; unknown origins fail to connect
    struct RobotsServer {
        bodies: HashMap<String, &'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for RobotsServer {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let origin = domain_of(url).to_string();
            match self.bodies.get(&origin) {
                Some(body) => Ok(FetchedPage {
                    final_url: url.clone(),
                    status: 200,
                    body: body.as_bytes().to_vec(),
                }),
                None => Err(FetchError::Request {
                    url: url.to_string(),
                    message: "Connection refused".to_string(),
                }),
            }
        }
    }

    fn gatekeeper(bodies: &[(&str, &'static str)]) -> (Gatekeeper, Arc<RobotsServer>, Arc<RecordingObserver>) {
        let server = Arc::new(RobotsServer {
            bodies: bodies
                .iter()
                .map(|(origin, body)| (origin.to_string(), *body))
                .collect(),
            calls: AtomicUsize::new(0),
        });
        let observer = Arc::new(RecordingObserver::new());
        let store = Arc::new(PolicyStore::new(
            server.clone(),
            observer.clone(),
            Duration::from_secs(1),
        ));
        (Gatekeeper::new(store, observer.clone()), server, observer)
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_disallowed_path_is_denied() {
        let (gk, _, _) = gatekeeper(&[("http://example.com", "User-agent: *\nDisallow: /private")]);

        assert!(!gk.may_fetch(&url("http://example.com/private/page")).await.allowed);
        assert!(gk.may_fetch(&url("http://example.com/public/page")).await.allowed);
    }

    #[tokio::test]
    async fn test_longer_allow_overrides_disallow() {
        let (gk, _, _) = gatekeeper(&[(
            "http://example.com",
            "User-agent: *\nDisallow: /docs\nAllow: /docs/public",
        )]);

        assert!(!gk.may_fetch(&url("http://example.com/docs/internal")).await.allowed);
        assert!(gk.may_fetch(&url("http://example.com/docs/public/a")).await.allowed);
    }

    #[tokio::test]
    async fn test_unreachable_robots_never_denies() {
        let (gk, _, _) = gatekeeper(&[]);

        let decision = gk.may_fetch(&url("http://down.example/anything")).await;
        assert_eq!(decision, CrawlDecision::allow(None));
    }

    #[tokio::test]
    async fn test_empty_robots_never_denies() {
        let (gk, _, _) = gatekeeper(&[("http://example.com", "")]);

        assert!(gk.may_fetch(&url("http://example.com/")).await.allowed);
    }

    #[tokio::test]
    async fn test_reports_crawl_delay() {
        let (gk, _, _) = gatekeeper(&[("http://example.com", "User-agent: *\nCrawl-delay: 2")]);

        let decision = gk.may_fetch(&url("http://example.com/page")).await;
        assert_eq!(decision, CrawlDecision::allow(Some(Duration::from_secs(2))));
    }

    #[tokio::test]
    async fn test_one_robots_fetch_per_domain() {
        let (gk, server, _) = gatekeeper(&[
            ("http://example.com", "User-agent: *\nDisallow: /x"),
            ("https://other.org", ""),
        ]);

        for path in ["/", "/a", "/x/1", "/b"] {
            gk.may_fetch(&url(&format!("http://example.com{}", path))).await;
        }
        gk.may_fetch(&url("https://other.org/z")).await;
        gk.may_fetch(&url("https://other.org/y")).await;

        assert_eq!(server.calls.load(Ordering::SeqCst), 2);
        assert_eq!(gk.store().len(), 2);
    }

    #[tokio::test]
    async fn test_decisions_are_observed() {
        let (gk, _, observer) = gatekeeper(&[("http://example.com", "User-agent: *\nDisallow: /")]);

        gk.may_fetch(&url("http://example.com/")).await;

        assert_eq!(
            observer.count(|e| matches!(e, CrawlEvent::Decision { allowed: false, .. })),
            1
        );
    }
}
