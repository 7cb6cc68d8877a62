//! Per-domain policy store
//!
//! The store resolves robots.txt lazily, the first time a domain is asked for,
//! and keeps the resulting [`PolicyRecord`] for the rest of the run.

use crate::crawler::PageFetcher;
use crate::output::{CrawlEvent, CrawlObserver};
use crate::robots::{ParsedRobots, PolicyRecord, SingleFlightCache};
use crate::url::Domain;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Process-scoped cache of robots policy, keyed by domain
pub struct PolicyStore {
    fetcher: Arc<dyn PageFetcher>,
    observer: Arc<dyn CrawlObserver>,
    cache: SingleFlightCache<Domain, Arc<PolicyRecord>>,
    timeout: Duration,
}

impl PolicyStore {
    /// Creates an empty store
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Used to download `<domain>/robots.txt`
    /// * `observer` - Receives fetch attempts, outcomes and every parsed rule
    /// * `timeout` - Upper bound for one robots.txt fetch
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        observer: Arc<dyn CrawlObserver>,
        timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            observer,
            cache: SingleFlightCache::new(),
            timeout,
        }
    }

    /// Returns the policy for `domain`, fetching robots.txt on first use
    ///
    /// At most one robots.txt request is issued per domain, even when several
    /// callers ask for the same domain concurrently. Failures never surface as
    /// errors: they produce a permissive record.
    pub async fn get(&self, domain: &Domain) -> Arc<PolicyRecord> {
        self.cache
            .lookup_or_populate(domain, || self.resolve(domain))
            .await
    }

    /// Returns the record for `domain` if it has already been resolved
    pub fn cached(&self, domain: &Domain) -> Option<Arc<PolicyRecord>> {
        self.cache.get(domain)
    }

    /// Number of domains resolved so far
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    async fn resolve(&self, domain: &Domain) -> Arc<PolicyRecord> {
        let robots_url = domain.robots_url();
        self.observer.on_event(&CrawlEvent::RobotsFetchStarted {
            domain: domain.clone(),
            url: robots_url.clone(),
        });

        let record = self.fetch_record(domain, &robots_url).await;
        self.report(&record);
        Arc::new(record)
    }

    async fn fetch_record(&self, domain: &Domain, robots_url: &str) -> PolicyRecord {
        let url = match Url::parse(robots_url) {
            Ok(url) => url,
            Err(e) => return PolicyRecord::error(domain.clone(), e.to_string()),
        };

        let page = match tokio::time::timeout(self.timeout, self.fetcher.fetch(&url)).await {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => return PolicyRecord::error(domain.clone(), e.to_string()),
            Err(_) => {
                return PolicyRecord::error(
                    domain.clone(),
                    format!("timed out after {:?}", self.timeout),
                )
            }
        };

        match page.status {
            200..=299 => match String::from_utf8(page.body) {
                Ok(content) => {
                    PolicyRecord::resolved(domain.clone(), ParsedRobots::from_content(&content))
                }
                Err(e) => PolicyRecord::error(domain.clone(), format!("unreadable body: {}", e)),
            },
            400..=499 => PolicyRecord::missing(domain.clone(), page.status),
            status => PolicyRecord::error(domain.clone(), format!("HTTP {}", status)),
        }
    }

    fn report(&self, record: &PolicyRecord) {
        self.observer.on_event(&CrawlEvent::RobotsResolved {
            domain: record.domain.clone(),
            status: record.status,
            detail: record.detail.clone(),
            rule_count: record.robots().rule_count(),
            crawl_delay: record.crawl_delay(),
        });

        for group in record.robots().groups() {
            for rule in &group.rules {
                self.observer.on_event(&CrawlEvent::RobotsRule {
                    domain: record.domain.clone(),
                    agents: group.agents.clone(),
                    rule: rule.clone(),
                });
            }
        }
    }
}
