//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the run state machine:
//!
//! `ValidateSeed → CheckSeedPolicy → FetchSeed → ExtractLinks →
//! {for each link: Normalize → CheckPolicy → Pace → Fetch → Extract → Persist}`
//!
//! Seed failures end the run before the link loop. Link failures are recorded
//! and the loop moves on.

use crate::config::{validate, Config};
use crate::crawler::scheduler::Pacer;
use crate::crawler::{
    FetchedPage, Gatekeeper, HtmlExtractor, PageExtractor, PageFetcher, ReqwestFetcher,
};
use crate::output::{
    sanitize_filename, CrawlEvent, CrawlObserver, CrawlReport, PagePersister, RunOutcome,
    TextFileOutput, TracingObserver,
};
use crate::robots::PolicyStore;
use crate::state::LinkOutcome;
use crate::url::{domain_of, is_valid, Domain, LinkCandidate};
use crate::{SkimError, UrlError};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn PageExtractor>,
    persister: Arc<dyn PagePersister>,
    observer: Arc<dyn CrawlObserver>,
    gatekeeper: Gatekeeper,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a coordinator with the production collaborators
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(SkimError)` - The configuration is invalid or the HTTP client failed to build
    pub fn new(config: Config) -> Result<Self, SkimError> {
        validate(&config)?;

        let fetcher = Arc::new(ReqwestFetcher::from_config(
            &config.user_agent,
            &config.crawler,
        )?);
        let persister = Arc::new(TextFileOutput::from_config(&config.output));

        Ok(Self::with_collaborators(
            config,
            fetcher,
            Arc::new(HtmlExtractor),
            persister,
            Arc::new(TracingObserver),
        ))
    }

    /// Creates a coordinator around caller-supplied collaborators
    pub fn with_collaborators(
        config: Config,
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn PageExtractor>,
        persister: Arc<dyn PagePersister>,
        observer: Arc<dyn CrawlObserver>,
    ) -> Self {
        let store = Arc::new(PolicyStore::new(
            Arc::clone(&fetcher),
            Arc::clone(&observer),
            config.crawler.robots_timeout(),
        ));
        let gatekeeper = Gatekeeper::new(store, Arc::clone(&observer));

        Self {
            config,
            fetcher,
            extractor,
            persister,
            observer,
            gatekeeper,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that aborts the run when cancelled
    ///
    /// In-flight fetches and pacing sleeps are interrupted; links not yet
    /// finished are recorded as cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn gatekeeper(&self) -> &Gatekeeper {
        &self.gatekeeper
    }

    /// Runs one harvest starting at `seed`
    ///
    /// Every policy and fetch outcome, including a failed seed, is reported
    /// through the returned [`CrawlReport`].
    pub async fn run(&self, seed: &str) -> Result<CrawlReport, SkimError> {
        let seed = seed.trim();
        let mut report = CrawlReport::new(seed);
        self.observer.on_event(&CrawlEvent::RunStarted {
            seed: seed.to_string(),
        });

        match self.crawl(seed, &mut report).await {
            Ok(outcome) => report.finish(outcome, None),
            Err(e @ SkimError::Url(_)) => {
                report.finish(RunOutcome::SeedInvalid, Some(e.to_string()))
            }
            Err(SkimError::PolicyDenied { .. }) => report.finish(
                RunOutcome::SeedDenied,
                Some("Scraping is not allowed for this website according to robots.txt".to_string()),
            ),
            Err(SkimError::Fetch(e)) => report.finish(
                RunOutcome::SeedFetchFailed,
                Some(format!("Error fetching {}: {}", seed, e)),
            ),
            Err(SkimError::Cancelled) => report.finish(RunOutcome::Cancelled, None),
            Err(e) => return Err(e),
        }

        self.observer.on_event(&CrawlEvent::RunFinished {
            seed: report.seed.clone(),
            outcome: report.outcome,
            saved: report.saved,
        });

        Ok(report)
    }

    async fn crawl(&self, seed: &str, report: &mut CrawlReport) -> Result<RunOutcome, SkimError> {
        let seed_url = parse_seed(seed)?;
        let seed_domain = domain_of(&seed_url);

        let decision = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(SkimError::Cancelled),
            decision = self.gatekeeper.may_fetch(&seed_url) => decision,
        };
        if !decision.allowed {
            return Err(SkimError::PolicyDenied {
                url: seed_url.to_string(),
            });
        }

        let mut pacer = Pacer::new(Arc::clone(&self.observer));
        pacer.set_crawl_delay(&seed_domain, decision.delay);
        let page = self.fetch(&mut pacer, &seed_domain, &seed_url).await?;

        let hrefs = self.extractor.links(&page.body);
        report.links_seen = hrefs.len();
        tracing::info!("Found {} links on {}", hrefs.len(), page.final_url);

        let candidates: Vec<LinkCandidate> = hrefs
            .into_iter()
            .map(|href| LinkCandidate::new(href, page.final_url.clone()))
            .collect();

        let workers = self.config.crawler.max_concurrent_domains as usize;
        if workers <= 1 {
            for candidate in &candidates {
                let outcome = self.process_link(&mut pacer, candidate).await;
                report.record(outcome);
            }
        } else {
            self.crawl_concurrently(pacer, &candidates, workers, report)
                .await;
        }

        if report.cancelled > 0 {
            Ok(RunOutcome::Cancelled)
        } else {
            Ok(RunOutcome::Completed)
        }
    }

    /// Runs up to `workers` per-domain queues at once
    ///
    /// Links are partitioned by domain, keeping first-appearance order inside
    /// each queue. Every queue owns the pacing state of its domain.
    async fn crawl_concurrently(
        &self,
        mut pacer: Pacer,
        candidates: &[LinkCandidate],
        workers: usize,
        report: &mut CrawlReport,
    ) {
        let mut queues: Vec<(Domain, Vec<Url>)> = Vec::new();
        let mut index: HashMap<Domain, usize> = HashMap::new();

        for candidate in candidates {
            if self.cancel.is_cancelled() {
                report.record(LinkOutcome::Cancelled);
                continue;
            }
            let Some(url) = self.admit(candidate) else {
                report.record(LinkOutcome::Invalid);
                continue;
            };

            let domain = domain_of(&url);
            let slot = *index.entry(domain.clone()).or_insert_with(|| {
                queues.push((domain, Vec::new()));
                queues.len() - 1
            });
            queues[slot].1.push(url);
        }

        tracing::debug!(
            "Crawling {} domain queues with {} workers",
            queues.len(),
            workers
        );

        let drains = queues.into_iter().map(|(domain, urls)| {
            let pacer = pacer.split_off(&domain);
            self.drain_queue(pacer, urls)
        });

        let mut results = stream::iter(drains).buffer_unordered(workers);
        while let Some(outcomes) = results.next().await {
            for outcome in outcomes {
                report.record(outcome);
            }
        }
    }

    async fn drain_queue(&self, mut pacer: Pacer, urls: Vec<Url>) -> Vec<LinkOutcome> {
        let mut outcomes = Vec::with_capacity(urls.len());
        for url in &urls {
            outcomes.push(self.visit(&mut pacer, url).await);
        }
        outcomes
    }

    async fn process_link(&self, pacer: &mut Pacer, candidate: &LinkCandidate) -> LinkOutcome {
        if self.cancel.is_cancelled() {
            return LinkOutcome::Cancelled;
        }

        match self.admit(candidate) {
            Some(url) => self.visit(pacer, &url).await,
            None => LinkOutcome::Invalid,
        }
    }

    fn admit(&self, candidate: &LinkCandidate) -> Option<Url> {
        match candidate.admit() {
            Ok(url) => Some(url),
            Err(e) => {
                self.observer.on_event(&CrawlEvent::InvalidUrl {
                    href: candidate.href.clone(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    /// Checks, paces, fetches and persists one admitted URL
    async fn visit(&self, pacer: &mut Pacer, url: &Url) -> LinkOutcome {
        if self.cancel.is_cancelled() {
            return LinkOutcome::Cancelled;
        }

        let decision = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return LinkOutcome::Cancelled,
            decision = self.gatekeeper.may_fetch(url) => decision,
        };
        if !decision.allowed {
            return LinkOutcome::Denied;
        }

        let domain = domain_of(url);
        pacer.set_crawl_delay(&domain, decision.delay);

        let page = match self.fetch(pacer, &domain, url).await {
            Ok(page) => page,
            Err(SkimError::Cancelled) => return LinkOutcome::Cancelled,
            Err(_) => return LinkOutcome::FetchFailed,
        };

        let extracted = self.extractor.extract(&page.body);
        let name = sanitize_filename(&extracted.title);

        match self.persister.persist(&name, &extracted.text) {
            Ok(path) => {
                self.observer.on_event(&CrawlEvent::Persisted {
                    url: url.to_string(),
                    title: extracted.title,
                    path: path.clone(),
                });
                LinkOutcome::Saved { path }
            }
            Err(e) => {
                self.observer.on_event(&CrawlEvent::PersistFailed {
                    url: url.to_string(),
                    error: e.to_string(),
                });
                LinkOutcome::PersistFailed
            }
        }
    }

    /// Waits for the domain's turn, then fetches `url`
    ///
    /// A non-2xx response is a fetch failure.
    async fn fetch(
        &self,
        pacer: &mut Pacer,
        domain: &Domain,
        url: &Url,
    ) -> Result<FetchedPage, SkimError> {
        pacer.wait_turn(domain, &self.cancel).await?;
        pacer.record_request(domain);

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(SkimError::Cancelled),
            result = self.fetcher.fetch(url) => result,
        };

        match result.and_then(FetchedPage::ensure_success) {
            Ok(page) => {
                self.observer.on_event(&CrawlEvent::FetchSucceeded {
                    url: url.to_string(),
                    status: page.status,
                    bytes: page.body.len(),
                });
                Ok(page)
            }
            Err(e) => {
                self.observer.on_event(&CrawlEvent::FetchFailed {
                    url: url.to_string(),
                    error: e.to_string(),
                });
                Err(e.into())
            }
        }
    }
}

fn parse_seed(seed: &str) -> Result<Url, UrlError> {
    if seed.is_empty() {
        return Err(UrlError::Empty);
    }
    if !is_valid(seed) {
        return Err(UrlError::Invalid(seed.to_string()));
    }
    Url::parse(seed).map_err(|_| UrlError::Invalid(seed.to_string()))
}
