//! Read-through cache for job lookups, backed by moka.
//!
//! Two caches share one configuration: single jobs keyed by `job_id`, and
//! the full job listing under a unit key. Only successful responses are
//! stored. Mutations invalidate the job entry and the listing before the
//! mutating call returns, so a read that follows a write never sees the
//! pre-write state.
//!
//! Readers take a [`CacheGeneration`] before fetching and hand it back when
//! storing. Every invalidation bumps the generation, so a fetch that was in
//! flight across a mutation never stores its older result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cronlytic_domain::JobRecord;
use moka::future::Cache;
use tracing::{debug, info};

/// Default time-to-live for cached entries (30 seconds)
pub const DEFAULT_JOB_CACHE_TTL_SECONDS: u64 = 30;

/// Default max capacity for the job cache
pub const DEFAULT_JOB_CACHE_MAX_CAPACITY: u64 = 1000;

/// Job cache configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCacheConfig {
    /// Time-to-live for cache entries
    pub ttl: Duration,

    /// Maximum number of cached jobs
    pub max_capacity: u64,
}

impl Default for JobCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_JOB_CACHE_TTL_SECONDS),
            max_capacity: DEFAULT_JOB_CACHE_MAX_CAPACITY,
        }
    }
}

impl JobCacheConfig {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, ..Self::default() }
    }

    pub fn log_config(&self) {
        info!(
            ttl_seconds = self.ttl.as_secs_f64(),
            max_capacity = self.max_capacity,
            "Job cache configuration loaded"
        );
    }
}

/// Invalidation epoch observed by a reader before it fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeneration(u64);

/// Concurrency-safe cache of job records.
#[derive(Clone)]
pub struct JobCache {
    jobs: Cache<String, Arc<JobRecord>>,
    listing: Cache<(), Arc<Vec<JobRecord>>>,
    generation: Arc<AtomicU64>,
}

impl JobCache {
    pub fn new(config: &JobCacheConfig) -> Self {
        config.log_config();
        Self {
            jobs: Cache::builder()
                .time_to_live(config.ttl)
                .max_capacity(config.max_capacity)
                .build(),
            listing: Cache::builder().time_to_live(config.ttl).max_capacity(1).build(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current generation; take it before fetching from the service.
    pub fn generation(&self) -> CacheGeneration {
        CacheGeneration(self.generation.load(Ordering::Acquire))
    }

    fn is_current(&self, seen: CacheGeneration) -> bool {
        self.generation() == seen
    }

    pub async fn job(&self, job_id: &str) -> Option<JobRecord> {
        let hit = self.jobs.get(job_id).await;
        debug!(job_id, hit = hit.is_some(), "job cache lookup");
        hit.map(|record| record.as_ref().clone())
    }

    /// Store a fetched job unless an invalidation happened since `seen`.
    pub async fn store_job(&self, record: &JobRecord, seen: CacheGeneration) {
        if !self.is_current(seen) {
            debug!(job_id = %record.job_id, "discarding job fetched before a mutation");
            return;
        }
        self.jobs.insert(record.job_id.clone(), Arc::new(record.clone())).await;
        // An invalidation may have landed between the check and the insert.
        if !self.is_current(seen) {
            self.jobs.invalidate(&record.job_id).await;
        }
    }

    pub async fn listing(&self) -> Option<Vec<JobRecord>> {
        let hit = self.listing.get(&()).await;
        debug!(hit = hit.is_some(), "job listing cache lookup");
        hit.map(|jobs| jobs.as_ref().clone())
    }

    /// Store a fetched listing unless an invalidation happened since `seen`.
    pub async fn store_listing(&self, jobs: &[JobRecord], seen: CacheGeneration) {
        if !self.is_current(seen) {
            debug!("discarding job listing fetched before a mutation");
            return;
        }
        self.listing.insert((), Arc::new(jobs.to_vec())).await;
        if !self.is_current(seen) {
            self.listing.invalidate(&()).await;
        }
    }

    /// Drop the listing and, when given, one job entry.
    pub async fn invalidate(&self, job_id: Option<&str>) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        if let Some(job_id) = job_id {
            self.jobs.invalidate(job_id).await;
        }
        self.listing.invalidate(&()).await;
        debug!(job_id, "job cache invalidated");
    }
}
