//! Voter directory engine
//!
//! Serves paginated, filtered, searched views of the voter set with
//! minimal redundant store reads. The full set is fetched wholesale,
//! cached for a fixed window, and every search/filter/page request is an
//! in-memory pass over the cached snapshot.

use crate::config::{SEARCH_DEBOUNCE_MS, VOTERS_PATH, VOTER_CACHE_TTL_SECS};
use crate::store::{DocumentStore, VoterRecord};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Optional substring filters, combined with AND
#[derive(Debug, Clone, Default)]
pub struct VoterFilter {
    pub booth_number: String,
    pub polling_station: String,
}

/// 1-based page request
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

/// One page of matches plus the total match count across all pages
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub records: Vec<VoterRecord>,
    pub total_matches: usize,
    pub page: usize,
}

struct Snapshot {
    records: Vec<VoterRecord>,
    fetched_at: Option<Instant>,
}

/// Cached, filterable view over the voter set
#[derive(Clone)]
pub struct VoterDirectory {
    store: DocumentStore,
    cache: Arc<Mutex<Snapshot>>,
}

impl VoterDirectory {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            cache: Arc::new(Mutex::new(Snapshot {
                records: Vec::new(),
                fetched_at: None,
            })),
        }
    }

    /// Return the voter snapshot, hitting the store only when the cache
    /// is absent, older than the TTL, or a refresh is forced.
    ///
    /// A store read failure yields an empty set and leaves the cache
    /// untouched; nothing is retried automatically.
    pub async fn load(&self, force_refresh: bool) -> Vec<VoterRecord> {
        let mut cache = self.cache.lock().await;

        let fresh = cache
            .fetched_at
            .is_some_and(|at| at.elapsed() < Duration::from_secs(VOTER_CACHE_TTL_SECS));
        if fresh && !force_refresh {
            return cache.records.clone();
        }

        match self.fetch_all().await {
            Ok(records) => {
                tracing::debug!("Refreshed voter snapshot: {} records", records.len());
                cache.records = records;
                cache.fetched_at = Some(Instant::now());
                cache.records.clone()
            }
            Err(e) => {
                tracing::error!("Voter snapshot read failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_all(&self) -> crate::error::Result<Vec<VoterRecord>> {
        let documents = self.store.read_all(VOTERS_PATH).await?;

        let mut records = Vec::with_capacity(documents.len());
        for (path, value) in documents {
            match serde_json::from_value::<VoterRecord>(value) {
                Ok(mut record) => {
                    record.id = path.rsplit('/').next().unwrap_or_default().to_string();
                    records.push(record);
                }
                Err(e) => tracing::warn!("Skipping malformed voter at {}: {}", path, e),
            }
        }
        Ok(records)
    }

    /// Filter, search, and slice a snapshot. Pure: same inputs, same page.
    ///
    /// Every whitespace-separated token of `search` must appear
    /// case-insensitively in the concatenated name/voter-id/booth-number
    /// of a record; an empty search disables that predicate. The booth
    /// and polling-station filters are case-insensitive substring checks.
    /// Records keep the snapshot's relative order; pages past the end
    /// come back empty.
    pub fn query(
        records: &[VoterRecord],
        search: &str,
        filter: &VoterFilter,
        page: &PageRequest,
    ) -> QueryResult {
        let tokens: Vec<String> = search
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();
        let booth_filter = filter.booth_number.trim().to_lowercase();
        let station_filter = filter.polling_station.trim().to_lowercase();

        let matches: Vec<&VoterRecord> = records
            .iter()
            .filter(|r| {
                if tokens.is_empty() {
                    return true;
                }
                let haystack = format!("{} {} {}", r.name, r.voter_id, r.booth_number)
                    .to_lowercase();
                tokens.iter().all(|token| haystack.contains(token.as_str()))
            })
            .filter(|r| {
                booth_filter.is_empty() || r.booth_number.to_lowercase().contains(&booth_filter)
            })
            .filter(|r| {
                station_filter.is_empty()
                    || r.polling_station_address
                        .to_lowercase()
                        .contains(&station_filter)
            })
            .collect();

        let total_matches = matches.len();
        let start = page.page.saturating_sub(1).saturating_mul(page.page_size);
        let records = matches
            .into_iter()
            .skip(start)
            .take(page.page_size)
            .cloned()
            .collect();

        QueryResult {
            records,
            total_matches,
            page: page.page,
        }
    }

    /// Load (cache permitting) and query in one step
    pub async fn search(
        &self,
        search: &str,
        filter: &VoterFilter,
        page: &PageRequest,
    ) -> QueryResult {
        let snapshot = self.load(false).await;
        Self::query(&snapshot, search, filter, page)
    }
}

/// Accumulating list for the infinite-scroll presentation.
///
/// Page 1 replaces whatever is held; later pages append in order. Callers
/// wanting a clean list must explicitly go back to page 1.
#[derive(Debug, Default)]
pub struct DirectoryView {
    pub records: Vec<VoterRecord>,
    pub total_matches: usize,
    pub page: usize,
}

impl DirectoryView {
    pub fn apply(&mut self, result: QueryResult) {
        if result.page <= 1 {
            self.records = result.records;
        } else {
            self.records.extend(result.records);
        }
        self.page = result.page;
        self.total_matches = result.total_matches;
    }

    pub fn reset(&mut self) {
        self.records.clear();
        self.total_matches = 0;
        self.page = 0;
    }
}

/// Runs a task after a quiet period, dropping it if superseded.
///
/// Each `schedule` call aborts the pending task, so only the last request
/// within the quiet window executes. Dropping the debouncer aborts the
/// pending task too, which covers view teardown.
#[derive(Default)]
pub struct Debouncer {
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule with the standard search quiet period
    pub fn debounce<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.schedule(Duration::from_millis(SEARCH_DEBOUNCE_MS), task);
    }

    pub fn schedule<F>(&mut self, quiet: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            task.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
