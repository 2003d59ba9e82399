use anyhow::{ensure, Result};
use futures::future::{join_all, try_join_all};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use tracing::{debug, info, warn};

use crate::error::{FetchError, FetchResult};
use crate::filter::FilterCriteria;
use crate::paginator::PageState;
use crate::transport::{fetch_json, Endpoint, Transport};
use crate::types::{PagedResponse, ResultRecord};

/// What a batch does when some of its requests fail.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Any failure discards the whole batch.
    #[default]
    FailFast,
    /// Keep what arrived; fail only if nothing did.
    BestEffort,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BatchOutcome<T> {
    /// In id order, independent of completion order.
    pub records: Vec<T>,
    /// Ids that failed under [`BatchPolicy::BestEffort`]. Always empty for fail-fast.
    pub failures: Vec<(u32, FetchError)>,
}

/// Fetches ids `1..=count` of one resource concurrently.
#[derive(Clone, Debug)]
pub struct BatchFetcher<T> {
    endpoint: Endpoint,
    count: u32,
    policy: BatchPolicy,
    _record: PhantomData<fn() -> T>,
}

impl<T: ResultRecord> BatchFetcher<T> {
    pub fn new(endpoint: Endpoint, count: u32, policy: BatchPolicy) -> Result<Self> {
        ensure!(count > 0, "Batch size must be at least 1");

        Ok(Self {
            endpoint,
            count,
            policy,
            _record: PhantomData,
        })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn policy(&self) -> BatchPolicy {
        self.policy
    }

    pub async fn fetch(&self, transport: &dyn Transport) -> FetchResult<BatchOutcome<T>> {
        info!(
            endpoint = %self.endpoint.collection_url(),
            count = self.count,
            policy = ?self.policy,
            "Fetching batch"
        );

        let requests = (1..=self.count).map(|id| {
            let url = self.endpoint.item_url(id);
            async move { (id, fetch_json::<T>(transport, &url).await) }
        });

        match self.policy {
            BatchPolicy::FailFast => {
                // try_join_all keeps input order and drops the rest on the first error
                let records = try_join_all(requests.map(|request| async move {
                    let (id, result) = request.await;
                    result.map_err(|e| {
                        warn!(id, kind = e.kind(), error = %e, "Batch request failed");
                        e
                    })
                }))
                .await?;

                debug!(records = records.len(), "Batch complete");
                Ok(BatchOutcome {
                    records,
                    failures: Vec::new(),
                })
            }
            BatchPolicy::BestEffort => {
                let mut records = Vec::with_capacity(self.count as usize);
                let mut failures = Vec::new();

                for (id, result) in join_all(requests).await {
                    match result {
                        Ok(record) => records.push(record),
                        Err(e) => {
                            warn!(id, kind = e.kind(), error = %e, "Batch request failed, skipping");
                            failures.push((id, e));
                        }
                    }
                }

                if records.is_empty() && !failures.is_empty() {
                    let (_, first) = failures.swap_remove(0);
                    return Err(first);
                }

                debug!(
                    records = records.len(),
                    failed = failures.len(),
                    "Batch complete"
                );
                Ok(BatchOutcome { records, failures })
            }
        }
    }
}

/// One page of a filterable collection.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub state: PageState,
    pub records: Vec<T>,
}

/// Fetches `<base>/<resource>?page=N&...` one page at a time.
#[derive(Clone, Debug)]
pub struct PageFetcher<T> {
    endpoint: Endpoint,
    _record: PhantomData<fn() -> T>,
}

impl<T: ResultRecord> PageFetcher<T> {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            _record: PhantomData,
        }
    }

    pub async fn fetch(
        &self,
        transport: &dyn Transport,
        page: u32,
        criteria: &FilterCriteria,
    ) -> FetchResult<Page<T>> {
        let url = self.endpoint.page_url(page, criteria);
        info!(url = %url, page, "Fetching page");

        let response: PagedResponse<T> = fetch_json(transport, &url).await?;

        let state = PageState::settle(page, response.info.pages).ok_or_else(|| {
            FetchError::decode(
                url.as_str(),
                format!(
                    "page {} is outside the {} page(s) reported by the server",
                    page, response.info.pages
                ),
            )
        })?;

        debug!(page, total = state.total(), records = response.results.len(), "Page fetched");
        Ok(Page {
            state,
            records: response.results,
        })
    }
}
