use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::{CycleOutcome, PipelineOptions, Shared};
use crate::fetcher::BatchFetcher;
use crate::filter::{filter_records, matches_query};
use crate::renderer::{DetailView, DisplayUnit, Renderer};
use crate::store::Store;
use crate::transport::Transport;
use crate::types::{RecordId, ResultRecord};

/// Projection used when a card is selected.
pub type DetailProjector<T> = fn(&T) -> DetailView;

pub(crate) struct CatalogState<T> {
    store: Store<T>,
    query: String,
}

impl<T: ResultRecord> CatalogState<T> {
    fn find_visible(&self, id: &RecordId) -> Option<&T> {
        self.store
            .find(id)
            .filter(|record| matches_query(*record, &self.query))
    }

    fn visible_units(&self) -> Vec<DisplayUnit> {
        filter_records(self.store.records(), &self.query)
            .into_iter()
            .map(ResultRecord::display_unit)
            .collect()
    }
}

/// Fixed-range catalog: fetch ids `1..=N` once, then filter locally.
pub struct CatalogPipeline<T, R> {
    shared: Arc<Shared<CatalogState<T>, R>>,
    fetcher: Arc<BatchFetcher<T>>,
    detail: DetailProjector<T>,
    failure_message: Arc<str>,
}

impl<T, R> Clone for CatalogPipeline<T, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            fetcher: Arc::clone(&self.fetcher),
            detail: self.detail,
            failure_message: Arc::clone(&self.failure_message),
        }
    }
}

impl<T: ResultRecord, R: Renderer> CatalogPipeline<T, R> {
    pub fn new(
        fetcher: BatchFetcher<T>,
        transport: Arc<dyn Transport>,
        renderer: R,
        options: PipelineOptions,
    ) -> Self {
        let state = CatalogState {
            store: Store::new(),
            query: String::new(),
        };

        Self {
            shared: Arc::new(Shared::new(state, renderer, transport, options.overlap)),
            fetcher: Arc::new(fetcher),
            detail: T::detail_view,
            failure_message: options.failure_message.into(),
        }
    }

    /// Override the record's own detail projection.
    pub fn with_detail(mut self, detail: DetailProjector<T>) -> Self {
        self.detail = detail;
        self
    }

    /// Fetch the whole range and render it. The store is replaced only when
    /// the batch policy accepts the result; otherwise it is cleared.
    pub async fn load(&self) -> CycleOutcome {
        let Some(ticket) = self.shared.begin_cycle() else {
            return CycleOutcome::Ignored;
        };

        let result = self.fetcher.fetch(self.shared.transport()).await;

        let mut surface = self.shared.lock();
        if !ticket.is_current(&surface) {
            debug!(generation = ticket.generation(), "Discarding superseded catalog load");
            return CycleOutcome::Superseded;
        }

        let outcome = match result {
            Ok(batch) => {
                if !batch.failures.is_empty() {
                    let ids: Vec<u32> = batch.failures.iter().map(|(id, _)| *id).collect();
                    warn!(?ids, "Catalog loaded with missing records");
                }

                surface.state.store.replace(batch.records);
                let units = surface.state.visible_units();
                surface.renderer.render_list(&units);

                info!(records = surface.state.store.len(), "Catalog loaded");
                CycleOutcome::Applied {
                    records: surface.state.store.len(),
                }
            }
            Err(e) => {
                error!(kind = e.kind(), error = %e, "Catalog load failed");
                surface.state.store.clear();
                surface.renderer.render_error(&self.failure_message);
                CycleOutcome::Failed(e)
            }
        };

        // release the lock before the ticket's drop takes it again
        drop(surface);
        outcome
    }

    /// Live filter: re-render the store through `query`. No network.
    /// Returns how many records are visible.
    pub fn filter(&self, query: &str) -> usize {
        let mut surface = self.shared.lock();
        surface.state.query = query.to_string();

        let units = surface.state.visible_units();
        surface.renderer.render_list(&units);

        debug!(query, visible = units.len(), "Filter applied");
        units.len()
    }

    /// Set the live filter without rendering. The next `load` or `filter`
    /// renders through it.
    pub fn set_query(&self, query: &str) {
        self.shared.lock().state.query = query.to_string();
    }

    /// Show the detail view for `id`. Only cards the live filter currently
    /// shows can be selected; returns false otherwise.
    pub fn select(&self, id: &RecordId) -> bool {
        let mut surface = self.shared.lock();
        if surface.state.store.is_empty() {
            debug!(%id, "Nothing loaded to select from");
            return false;
        }

        let Some(detail) = surface.state.find_visible(id).map(self.detail) else {
            debug!(%id, query = %surface.state.query, "Selected record not visible");
            return false;
        };

        surface.renderer.render_detail(&detail);
        true
    }

    pub fn records(&self) -> Vec<T> {
        self.shared.lock().state.store.records().to_vec()
    }

    /// Records currently passing the live filter.
    pub fn visible(&self) -> Vec<T> {
        let surface = self.shared.lock();
        filter_records(surface.state.store.records(), &surface.state.query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn query(&self) -> String {
        self.shared.lock().state.query.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.shared.is_busy()
    }

    pub fn fetcher(&self) -> &BatchFetcher<T> {
        &self.fetcher
    }
}
