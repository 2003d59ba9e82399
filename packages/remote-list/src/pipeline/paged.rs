use std::sync::Arc;
use tracing::{debug, error, info};

use super::{CycleOutcome, PipelineOptions, Shared};
use crate::error::FetchError;
use crate::fetcher::PageFetcher;
use crate::filter::FilterCriteria;
use crate::paginator::PageState;
use crate::renderer::{DisplayUnit, Renderer};
use crate::store::Store;
use crate::transport::Transport;
use crate::types::{RecordId, ResultRecord};

pub(crate) struct PagedState<T> {
    store: Store<T>,
    page: PageState,
    criteria: FilterCriteria,
}

/// Server-side paginated and filtered listing.
pub struct PagedPipeline<T, R> {
    shared: Arc<Shared<PagedState<T>, R>>,
    fetcher: Arc<PageFetcher<T>>,
    not_found_message: Arc<str>,
}

impl<T, R> Clone for PagedPipeline<T, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            fetcher: Arc::clone(&self.fetcher),
            not_found_message: Arc::clone(&self.not_found_message),
        }
    }
}

impl<T: ResultRecord, R: Renderer> PagedPipeline<T, R> {
    pub fn new(
        fetcher: PageFetcher<T>,
        transport: Arc<dyn Transport>,
        renderer: R,
        options: PipelineOptions,
    ) -> Self {
        let state = PagedState {
            store: Store::new(),
            page: PageState::new(),
            criteria: FilterCriteria::default(),
        };

        Self {
            shared: Arc::new(Shared::new(state, renderer, transport, options.overlap)),
            fetcher: Arc::new(fetcher),
            not_found_message: options.failure_message.into(),
        }
    }

    fn failure_text(&self, err: &FetchError) -> String {
        match err.status() {
            Some(404) => self.not_found_message.to_string(),
            _ => err.to_string(),
        }
    }

    /// Fetch `page` with the current criteria. On failure the page state is
    /// left where it was.
    pub async fn fetch_page(&self, page: u32) -> CycleOutcome {
        let criteria = self.shared.lock().state.criteria.clone();

        let Some(ticket) = self.shared.begin_cycle() else {
            return CycleOutcome::Ignored;
        };

        let result = self
            .fetcher
            .fetch(self.shared.transport(), page, &criteria)
            .await;

        let mut surface = self.shared.lock();
        if !ticket.is_current(&surface) {
            debug!(page, generation = ticket.generation(), "Discarding superseded page");
            return CycleOutcome::Superseded;
        }

        let outcome = match result {
            Ok(fetched) => {
                surface.state.store.replace(fetched.records);
                surface.state.page = fetched.state;

                let units: Vec<DisplayUnit> = surface
                    .state
                    .store
                    .records()
                    .iter()
                    .map(ResultRecord::display_unit)
                    .collect();
                let controls = surface.state.page.controls();

                surface.renderer.render_list(&units);
                surface.renderer.render_pagination(Some(&controls));

                info!(
                    page = controls.current,
                    total = controls.total,
                    records = units.len(),
                    "Page loaded"
                );
                CycleOutcome::Applied {
                    records: units.len(),
                }
            }
            Err(e) => {
                error!(page, kind = e.kind(), error = %e, "Page load failed");
                let message = self.failure_text(&e);

                surface.state.store.clear();
                surface.renderer.render_error(&message);
                surface.renderer.render_pagination(None);
                CycleOutcome::Failed(e)
            }
        };

        drop(surface);
        outcome
    }

    /// Replace the criteria and start over from page 1.
    pub async fn search(&self, criteria: FilterCriteria) -> CycleOutcome {
        debug!(?criteria, "Search");
        self.shared.lock().state.criteria = criteria;
        self.fetch_page(1).await
    }

    /// Replace the criteria without fetching; applies from the next `fetch_page`.
    pub fn set_criteria(&self, criteria: FilterCriteria) {
        self.shared.lock().state.criteria = criteria;
    }

    /// Reset every filter field and reload page 1.
    pub async fn clear_filters(&self) -> CycleOutcome {
        self.search(FilterCriteria::default()).await
    }

    /// Move forward one page; a no-op on the last page.
    pub async fn next_page(&self) -> CycleOutcome {
        let next = self.shared.lock().state.page.next();
        match next {
            Some(page) => self.fetch_page(page).await,
            None => CycleOutcome::Ignored,
        }
    }

    /// Move back one page; a no-op on page 1.
    pub async fn previous_page(&self) -> CycleOutcome {
        let previous = self.shared.lock().state.page.previous();
        match previous {
            Some(page) => self.fetch_page(page).await,
            None => CycleOutcome::Ignored,
        }
    }

    /// Show the detail view for `id`. Returns false if it is not on the current page.
    pub fn select(&self, id: &RecordId) -> bool {
        let mut surface = self.shared.lock();

        let Some(detail) = surface.state.store.find(id).map(ResultRecord::detail_view) else {
            debug!(%id, "Selected record not on current page");
            return false;
        };

        surface.renderer.render_detail(&detail);
        true
    }

    pub fn records(&self) -> Vec<T> {
        self.shared.lock().state.store.records().to_vec()
    }

    pub fn page_state(&self) -> PageState {
        self.shared.lock().state.page
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.shared.lock().state.criteria.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.shared.is_busy()
    }
}
