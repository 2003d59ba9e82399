//! Fetch → store → render controllers.
//!
//! A pipeline owns its store, its page state and its renderer; nothing is
//! process-global, so several pipelines can run side by side. Network cycles
//! are generation-tracked: every cycle takes a new generation when it starts
//! and may only apply its result if no newer cycle has started since.

pub mod catalog;
pub mod paged;

pub use catalog::CatalogPipeline;
pub use paged::PagedPipeline;

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::error::FetchError;
use crate::renderer::Renderer;
use crate::transport::Transport;

/// What to do when a network cycle is triggered while another is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Start the new cycle; the older one is discarded when it lands.
    #[default]
    LatestWins,
    /// Drop the new trigger without issuing a request.
    IgnoreWhileBusy,
}

/// How a single trigger ended. The renderer has already been driven.
#[derive(Clone, Debug, PartialEq)]
pub enum CycleOutcome {
    /// The store was replaced and rendered.
    Applied { records: usize },
    /// The store was cleared and an error message rendered.
    Failed(FetchError),
    /// A newer cycle started before this one landed; its result was dropped.
    Superseded,
    /// Nothing was requested (busy under `IgnoreWhileBusy`, or no page to move to).
    Ignored,
}

impl CycleOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CycleOutcome::Applied { .. })
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            CycleOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PipelineOptions {
    pub overlap: OverlapPolicy,
    /// Shown in place of the list when a cycle fails. For paged pipelines
    /// this is only used for a 404, which the character API returns for
    /// "no match"; other failures show the error itself.
    pub failure_message: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            overlap: OverlapPolicy::default(),
            failure_message: "Error loading data".to_string(),
        }
    }
}

impl PipelineOptions {
    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }
}

/// Everything guarded by the pipeline lock.
pub(crate) struct Surface<S, R> {
    pub state: S,
    pub renderer: R,
    generation: u64,
    in_flight: usize,
}

pub(crate) struct Shared<S, R> {
    surface: Mutex<Surface<S, R>>,
    transport: Arc<dyn Transport>,
    overlap: OverlapPolicy,
}

impl<S, R: Renderer> Shared<S, R> {
    pub fn new(state: S, renderer: R, transport: Arc<dyn Transport>, overlap: OverlapPolicy) -> Self {
        Self {
            surface: Mutex::new(Surface {
                state,
                renderer,
                generation: 0,
                in_flight: 0,
            }),
            transport,
            overlap,
        }
    }

    /// Never held across an `.await`.
    pub fn lock(&self) -> MutexGuard<'_, Surface<S, R>> {
        // a panicking renderer must not wedge the pipeline
        self.surface.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().in_flight > 0
    }

    /// Start a network cycle: bump the generation and show the busy
    /// indicator. `None` means the overlap policy dropped the trigger.
    pub fn begin_cycle(&self) -> Option<CycleTicket<'_, S, R>> {
        let mut surface = self.lock();

        if self.overlap == OverlapPolicy::IgnoreWhileBusy && surface.in_flight > 0 {
            debug!(in_flight = surface.in_flight, "Cycle already in flight, ignoring trigger");
            return None;
        }

        surface.generation += 1;
        surface.in_flight += 1;
        if surface.in_flight == 1 {
            surface.renderer.set_busy(true);
        }

        Some(CycleTicket {
            shared: self,
            generation: surface.generation,
        })
    }
}

/// Proof of a running cycle. Dropping it (on any path, including a dropped
/// future) hides the busy indicator once no other cycle is in flight.
pub(crate) struct CycleTicket<'a, S, R: Renderer> {
    shared: &'a Shared<S, R>,
    generation: u64,
}

impl<S, R: Renderer> CycleTicket<'_, S, R> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True if no newer cycle has started since this one.
    pub fn is_current(&self, surface: &Surface<S, R>) -> bool {
        surface.generation == self.generation
    }
}

impl<S, R: Renderer> Drop for CycleTicket<'_, S, R> {
    fn drop(&mut self) {
        let mut surface = self.shared.lock();
        surface.in_flight = surface.in_flight.saturating_sub(1);
        if surface.in_flight == 0 {
            surface.renderer.set_busy(false);
        }
    }
}
