//! Rendering contract.
//!
//! The pipelines never build markup. They project records into
//! [`DisplayUnit`]s and [`DetailView`]s and hand them to a [`Renderer`],
//! which owns whatever surface is being drawn on (terminal, DOM bridge, test
//! recorder). Every call replaces what the previous call of the same kind
//! drew.

use serde::Serialize;

use crate::types::RecordId;

/// One card in the result list. `id` is the selection key to pass back to
/// the pipeline's `select`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DisplayUnit {
    pub id: RecordId,
    pub name: String,
    pub image: Option<String>,
    pub caption: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetailFact {
    pub label: String,
    pub value: String,
}

impl DetailFact {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A horizontal stat bar. `percent` is already clamped to `0..=100`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatBar {
    pub name: String,
    pub value: u32,
    pub percent: f64,
    pub color: String,
}

impl StatBar {
    /// Bar width is half the base stat, so 200 fills the bar.
    pub fn new(name: &str, value: u32, color: &str) -> Self {
        Self {
            name: name.to_string(),
            value,
            percent: (f64::from(value) / 2.0).min(100.0),
            color: color.to_string(),
        }
    }
}

/// Projection of exactly one record for the detail panel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetailView {
    pub id: RecordId,
    pub name: String,
    pub image: Option<String>,
    /// Hex colour (`#rrggbb`) used for the panel border and stat bars.
    pub accent: Option<String>,
    pub facts: Vec<DetailFact>,
    pub stats: Vec<StatBar>,
}

/// Previous/next enablement for a paged listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationControls {
    pub current: u32,
    pub total: u32,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

impl PaginationControls {
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current, self.total)
    }
}

/// External drawing surface driven by the pipelines.
pub trait Renderer: Send {
    /// Replace the whole result list.
    fn render_list(&mut self, units: &[DisplayUnit]);

    /// Replace the detail panel.
    fn render_detail(&mut self, detail: &DetailView);

    /// Replace the result list with an error message.
    fn render_error(&mut self, message: &str);

    fn set_busy(&mut self, busy: bool);

    /// `None` clears the pagination text.
    fn render_pagination(&mut self, _controls: Option<&PaginationControls>) {}
}
