pub mod config;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod paginator;
pub mod pipeline;
pub mod presets;
pub mod renderer;
pub mod store;
pub mod transport;
pub mod types;

pub use crate::config::{load_config, BrowserConfig};
pub use error::{FetchError, FetchResult};
pub use fetcher::{BatchFetcher, BatchOutcome, BatchPolicy, Page, PageFetcher};
pub use filter::{filter_records, matches_query, CharacterStatus, FilterCriteria};
pub use paginator::PageState;
pub use pipeline::{CatalogPipeline, CycleOutcome, OverlapPolicy, PagedPipeline, PipelineOptions};
pub use renderer::{DetailFact, DetailView, DisplayUnit, PaginationControls, Renderer, StatBar};
pub use store::Store;
pub use transport::{Endpoint, HttpTransport, Transport};
pub use types::{Character, PagedResponse, Pokemon, RecordId, ResultRecord};
