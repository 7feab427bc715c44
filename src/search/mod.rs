//! Places search: provider interface, Google client and pagination

mod google;
mod paginator;
mod provider;

pub use google::GooglePlacesClient;
pub use paginator::{fetch_page, PageFetch, SearchPaginator, DEFAULT_MAX_PAGES};
pub use provider::{PlaceSummary, PlacesProvider, ProviderError, ProviderResult, SearchPage};
