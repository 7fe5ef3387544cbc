pub mod models;
pub mod search;
pub mod sources;

pub use models::Listing;
pub use search::{search, Filters, SearchCriteria, SearchResult, SortOrder};
pub use sources::{HttpListingSource, JsonFileSource, ListingSource};
