pub mod catalog;
pub mod file;
pub mod http;
pub mod traits;

pub use file::JsonFileSource;
pub use http::HttpListingSource;
pub use traits::ListingSource;
