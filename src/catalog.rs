//! Track catalog: metadata types, the source interface and its HTTP client.
//!
//! The catalog is fetched as a whole and replaces any previous listing.

mod display;
mod http;
mod model;
mod source;

pub use display::{format_date, format_size, format_time};
pub use http::HttpCatalog;
pub use model::{TrackId, TrackMetadata};
pub use source::CatalogSource;
