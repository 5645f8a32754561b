//! Audio resources: the capability traits the session drives, the download
//! cache, and the `rodio` adapter used at runtime.

mod cache;
mod clock;
mod resource;
mod sink;
mod types;

pub use cache::{BlobStore, HttpFetcher};
pub use resource::RodioFactory;
pub use types::{AudioResource, ResourceFactory, ResourceNotifier, SessionEvent};
