pub mod cache;
pub mod client;
pub mod error;

pub use cache::{FetchCache, FileCache, MemoryCache, FRESHNESS_THRESHOLD};
pub use client::{LocationClient, LOCATION_URL};
pub use error::FetchError;
