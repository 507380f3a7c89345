//! Network fetch abstraction.

mod http;

pub use http::{FetchError, Fetcher, ReqwestFetcher};

#[cfg(test)]
pub use http::tests::MockFetcher;
