//! HTTP plumbing shared by every backend domain.

pub mod http;
pub mod paging;
pub mod types;

pub use http::DomainClient;
pub use paging::{Page, PageRequest};
