//! Stateful consumers of the session and the domain clients.
//!
//! DESIGN
//! ======
//! Requests are never cancelled when superseded. Instead each view stamps
//! every submission with a sequence number and applies a response only when
//! it answers the newest submission, so the last request submitted is the
//! one shown regardless of completion order.

pub mod navigator;
pub mod paged;
pub mod search;

pub use navigator::Navigator;
pub use paged::PagedView;
pub use search::SearchView;
