//! Response envelope and query helpers shared by every route.

pub mod envelope;
pub mod pagination;

pub use envelope::{ApiResponse, PageMeta};
pub use pagination::{parse_pagination, Pagination, PaginationQuery};
