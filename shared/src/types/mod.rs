//! Type definitions shared by the API and the services

pub mod pagination;

pub use pagination::{PaginatedResponse, Pagination};
