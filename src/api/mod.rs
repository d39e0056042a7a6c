//! REST API endpoints and their shared error type
pub mod v1;
