//! HTTP REST interface
//!
//! - `common`: response envelope, error mapping, validated JSON, date parsing
//! - `modules`: handlers and DTOs per resource
//! - `router`: route table, auth layers and Swagger UI

pub mod common;
pub mod modules;
pub mod router;

pub use common::{ApiError, ApiResponse};
pub use router::{create_api_router, ApiDoc};
