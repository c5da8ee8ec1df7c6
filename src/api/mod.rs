//! HTTP API module for the Property Projection Engine.
//!
//! This module provides the REST API endpoints for projecting properties
//! and portfolios and for one-off tax estimates.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{PortfolioRequest, ProjectionRequest, TaxEstimateRequest};
pub use response::{ApiError, TaxEstimateResponse};
pub use state::AppState;
