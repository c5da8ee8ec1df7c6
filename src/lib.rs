//! Property Projection Engine for Australian investment property
//!
//! This crate models an investment property year by year: rental income,
//! loan interest and principal, Division 43 and Division 40 depreciation,
//! multi-investor negative-gearing tax benefits, cash flow and equity.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
