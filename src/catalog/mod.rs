//! Travel catalog
//!
//! Seed data, the mock data service on top of it, and package search.

pub mod data;
pub mod search;
pub mod service;

pub use search::{SearchOutcome, filter_packages, search};
pub use service::TravelService;
