//! Strategic insights dashboard: metrics, rule findings, retailer scoring
//! and recommendations for one (brand, period) slice of sales records.

pub mod competition;
pub mod error;
pub mod metrics;
pub mod portfolio;
pub mod promotions;
pub mod recommendations;
pub mod rules;
pub mod scorer;
pub mod selection;
pub mod service;
pub mod trends;

pub use error::InsightsError;
