//! Client for PromQL-compatible metrics backends.
//!
//! Two query shapes are supported, both filtered by a match expression:
//! - instant query for series existence (`/api/v1/query`)
//! - label values for a label (`/api/v1/label/<label>/values`)
//!
//! Calls use a bounded timeout and are never retried; a timeout or
//! non-success response surfaces as an error to the caller.

pub mod client;

pub use client::{MetricsError, MetricsQuerier, PromClient};
