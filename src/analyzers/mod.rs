//! Cycle segmentation and multi-method rate aggregation.
//!
//! This module partitions each vehicle's orders into refuel-to-refuel
//! cycles, reduces cycles to per-vehicle summaries, computes per-period
//! cost-per-distance under four inclusion policies, and compares the
//! policies over a period window.

pub mod aggregate;
pub mod cache;
pub mod compare;
pub mod completeness;
pub mod overview;
pub mod segmenter;
pub mod summary;
pub mod types;
pub mod utility;
