//! Advisory state tracking: row normalization and change classification.
//!
//! Both stages are pure; scraping, persistence and delivery live elsewhere.

pub mod differ;
pub mod normalizer;
