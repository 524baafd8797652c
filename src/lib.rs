//! # pairwise-statistics
//!
//! Paired statistical comparison of algorithms measured over the same segments.
//!
//! Each input table holds one numeric column per algorithm, one row per
//! segment. For every unordered pair of algorithms the crate computes a paired
//! t-test with a confidence interval for the mean difference, a Shapiro-Wilk
//! normality check on the differences, a Wilcoxon signed-rank test and a
//! paired Cohen's d. The p-values of one table form a family that is adjusted
//! with Bonferroni, Holm and Benjamini-Hochberg.
//!
//! ## Module Organization
//!
//! - **[`config`]**: Explicit run configuration
//! - **[`data`]**: Loading and schema validation of input tables
//! - **[`testing`]**: Statistical tests, effect sizes and multiple testing correction
//! - **[`comparison`]**: Pairwise records and per-table families
//! - **[`report`]**: Fixed-precision CSV output
//! - **[`pipeline`]**: Batch discovery and orchestration

pub mod comparison;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod testing;
