//! # Engine Module
//!
//! This module orchestrates the parts of the pipeline that touch external
//! state: the TargetP subprocess, the merge of its cleavage predictions with
//! the confidence-derived trims, and progress reporting back to a frontend.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Batch parameters and the optional
//!   predictor invocation settings
//! - **Predictor Adapter** ([`predictor`]) - Runs TargetP over a chunk of
//!   sequences and parses its report into typed prediction rows
//! - **Reconciliation** ([`reconcile`]) - Merges a structure's trim
//!   boundaries with an optional predicted cleavage position
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//!   consumed by the CLI without coupling the core to a terminal

pub mod config;
pub mod predictor;
pub mod progress;
pub mod reconcile;
