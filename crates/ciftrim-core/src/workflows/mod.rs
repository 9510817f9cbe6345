//! # Workflows Module
//!
//! High-level entry points that orchestrate the complete trimming pipeline.
//!
//! ## Overview
//!
//! Workflows are the top-level API of the library. They partition the input
//! file list into bounded chunks, drive loading, prediction, reconciliation,
//! and rewriting per chunk, and isolate per-file and per-chunk failures so
//! one bad structure or one failed predictor invocation never takes down the
//! rest of the batch.
//!
//! - **Trim Workflow** ([`trim`]) - Confidence trimming with optional
//!   signal-peptide reconciliation, from a file list to a directory of
//!   trimmed PDB files.

pub mod trim;
