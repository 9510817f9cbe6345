//! # ciftrim Core Library
//!
//! A library for preparing predicted protein structures (mmCIF format) for
//! downstream use by removing low-confidence terminal regions and cleaved
//! signal-peptide segments.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models
//!   (`StructureRecord`, `CleavagePrediction`), the pure sliding-window trimming
//!   functions, and I/O for the mmCIF and PDB formats (with transparent gzip
//!   handling).
//!
//! - **[`engine`]: The Logic Core.** This layer orchestrates interaction with
//!   external state: the TargetP subprocess adapter, the reconciliation of
//!   confidence trims with predicted cleavage sites, and progress reporting.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing
//!   layer. It partitions arbitrarily long input lists into bounded chunks,
//!   drives the full trim pipeline per chunk, and isolates per-file failures
//!   from the rest of the batch.

pub mod core;
pub mod engine;
pub mod workflows;
