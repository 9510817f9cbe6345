//! # Core Module
//!
//! This module provides the fundamental building blocks for confidence-based
//! structure trimming: the data models, the pure boundary-trimming algorithm,
//! and file I/O for the structure formats involved.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules that handle different
//! aspects of the pipeline:
//!
//! - **Data Models** ([`models`]) - Structure records, atom hierarchies, and
//!   typed signal-peptide prediction rows
//! - **Boundary Trimming** ([`trim`]) - Pure sliding-window functions locating
//!   the trustworthy region of a per-residue confidence profile
//! - **File I/O** ([`io`]) - mmCIF reading, PDB writing, and gzip sniffing

pub mod io;
pub mod models;
pub mod trim;
