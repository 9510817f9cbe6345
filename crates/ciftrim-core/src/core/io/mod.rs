//! Provides input/output functionality for the structure file formats handled
//! by the trimming pipeline.
//!
//! Input structures arrive as mmCIF files, plain or gzip-compressed; trimmed
//! output is written as PDB, optionally gzip-compressed. Compression is
//! detected by content, never by file extension.

pub mod cif;
pub mod gz;
pub mod pdb;
