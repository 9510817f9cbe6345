use crate::core::io::cif::{self, CifError};
use crate::core::io::gz;
use crate::core::io::pdb::{self, ChainPolicy, PdbError, Selection};
use crate::core::models::record::StructureRecord;
use crate::engine::config::TrimConfig;
use crate::engine::predictor::{self, PredictorError};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::reconcile::{TrimInterval, reconcile};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum TrimError {
    #[error("Failed to create output directory '{path}': {source}", path = path.display())]
    CreateOutdir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
enum WriteError {
    #[error(transparent)]
    Cif(#[from] CifError),
    #[error(transparent)]
    Pdb(#[from] PdbError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome counters for one batch, for operator reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimSummary {
    pub files_seen: usize,
    pub structures_written: usize,
    pub files_skipped: usize,
    pub structures_rejected: usize,
    pub chunks_failed: usize,
}

/// Splits `items` into chunks of `chunk_size`, merging a small tail.
///
/// A final chunk shorter than a tenth of `chunk_size` is folded into the
/// previous chunk instead of being processed separately, so the predictor is
/// never invoked over a handful of leftover sequences.
pub fn partition_chunks<T>(items: &[T], chunk_size: usize) -> Vec<&[T]> {
    let min_tail = (chunk_size as f64 / 10.0).round() as usize;
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < items.len() {
        if start + chunk_size + min_tail > items.len() {
            chunks.push(&items[start..]);
            break;
        }
        chunks.push(&items[start..start + chunk_size]);
        start += chunk_size;
    }
    chunks
}

/// Runs the full trimming pipeline over `files`.
///
/// Per-file load failures are logged and skipped; a predictor failure aborts
/// only the chunk it happened in. Neither ever aborts the batch, so the
/// returned summary always covers every input file.
#[instrument(skip_all, name = "trim_workflow")]
pub fn run(
    files: &[PathBuf],
    config: &TrimConfig,
    reporter: &ProgressReporter,
) -> Result<TrimSummary, TrimError> {
    std::fs::create_dir_all(&config.outdir).map_err(|source| TrimError::CreateOutdir {
        path: config.outdir.clone(),
        source,
    })?;

    let mut summary = TrimSummary {
        files_seen: files.len(),
        ..TrimSummary::default()
    };

    reporter.report(Progress::BatchStart {
        total_files: files.len() as u64,
    });

    let chunks = partition_chunks(files, config.chunk_size);
    info!(
        "Processing {} file(s) in {} chunk(s).",
        files.len(),
        chunks.len()
    );

    for (index, chunk) in chunks.into_iter().enumerate() {
        reporter.report(Progress::ChunkStart {
            index,
            files: chunk.len() as u64,
        });
        if let Err(e) = process_chunk(index, chunk, config, reporter, &mut summary) {
            error!("Chunk {} aborted: {}", index, e);
            summary.chunks_failed += 1;
        }
        reporter.report(Progress::ChunkFinish);
    }

    info!(
        "Batch finished: {} written, {} skipped, {} rejected, {} chunk(s) failed.",
        summary.structures_written,
        summary.files_skipped,
        summary.structures_rejected,
        summary.chunks_failed
    );
    reporter.report(Progress::BatchFinish);
    Ok(summary)
}

fn process_chunk(
    index: usize,
    chunk: &[PathBuf],
    config: &TrimConfig,
    reporter: &ProgressReporter,
    summary: &mut TrimSummary,
) -> Result<(), PredictorError> {
    let mut records: Vec<StructureRecord> = Vec::with_capacity(chunk.len());
    for path in chunk {
        match StructureRecord::from_path(path, config.threshold, config.window) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                summary.files_skipped += 1;
            }
        }
        reporter.report(Progress::FileDone);
    }

    if records.is_empty() {
        info!("Chunk {} holds no usable structures, skipping.", index);
        return Ok(());
    }

    let predictions = match &config.predictor {
        Some(predictor_config) => {
            let sequences: Vec<(&str, &str)> = records
                .iter()
                .map(|r| (r.id.as_str(), r.sequence.as_str()))
                .collect();
            predictor::predict(predictor_config, &sequences)?
        }
        None => HashMap::new(),
    };

    for record in &records {
        match reconcile(record, predictions.get(record.id.as_str())) {
            Some(interval) => match write_trimmed(record, interval, config) {
                Ok(()) => summary.structures_written += 1,
                Err(e) => {
                    warn!("Failed to write {}: {}", record.source_path.display(), e);
                    summary.files_skipped += 1;
                }
            },
            None => {
                debug!(
                    "Rejecting {}: reconciled boundaries cross.",
                    record.source_path.display()
                );
                summary.structures_rejected += 1;
            }
        }
    }

    Ok(())
}

/// Re-reads the source structure and writes the selected residue range.
///
/// Atom records are only held in memory here, one structure at a time, which
/// keeps the per-chunk footprint to sequences and confidence profiles.
fn write_trimmed(
    record: &StructureRecord,
    interval: TrimInterval,
    config: &TrimConfig,
) -> Result<(), WriteError> {
    let reader = gz::open(&record.source_path)?;
    let structure = cif::read_structure(reader)?;
    let selection = Selection::new(ChainPolicy::FirstOnly, interval.start, interval.end);

    let stem = output_stem(&record.source_path);
    if config.compress {
        let path = config.outdir.join(format!("{stem}.pdb.gz"));
        let file = File::create(&path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        pdb::write_structure(&mut encoder, &structure, &selection)?;
        encoder.finish()?;
        debug!("Wrote {}", path.display());
    } else {
        let path = config.outdir.join(format!("{stem}.pdb"));
        pdb::write_structure(BufWriter::new(File::create(&path)?), &structure, &selection)?;
        debug!("Wrote {}", path.display());
    }
    Ok(())
}

/// Output filename stem: the input basename with a trailing `.gz` and the
/// structure extension stripped.
fn output_stem(path: &Path) -> String {
    let name = path.file_name().map(Path::new).unwrap_or(path);
    let name = if name
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
    {
        name.file_stem().map(Path::new).unwrap_or(name)
    } else {
        name
    };
    name.file_stem()
        .unwrap_or(name.as_os_str())
        .to_string_lossy()
        .into_owned()
}
