mod cli;
mod error;
mod logging;
mod progress;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::progress::CliProgressHandler;
use ciftrim::engine::config::{Organism, PredictorConfig, TrimConfigBuilder};
use ciftrim::engine::progress::ProgressReporter;
use ciftrim::workflows;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("ciftrim v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let files = read_file_list(&cli.infiles)?;
    if files.is_empty() {
        warn!("The input list contains no file paths; nothing to do.");
        println!("No input files listed.");
        return Ok(());
    }

    let predictor = cli.targetp.map(|command| PredictorConfig {
        command,
        organism: if cli.plant {
            Organism::Plant
        } else {
            Organism::NonPlant
        },
    });
    if predictor.is_none() {
        info!("No predictor configured; the signal-peptide stage is skipped.");
    }

    let config = TrimConfigBuilder::new()
        .outdir(cli.outdir)
        .threshold(cli.threshold)
        .window(cli.window)
        .chunk_size(cli.chunksize)
        .compress(cli.compress)
        .predictor(predictor)
        .build()?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let summary = workflows::trim::run(&files, &config, &reporter)?;

    println!(
        "Processed {} file(s): {} written, {} skipped, {} rejected.",
        summary.files_seen,
        summary.structures_written,
        summary.files_skipped,
        summary.structures_rejected
    );
    if summary.chunks_failed > 0 {
        println!(
            "⚠ {} chunk(s) aborted on predictor errors; see the log for details.",
            summary.chunks_failed
        );
    }

    Ok(())
}

fn read_file_list(path: &Path) -> Result<Vec<PathBuf>> {
    let reader: Box<dyn BufRead> = if path == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(path).map_err(|source| CliError::FileList {
            path: path.to_path_buf(),
            source,
        })?;
        Box::new(BufReader::new(file))
    };

    let mut files = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|source| CliError::FileList {
            path: path.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            files.push(PathBuf::from(trimmed));
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_list_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("files.txt");
        std::fs::write(&list, "a.cif\n\n  \nb.cif.gz\n").unwrap();

        let files = read_file_list(&list).unwrap();
        assert_eq!(files, vec![PathBuf::from("a.cif"), PathBuf::from("b.cif.gz")]);
    }

    #[test]
    fn missing_file_list_names_the_offending_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        let err = read_file_list(&missing).unwrap_err();
        match err {
            CliError::FileList { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
