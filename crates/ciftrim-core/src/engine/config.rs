use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Parameter {0} must be at least 1")]
    ZeroParameter(&'static str),
}

/// Which TargetP organism model to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Organism {
    Plant,
    NonPlant,
}

impl Organism {
    /// Value passed to the predictor's `-org` flag.
    pub fn flag(&self) -> &'static str {
        match self {
            Organism::Plant => "pl",
            Organism::NonPlant => "non-pl",
        }
    }
}

/// How to invoke the external signal-peptide predictor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictorConfig {
    /// Executable path or bare command name resolved from `PATH`.
    pub command: PathBuf,
    pub organism: Organism,
}

/// Parameters of one trimming batch.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimConfig {
    pub outdir: PathBuf,
    /// Confidence threshold in the units of the local metric (1-100).
    pub threshold: f64,
    /// Sliding-window size; 1 stops at the first residue passing the threshold.
    pub window: usize,
    /// Structures held in memory (and sent to the predictor) at a time.
    pub chunk_size: usize,
    pub compress: bool,
    /// When `None`, the signal-peptide stage is skipped entirely.
    pub predictor: Option<PredictorConfig>,
}

#[derive(Debug, Clone)]
pub struct TrimConfigBuilder {
    outdir: PathBuf,
    threshold: f64,
    window: usize,
    chunk_size: usize,
    compress: bool,
    predictor: Option<PredictorConfig>,
}

impl Default for TrimConfigBuilder {
    fn default() -> Self {
        Self {
            outdir: PathBuf::from("processed_pdbs"),
            threshold: 70.0,
            window: 3,
            chunk_size: 1000,
            compress: false,
            predictor: None,
        }
    }
}

impl TrimConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outdir(mut self, outdir: PathBuf) -> Self {
        self.outdir = outdir;
        self
    }
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
    pub fn predictor(mut self, predictor: Option<PredictorConfig>) -> Self {
        self.predictor = predictor;
        self
    }

    pub fn build(self) -> Result<TrimConfig, ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::ZeroParameter("window"));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroParameter("chunk_size"));
        }
        Ok(TrimConfig {
            outdir: self.outdir,
            threshold: self.threshold,
            window: self.window,
            chunk_size: self.chunk_size,
            compress: self.compress,
            predictor: self.predictor,
        })
    }
}
