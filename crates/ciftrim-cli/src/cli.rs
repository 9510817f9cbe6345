use clap::Parser;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    name = "ciftrim",
    author = "Darcy Jones",
    version,
    about = "Remove low-confidence ends and cleaved signal peptides from predicted protein structures.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// A newline-delimited file containing mmCIF paths to process.
    /// These can be gzipped. Use '-' to take from stdin.
    #[arg(value_name = "INFILES")]
    pub infiles: PathBuf,

    /// Where to store the processed PDB files.
    #[arg(short, long, value_name = "DIR", default_value = "processed_pdbs")]
    pub outdir: PathBuf,

    /// gzip-compress the output PDB files.
    #[arg(short = 'g', long)]
    pub compress: bool,

    /// The LDDT threshold to use for trimming low quality ends [1-100].
    #[arg(short, long, value_name = "FLOAT", default_value_t = 70.0)]
    pub threshold: f64,

    /// The size of the sliding window used to remove low quality ends.
    /// 1 will stop trimming after encountering the first residue passing the threshold.
    #[arg(short, long, value_name = "INT", default_value_t = 3)]
    pub window: usize,

    /// Run TargetP with the plant model. NB if sequences are a mix, use the plant model.
    #[arg(long)]
    pub plant: bool,

    /// Path to the targetp2 executable. If '--targetp' is given with no path,
    /// 'targetp' is looked up on PATH. When omitted entirely, the
    /// signal-peptide stage is skipped.
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = "targetp"
    )]
    pub targetp: Option<PathBuf>,

    /// How many structures to process at a time. Running TargetP with too few
    /// or too many sequences (>5000) at a time is slow, and every structure in
    /// a chunk is held in memory.
    #[arg(short = 'c', long, value_name = "INT", default_value_t = 1000)]
    pub chunksize: usize,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_the_input_list_is_given() {
        let cli = Cli::parse_from(["ciftrim", "files.txt"]);
        assert_eq!(cli.infiles, PathBuf::from("files.txt"));
        assert_eq!(cli.outdir, PathBuf::from("processed_pdbs"));
        assert_eq!(cli.threshold, 70.0);
        assert_eq!(cli.window, 3);
        assert_eq!(cli.chunksize, 1000);
        assert!(!cli.compress);
        assert!(!cli.plant);
        assert!(cli.targetp.is_none());
    }

    #[test]
    fn bare_targetp_flag_resolves_from_path() {
        let cli = Cli::parse_from(["ciftrim", "files.txt", "--targetp"]);
        assert_eq!(cli.targetp, Some(PathBuf::from("targetp")));
    }

    #[test]
    fn targetp_flag_accepts_an_explicit_path() {
        let cli = Cli::parse_from(["ciftrim", "files.txt", "--targetp", "/opt/targetp2/targetp"]);
        assert_eq!(cli.targetp, Some(PathBuf::from("/opt/targetp2/targetp")));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["ciftrim", "files.txt", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn stdin_sentinel_is_accepted_as_input_list() {
        let cli = Cli::parse_from(["ciftrim", "-", "-o", "out", "-g", "--plant", "-c", "500"]);
        assert_eq!(cli.infiles, PathBuf::from("-"));
        assert_eq!(cli.outdir, PathBuf::from("out"));
        assert!(cli.compress);
        assert!(cli.plant);
        assert_eq!(cli.chunksize, 500);
    }
}
