//! Run configuration: defaults, then environment, then command-line flags.
use clap::Parser;
use gearworks_store::TransformConfig;
use std::path::PathBuf;

/// Flatten the raw gear catalogue into costed gear records.
#[derive(Parser, Debug)]
#[command(name = "gearworks")]
#[command(about = "Flatten the raw gear catalogue into costed gear records")]
pub struct Args {
    /// Directory holding the collection files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Collection holding the raw catalogue document
    #[arg(long)]
    pub source: Option<String>,

    /// Collection replaced with the flattened records
    #[arg(long)]
    pub target: Option<String>,

    /// Deepest crafting chain walked before giving up
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Transform and report without clearing or writing the target
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Everything a run needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub transform: TransformConfig,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            transform: TransformConfig::default(),
            dry_run: false,
            verbose: false,
        }
    }
}

impl RunConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `GEARWORKS_DATA_DIR` - Collection directory (default: `data`)
    /// - `GEARWORKS_SOURCE` - Source collection (default: `raw_gear`)
    /// - `GEARWORKS_TARGET` - Target collection (default: `gear`)
    /// - `GEARWORKS_MAX_DEPTH` - Walk depth bound (default: 64)
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like [`RunConfig::from_env`], reading variables through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("GEARWORKS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(source) = lookup("GEARWORKS_SOURCE") {
            config.transform.source_collection = source;
        }
        if let Some(target) = lookup("GEARWORKS_TARGET") {
            config.transform.target_collection = target;
        }
        if let Some(depth) = lookup("GEARWORKS_MAX_DEPTH").and_then(|v| v.parse().ok()) {
            config.transform.max_depth = depth;
        }

        config
    }

    /// Command-line flags win over everything else.
    pub fn with_args(mut self, args: Args) -> Self {
        if let Some(dir) = args.data_dir {
            self.data_dir = dir;
        }
        if let Some(source) = args.source {
            self.transform.source_collection = source;
        }
        if let Some(target) = args.target {
            self.transform.target_collection = target;
        }
        if let Some(depth) = args.max_depth {
            self.transform.max_depth = depth;
        }
        self.dry_run = args.dry_run;
        self.verbose = args.verbose;
        self
    }
}
