use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use log::LevelFilter;

use crate::climate::Variable;
use crate::data::{DataPaths, MissingRecordPolicy, Scenario};

/// Command-line options
#[derive(Parser, Debug)]
#[command(
    name = "bd-climate-map",
    version,
    about = "Choropleth of climate statistics over the districts of Bangladesh",
    long_about = None
)]
pub struct Cli {
    /// Directory holding the default data files
    #[arg(long, value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// District boundaries (GeoJSON)
    #[arg(long, value_name = "FILE")]
    pub boundaries: Option<PathBuf>,

    /// Climate records (JSON)
    #[arg(long, value_name = "FILE")]
    pub records: Option<PathBuf>,

    /// Story links (JSON, optional)
    #[arg(long, value_name = "FILE")]
    pub stories: Option<PathBuf>,

    /// Variable shown at startup: temperature, ncdd or nhotdays
    #[arg(long, value_name = "KEY", default_value = "temperature", value_parser = Variable::resolve)]
    pub variable: Variable,

    /// Climate series shown at startup
    #[arg(long, value_enum, default_value_t = Scenario::Future)]
    pub scenario: Scenario,

    /// How districts without a climate record are treated
    #[arg(long, value_enum, default_value_t = MissingRecordPolicy::Zero)]
    pub missing: MissingRecordPolicy,

    /// Print a per-district table and exit
    #[arg(long)]
    pub summary: bool,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// File locations, explicit paths taking precedence over `--data-dir`
    pub fn data_paths(&self) -> DataPaths {
        let defaults = DataPaths::in_dir(&self.data_dir);
        DataPaths {
            boundaries: self.boundaries.clone().unwrap_or(defaults.boundaries),
            records: self.records.clone().unwrap_or(defaults.records),
            stories: self.stories.clone().unwrap_or(defaults.stories),
        }
    }

    /// Install the env_logger backend. The TUI owns the terminal, so it only
    /// logs when a file is given; summary mode logs to stderr.
    pub fn init_logging(&self) -> Result<()> {
        let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));

        match (&self.log_file, self.summary) {
            (Some(path), _) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create log file {}", path.display()))?;
                builder.target(Target::Pipe(Box::new(file)));
            }
            (None, true) => {
                builder.target(Target::Stderr);
            }
            (None, false) => {
                builder.filter_level(LevelFilter::Off);
            }
        }

        builder.try_init().context("failed to initialise logging")
    }
}
