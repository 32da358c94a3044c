// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Application configuration.
//!
//! Every setting can be given by several sources. Where the same setting is
//! supplied more than once the following priority order applies, highest
//! first:
//!  1. command-line arguments.
//!  2. environment variables, named after the setting with a `DPHIL_`
//!     prefix, for example `DPHIL_ACTOR_COUNT`.
//!  3. the TOML file named by `--conf-file`.
//!  4. the compiled-in defaults.
//!
//! A configuration file could contain, for example:
//! ```toml
//! actor_count = 7
//! strategy = "leftie"
//! time_unit_ms = 10
//! stdout_level = "debug"
//! ```

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use dphil_engine::engine::SimulationConfig;
use dphil_resources::ActorId;
use dphil_strategies::StrategyKind;
use dphil_track::builder::{TrackerConfig, TrackersConfig};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Prefix of the environment variables that configure the application.
pub const ENV_PREFIX: &str = "DPHIL_";

const DEFAULT_ACTOR_COUNT: usize = 5;
const DEFAULT_RUN_DURATION: u64 = 100;
const DEFAULT_TIME_UNIT_MS: u64 = 1000;
const DEFAULT_MIN_HOLD: u64 = 1;
const DEFAULT_MAX_HOLD: u64 = 3;
const DEFAULT_LEFTIE: usize = 0;
const DEFAULT_STDOUT: bool = true;
const DEFAULT_STDOUT_LEVEL: log::Level = log::Level::Info;
const DEFAULT_LOG_FILE_LEVEL: log::Level = log::Level::Trace;
const DEFAULT_PROGRESS: bool = false;

#[derive(Debug, PartialEq)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Configuration error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Command-line arguments.
#[derive(Parser, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[command(about = "Dining philosophers resource arbitration simulator")]
pub struct Config {
    /// Number of actors seated at the table, and so of utensils
    #[arg(short = 'n', long)]
    pub actor_count: Option<usize>,

    /// Length of the run in time units
    #[arg(short = 'd', long)]
    pub run_duration: Option<u64>,

    /// Strategy used to arbitrate access to the utensils
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyKind>,

    /// Length of one time unit in milliseconds
    #[arg(long)]
    pub time_unit_ms: Option<u64>,

    /// Shortest think or eat hold in time units
    #[arg(long)]
    pub min_hold: Option<u64>,

    /// Longest think or eat hold in time units
    #[arg(long)]
    pub max_hold: Option<u64>,

    /// Seed for the random hold times. Random when not given.
    #[arg(long)]
    pub seed: Option<u64>,

    /// The actor which takes its right utensil first with the `leftie`
    /// strategy
    #[arg(long)]
    pub leftie: Option<usize>,

    /// Maximum number of meals each actor eats before leaving the table
    #[arg(long)]
    pub cycle_limit: Option<u64>,

    /// Enable logging to the console
    #[arg(long)]
    pub stdout: Option<bool>,

    /// Level of log message to display
    #[arg(long)]
    pub stdout_level: Option<log::Level>,

    /// Set a regular expression for which entities should have logging level
    /// set to `--stdout-level`. Others will have level set to `Error`.
    #[arg(long)]
    pub stdout_filter_regex: Option<String>,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<String>,

    /// Level of log message to write to `--log-file`
    #[arg(long)]
    pub log_file_level: Option<log::Level>,

    /// Set a regular expression for which entities should have logging level
    /// set to `--log-file-level`. Others will have level set to `Error`.
    #[arg(long)]
    pub log_file_filter_regex: Option<String>,

    /// Show a progress bar over the run duration
    #[arg(long)]
    pub progress: Option<bool>,

    /// Path to additional configuration file
    ///
    /// This additional configuration file must contain TOML, and set values
    /// for fields of this struct.
    #[arg(long)]
    pub conf_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            actor_count: Some(DEFAULT_ACTOR_COUNT),
            run_duration: Some(DEFAULT_RUN_DURATION),
            strategy: Some(StrategyKind::default()),
            time_unit_ms: Some(DEFAULT_TIME_UNIT_MS),
            min_hold: Some(DEFAULT_MIN_HOLD),
            max_hold: Some(DEFAULT_MAX_HOLD),
            seed: None,
            leftie: Some(DEFAULT_LEFTIE),
            cycle_limit: None,
            stdout: Some(DEFAULT_STDOUT),
            stdout_level: Some(DEFAULT_STDOUT_LEVEL),
            stdout_filter_regex: Some(String::new()),
            log_file: None,
            log_file_level: Some(DEFAULT_LOG_FILE_LEVEL),
            log_file_filter_regex: Some(String::new()),
            progress: Some(DEFAULT_PROGRESS),
            conf_file: None,
        }
    }
}

/// Everything needed to start a run, checked for consistency.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub simulation: SimulationConfig,
    pub strategy: StrategyKind,
    pub leftie: ActorId,
    pub progress: bool,
}

impl Config {
    /// Parse the command line and merge in all other sources.
    ///
    /// Exits the process on `--help` or unparsable arguments.
    pub fn parse_all_sources() -> Result<Config, ConfigError> {
        Self::from_cli(Self::parse())
    }

    /// As [parse_all_sources](Self::parse_all_sources) but with the given
    /// arguments in place of the process command line.
    pub fn parse_all_sources_from<I, T>(args: I) -> Result<Config, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Self::try_parse_from(args).map_err(|e| ConfigError(e.to_string()))?;
        Self::from_cli(cli)
    }

    /// Merge already parsed command-line arguments over the other sources.
    pub fn from_cli(cli: Config) -> Result<Config, ConfigError> {
        let config = Self::clap_merge(Self::figment_to_config(None)?, &cli);

        // The configuration file can itself be named by any source
        match &config.conf_file {
            Some(conf_file) if !conf_file.as_os_str().is_empty() => {
                check_conf_file(conf_file)?;
                let config = Self::figment_to_config(Some(conf_file))?;
                Ok(Self::clap_merge(config, &cli))
            }
            _ => Ok(config),
        }
    }

    fn figment_to_config(conf_file: Option<&Path>) -> Result<Config, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(conf_file) = conf_file {
            figment = figment.merge(Toml::file(conf_file));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));
        figment.extract().map_err(|e| ConfigError(e.to_string()))
    }

    fn clap_merge(mut config: Config, cli: &Config) -> Config {
        macro_rules! merge {
            ($($field:ident),+) => {
                $(
                    if cli.$field.is_some() {
                        config.$field = cli.$field.clone();
                    }
                )+
            };
        }
        merge!(
            actor_count,
            run_duration,
            strategy,
            time_unit_ms,
            min_hold,
            max_hold,
            seed,
            leftie,
            cycle_limit,
            stdout,
            stdout_level,
            stdout_filter_regex,
            log_file,
            log_file_level,
            log_file_filter_regex,
            progress,
            conf_file
        );
        config
    }

    /// Check the settings and turn them into the configuration of a run.
    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        let actor_count = self.actor_count.unwrap_or(DEFAULT_ACTOR_COUNT);
        if actor_count < 2 {
            return Err(ConfigError(format!(
                "actor_count must be at least 2, not {actor_count}"
            )));
        }

        let min_hold = self.min_hold.unwrap_or(DEFAULT_MIN_HOLD);
        let max_hold = self.max_hold.unwrap_or(DEFAULT_MAX_HOLD);
        if min_hold > max_hold {
            return Err(ConfigError(format!(
                "min_hold ({min_hold}) must not be above max_hold ({max_hold})"
            )));
        }

        let run_duration = self.run_duration.unwrap_or(DEFAULT_RUN_DURATION);
        let time_unit_ms = self.time_unit_ms.unwrap_or(DEFAULT_TIME_UNIT_MS);
        if time_unit_ms == 0 && run_duration > 0 {
            return Err(ConfigError(
                "time_unit_ms must be above 0 for a run with a duration".to_string(),
            ));
        }

        let leftie = self.leftie.unwrap_or(DEFAULT_LEFTIE);
        if leftie >= actor_count {
            return Err(ConfigError(format!(
                "leftie must be one of the {actor_count} actors, not {leftie}"
            )));
        }

        Ok(RunConfig {
            simulation: SimulationConfig {
                actor_count,
                run_duration,
                time_unit: Duration::from_millis(time_unit_ms),
                min_hold,
                max_hold,
                seed: self.seed,
                meal_limit: self.cycle_limit,
            },
            strategy: self.strategy.unwrap_or_default(),
            leftie: ActorId(leftie),
            progress: self.progress.unwrap_or(DEFAULT_PROGRESS),
        })
    }

    pub fn trackers_config(&self) -> TrackersConfig<'_> {
        TrackersConfig {
            stdout: TrackerConfig {
                enable: self.stdout.unwrap_or(DEFAULT_STDOUT),
                level: self.stdout_level.unwrap_or(DEFAULT_STDOUT_LEVEL),
                filter_regex: self.stdout_filter_regex.as_deref().unwrap_or_default(),
                file: None,
            },
            log_file: TrackerConfig {
                enable: self.log_file.is_some(),
                level: self.log_file_level.unwrap_or(DEFAULT_LOG_FILE_LEVEL),
                filter_regex: self.log_file_filter_regex.as_deref().unwrap_or_default(),
                file: self.log_file.as_deref(),
            },
        }
    }
}

fn check_conf_file(conf_file: &Path) -> Result<(), ConfigError> {
    if conf_file.is_dir() {
        return Err(ConfigError(format!(
            "{} is not a file path",
            conf_file.display()
        )));
    }
    if !conf_file.exists() {
        return Err(ConfigError(format!("{} not found", conf_file.display())));
    }
    Ok(())
}
