//! How cpuload is configured: arguments, the config file, and the settings
//! the sampler reads on every cycle.

pub mod args;
pub mod config;
mod error;
pub mod settings;

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

pub use self::error::{OptionError, OptionResult};
use self::{
    args::{Args, GeneralArgs},
    config::{Config, StringOrNum},
    settings::{ConfigStore, SHOW_LOGICAL_CORES},
};

const DEFAULT_CONFIG_FILE_PATH: &str = "cpuload/cpuload.toml";

pub const DEFAULT_RATE: Duration = Duration::from_millis(1000);
pub const MIN_RATE: Duration = Duration::from_millis(250);

/// How the driver loop runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SamplingOptions {
    pub rate: Duration,
    pub count: Option<u64>,
    pub json: bool,
}

/// Returns the config path to use: the given location if there is one,
/// otherwise the default under the user's config directory.
pub fn get_config_path(config_location: Option<&str>) -> Option<PathBuf> {
    match config_location {
        Some(location) => Some(PathBuf::from(location)),
        None => dirs::config_dir().map(|path| path.join(DEFAULT_CONFIG_FILE_PATH)),
    }
}

/// Reads and parses the config file. A missing file (or no path at all)
/// gives the default config.
pub fn read_config(path: Option<&Path>) -> OptionResult<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    match fs::read_to_string(path) {
        Ok(contents) => Ok(toml_edit::de::from_str(&contents)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
        Err(err) => Err(OptionError::unreadable(path, &err)),
    }
}

/// Builds the settings store and loop options from the arguments and the
/// config file.
pub fn init_options(args: &Args) -> OptionResult<(ConfigStore, SamplingOptions)> {
    let path = get_config_path(args.general_args.config_location.as_deref());
    let mut store = ConfigStore::load(path)?;

    if args.cpu_args.logical {
        store = store.with_override(SHOW_LOGICAL_CORES, true);
    }

    let options = SamplingOptions {
        rate: get_update_rate(&args.general_args, &store.config())?,
        count: args.general_args.count,
        json: args.general_args.json,
    };

    Ok((store, options))
}

/// Parses a time value, either in milliseconds or as a human-readable
/// duration.
fn try_into_duration(value: &StringOrNum) -> Option<Duration> {
    match value {
        StringOrNum::Num(ms) => Some(Duration::from_millis(*ms)),
        StringOrNum::String(s) => match s.trim().parse::<u64>() {
            Ok(ms) => Some(Duration::from_millis(ms)),
            Err(_) => humantime::parse_duration(s).ok(),
        },
    }
}

fn get_update_rate(args: &GeneralArgs, config: &Config) -> OptionResult<Duration> {
    let rate = if let Some(rate) = &args.rate {
        let rate = try_into_duration(&rate.clone().into())
            .ok_or_else(|| OptionError::invalid_arg_value("rate"))?;

        if rate < MIN_RATE {
            return Err(OptionError::arg("'--rate' must be greater than 250ms."));
        }

        rate
    } else if let Some(rate) = &config.flags.rate {
        let rate =
            try_into_duration(rate).ok_or_else(|| OptionError::invalid_config_value("rate"))?;

        if rate < MIN_RATE {
            return Err(OptionError::config("'rate' must be greater than 250ms."));
        }

        rate
    } else {
        DEFAULT_RATE
    };

    Ok(rate)
}
