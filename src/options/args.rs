//! Argument parsing via clap.

use clap::*;
use indoc::indoc;

const TEMPLATE: &str = indoc! {
    "{name} {version}

    {about}

    {usage-heading} {usage}

    {all-args}"
};

const USAGE: &str = "cpuload [OPTIONS]";

/// The arguments for cpuload.
#[derive(Parser, Debug)]
#[command(
    name = crate_name!(),
    version = crate_version!(),
    about = crate_description!(),
    color = ColorChoice::Auto,
    help_template = TEMPLATE,
    override_usage = USAGE,
)]
pub struct Args {
    #[command(flatten)]
    pub general_args: GeneralArgs,

    #[command(flatten)]
    pub cpu_args: CpuArgs,

    #[cfg(feature = "logging")]
    #[command(flatten)]
    pub logging_args: LoggingArgs,
}

#[derive(Args, Clone, Debug, Default)]
#[command(next_help_heading = "General Options")]
pub struct GeneralArgs {
    #[arg(
        short = 'C',
        long,
        value_name = "PATH",
        help = "Sets the location of the config file.",
        long_help = "Sets the location of the config file. Expects a config file in the TOML format. \
                    If it doesn't exist, the defaults are used."
    )]
    pub config_location: Option<String>,

    #[arg(
        short = 'n',
        long,
        value_name = "N",
        help = "Stops after N samples.",
        long_help = "Stops after taking N samples. By default, sampling continues until interrupted."
    )]
    pub count: Option<u64>,

    #[arg(
        long,
        help = "Prints each sample as a JSON object.",
        long_help = "Prints each sample as a single-line JSON object instead of a human-readable line."
    )]
    pub json: bool,

    #[arg(
        short = 'r',
        long,
        value_name = "TIME",
        help = "Sets how often a sample is taken.",
        long_help = "Sets how often a sample is taken. Takes a number in milliseconds or a human-readable \
                    duration (e.g. 5s). The minimum is 250ms, and defaults to 1000ms."
    )]
    pub rate: Option<String>,
}

#[derive(Args, Clone, Debug, Default)]
#[command(next_help_heading = "CPU Options")]
pub struct CpuArgs {
    #[arg(
        short = 'l',
        long,
        help = "Shows every logical core.",
        long_help = "Shows every logical core instead of averaging SMT (hyperthreaded) siblings into one \
                    entry per physical core. Overrides the config file."
    )]
    pub logical: bool,
}

#[cfg(feature = "logging")]
#[derive(Args, Clone, Debug, Default)]
#[command(next_help_heading = "Logging Options")]
pub struct LoggingArgs {
    #[arg(
        long,
        value_name = "PATH",
        help = "Writes logs to the given file.",
        long_help = "Writes logs to the given file. Collection failures are logged as errors."
    )]
    pub log_file: Option<String>,

    #[arg(
        long,
        requires = "log_file",
        help = "Logs at debug level.",
        long_help = "Logs at debug level instead of warnings and errors only. Requires --log-file."
    )]
    pub debug: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_short_flags() {
        let args = Args::try_parse_from(["cpuload", "-r", "500ms", "-n", "3", "-l"]).unwrap();

        assert_eq!(args.general_args.rate.as_deref(), Some("500ms"));
        assert_eq!(args.general_args.count, Some(3));
        assert!(args.cpu_args.logical);
        assert!(!args.general_args.json);
    }

    #[test]
    fn parses_long_flags() {
        let args = Args::try_parse_from([
            "cpuload",
            "--config-location",
            "cpuload.toml",
            "--rate",
            "2s",
            "--count",
            "1",
            "--logical",
            "--json",
        ])
        .unwrap();

        assert_eq!(
            args.general_args.config_location.as_deref(),
            Some("cpuload.toml")
        );
        assert_eq!(args.general_args.rate.as_deref(), Some("2s"));
        assert_eq!(args.general_args.count, Some(1));
        assert!(args.cpu_args.logical);
        assert!(args.general_args.json);
    }

    #[cfg(feature = "logging")]
    #[test]
    fn debug_requires_log_file() {
        assert!(Args::try_parse_from(["cpuload", "--debug"]).is_err());
        assert!(Args::try_parse_from(["cpuload", "--debug", "--log-file", "x.log"]).is_ok());
    }
}
