use std::{borrow::Cow, fmt, io, path::PathBuf};

/// Why the options could not be set up. Shown to the user as is, so the
/// message should say what to fix. Offending values go in _single quotes_.
#[derive(Debug, PartialEq)]
pub enum OptionError {
    /// The config file parsed, but something in it is wrong.
    Config(Cow<'static, str>),
    /// A command-line argument is wrong.
    Argument(Cow<'static, str>),
    /// The config file exists but could not be read.
    Unreadable { path: PathBuf, reason: String },
}

impl OptionError {
    pub(crate) fn config<R: Into<Cow<'static, str>>>(reason: R) -> Self {
        OptionError::Config(reason.into())
    }

    /// A config value that could not be parsed.
    pub(crate) fn invalid_config_value(key: &str) -> Self {
        OptionError::Config(Cow::Owned(format!(
            "'{key}' was set with an invalid value, please update it in your config file."
        )))
    }

    pub(crate) fn arg<R: Into<Cow<'static, str>>>(reason: R) -> Self {
        OptionError::Argument(reason.into())
    }

    /// An argument value that could not be parsed.
    pub(crate) fn invalid_arg_value(flag: &str) -> Self {
        OptionError::Argument(Cow::Owned(format!(
            "'--{flag}' was set with an invalid value, please update your arguments."
        )))
    }

    pub(crate) fn unreadable<P: Into<PathBuf>>(path: P, err: &io::Error) -> Self {
        OptionError::Unreadable {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

pub type OptionResult<T> = Result<T, OptionError>;

impl fmt::Display for OptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionError::Config(reason) => write!(f, "Configuration file error: {reason}"),
            OptionError::Argument(reason) => write!(f, "Argument error: {reason}"),
            OptionError::Unreadable { path, reason } => {
                write!(f, "Could not read the config file '{}': {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for OptionError {}

impl From<toml_edit::de::Error> for OptionError {
    fn from(err: toml_edit::de::Error) -> Self {
        OptionError::Config(err.to_string().into())
    }
}
