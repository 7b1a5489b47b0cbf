pub mod cpu;
pub(crate) mod flags;

use serde::Deserialize;

use self::{cpu::CpuConfig, flags::FlagConfig};
use super::settings::SHOW_LOGICAL_CORES;

/// The config file.
#[derive(Clone, Debug, Default, Deserialize)]
#[cfg_attr(test, serde(deny_unknown_fields), derive(PartialEq, Eq))]
pub struct Config {
    #[serde(default)]
    pub(crate) flags: FlagConfig,
    #[serde(default)]
    pub(crate) cpu: CpuConfig,
}

impl Config {
    /// Looks up a boolean setting by its dotted key, e.g.
    /// `cpu.show_logical_cores`.
    pub fn lookup_bool(&self, key: &str) -> Option<bool> {
        match key {
            SHOW_LOGICAL_CORES => self.cpu.show_logical_cores,
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub(crate) enum StringOrNum {
    String(String),
    Num(u64),
}

impl From<String> for StringOrNum {
    fn from(value: String) -> Self {
        StringOrNum::String(value)
    }
}

impl From<u64> for StringOrNum {
    fn from(value: u64) -> Self {
        StringOrNum::Num(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_config() {
        let config: Config = toml_edit::de::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn full_config() {
        let config: Config = toml_edit::de::from_str(
            r#"
            [flags]
            rate = "500ms"

            [cpu]
            show_logical_cores = true
            "#,
        )
        .unwrap();

        assert_eq!(
            config.flags.rate,
            Some(StringOrNum::String("500ms".to_string()))
        );
        assert_eq!(config.lookup_bool(SHOW_LOGICAL_CORES), Some(true));
    }

    #[test]
    fn numeric_rate() {
        let config: Config = toml_edit::de::from_str("[flags]\nrate = 2000\n").unwrap();
        assert_eq!(config.flags.rate, Some(StringOrNum::Num(2000)));
    }
}
