use serde::Deserialize;

/// CPU settings.
#[derive(Clone, Debug, Default, Deserialize)]
#[cfg_attr(test, serde(deny_unknown_fields), derive(PartialEq, Eq))]
pub struct CpuConfig {
    /// Show every logical core instead of folding SMT siblings together.
    /// Unset means fold.
    pub(crate) show_logical_cores: Option<bool>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_cpu_config() {
        let generated: CpuConfig = toml_edit::de::from_str("").unwrap();
        assert_eq!(generated.show_logical_cores, None);
    }

    #[test]
    fn show_logical_cores() {
        let config = r#"
            show_logical_cores = true
        "#;
        let generated: CpuConfig = toml_edit::de::from_str(config).unwrap();
        assert_eq!(generated.show_logical_cores, Some(true));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let config = r#"
            show_logical_cores = "yes"
        "#;
        assert!(toml_edit::de::from_str::<CpuConfig>(config).is_err());
    }
}
