use serde::Deserialize;

use super::StringOrNum;

#[derive(Clone, Debug, Default, Deserialize)]
#[cfg_attr(test, serde(deny_unknown_fields), derive(PartialEq, Eq))]
pub(crate) struct FlagConfig {
    pub(crate) rate: Option<StringOrNum>,
}
