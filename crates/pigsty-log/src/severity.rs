use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Log severities, least severe first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

/// Whether `value` is at least as severe as `threshold`.
pub fn test_severity(value: Severity, threshold: Severity) -> bool {
    value >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_order() {
        let all: Vec<Severity> = Severity::iter().collect();
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
    }

    #[test]
    fn test_threshold() {
        assert!(test_severity(Severity::Debug, Severity::Debug));
        assert!(test_severity(Severity::Fatal, Severity::Warn));
        assert!(!test_severity(Severity::Info, Severity::Warn));
    }

    #[test]
    fn test_names() {
        assert_eq!(Severity::Warn.to_string(), "warn");
        assert_eq!(Severity::from_str("fatal").unwrap(), Severity::Fatal);
        assert!(Severity::from_str("loud").is_err());
        assert_eq!(
            serde_json::to_value(Severity::Error).unwrap(),
            serde_json::json!("error")
        );
    }
}
