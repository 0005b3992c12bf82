//! Binder configuration
//!
//! Settings that decide how the binder treats the two behaviours the SELECT
//! semantics leave open: the order of the resolved projection list and
//! repeated table names in the FROM list.

use crate::common::error::{BinderError, BinderResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Order of the resolved field list
///
/// Attributes are always visited last-to-first; this only decides whether the
/// output keeps that visitation order or is flipped back to SQL order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionOrder {
    /// Last attribute first, as visited
    #[default]
    Visitation,
    /// Same order as the SELECT list
    Source,
}

/// What to do when the FROM list names a table more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateTablePolicy {
    /// Keep every occurrence in the table list; the lookup map keeps the last
    #[default]
    LastWins,
    /// Fail the bind with an invalid-argument error
    Reject,
}

/// Binder settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BinderConfig {
    pub projection_order: ProjectionOrder,
    pub duplicate_tables: DuplicateTablePolicy,
}

impl BinderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projection_order(mut self, order: ProjectionOrder) -> Self {
        self.projection_order = order;
        self
    }

    pub fn with_duplicate_tables(mut self, policy: DuplicateTablePolicy) -> Self {
        self.duplicate_tables = policy;
        self
    }

    /// Parse a configuration from JSON text
    pub fn from_json_str(text: &str) -> BinderResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> BinderResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text).map_err(|e| {
            BinderError::Config(format!("{}: {}", path.as_ref().display(), e))
        })
    }

    pub fn to_json_string(&self) -> BinderResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ProjectionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionOrder::Visitation => write!(f, "visitation"),
            ProjectionOrder::Source => write!(f, "source"),
        }
    }
}

impl FromStr for ProjectionOrder {
    type Err = BinderError;

    fn from_str(s: &str) -> BinderResult<Self> {
        match s.to_lowercase().as_str() {
            "visitation" | "reverse" | "reversed" => Ok(ProjectionOrder::Visitation),
            "source" | "sql" => Ok(ProjectionOrder::Source),
            _ => Err(BinderError::Config(format!(
                "Unknown projection order '{}'. Use: visitation or source",
                s
            ))),
        }
    }
}

impl fmt::Display for DuplicateTablePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateTablePolicy::LastWins => write!(f, "last_wins"),
            DuplicateTablePolicy::Reject => write!(f, "reject"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_behaviour() {
        let config = BinderConfig::default();
        assert_eq!(config.projection_order, ProjectionOrder::Visitation);
        assert_eq!(config.duplicate_tables, DuplicateTablePolicy::LastWins);
    }

    #[test]
    fn test_from_json() {
        let config =
            BinderConfig::from_json_str(r#"{"projection_order": "source"}"#).unwrap();
        assert_eq!(config.projection_order, ProjectionOrder::Source);
        assert_eq!(config.duplicate_tables, DuplicateTablePolicy::LastWins);

        let config = BinderConfig::from_json_str(r#"{"duplicate_tables": "reject"}"#).unwrap();
        assert_eq!(config.duplicate_tables, DuplicateTablePolicy::Reject);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = BinderConfig::from_json_str(r#"{"projection": "source"}"#).unwrap_err();
        assert_eq!(err.code(), crate::common::ErrorCode::Config);
    }

    #[test]
    fn test_projection_order_from_str() {
        assert_eq!(
            "SOURCE".parse::<ProjectionOrder>().unwrap(),
            ProjectionOrder::Source
        );
        assert_eq!(
            "reverse".parse::<ProjectionOrder>().unwrap(),
            ProjectionOrder::Visitation
        );
        assert!("sideways".parse::<ProjectionOrder>().is_err());
    }

    #[test]
    fn test_round_trip_json() {
        let config = BinderConfig::new()
            .with_projection_order(ProjectionOrder::Source)
            .with_duplicate_tables(DuplicateTablePolicy::Reject);
        let text = config.to_json_string().unwrap();
        assert_eq!(BinderConfig::from_json_str(&text).unwrap(), config);
    }
}
