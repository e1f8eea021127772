use crate::error::ConfigError;
use crate::model::Position;
use crate::validation::{CapacityLimit, default_capacity_limits};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Spacing used by auto-layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub column_spacing: f64,
    pub row_spacing: f64,
    pub origin: Position,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_spacing: 200.0,
            row_spacing: 120.0,
            origin: Position::new(40.0, 40.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.2,
            max: 4.0,
            step: 0.2,
        }
    }
}

/// Tunables of an editing session.
///
/// Every field has a default, so a config file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub capacity_limits: Vec<CapacityLimit>,
    pub node_width: f64,
    pub node_height: f64,
    pub layout: LayoutConfig,
    pub paste_offset: Position,
    pub zoom: ZoomConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity_limits: default_capacity_limits(),
            node_width: 60.0,
            node_height: 60.0,
            layout: LayoutConfig::default(),
            paste_offset: Position::new(20.0, 20.0),
            zoom: ZoomConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a session config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeType, StreamRole};
    use crate::ports::PortGroup;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = SessionConfig::from_json(r#"{"pasteOffset": {"x": 5.0, "y": 5.0}}"#).unwrap();
        assert_eq!(config.paste_offset, Position::new(5.0, 5.0));
        assert_eq!(config.layout, LayoutConfig::default());
        assert_eq!(config.capacity_limits.len(), 1);
    }

    #[test]
    fn capacity_limits_are_replaceable() {
        let json = r#"{
            "capacityLimits": [
                {"nodeType": "atmosphere", "group": "in", "streamRole": "gas", "max": 3}
            ]
        }"#;
        let config = SessionConfig::from_json(json).unwrap();
        assert_eq!(
            config.capacity_limits,
            vec![CapacityLimit {
                node_type: NodeType::Atmosphere,
                group: PortGroup::In,
                stream_role: StreamRole::Gas,
                max: 3,
            }]
        );
    }
}
