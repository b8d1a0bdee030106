//! Runtime configuration, stored as JSON

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::display::{Rotation, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::ConfigError;
use crate::stream::{DEFAULT_MAX_CHUNK_SIZE, MQTT_DEFAULT_PORT, MQTT_DEFAULT_TOPIC};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Native framebuffer width in pixels
    pub width: u32,
    /// Native framebuffer height in pixels
    pub height: u32,
    pub rotation: Rotation,
    /// Largest pixel chunk handed to a sink in one call
    pub max_chunk_size: usize,
    pub frame_interval_ms: u64,
    /// Chunks sent per rendered frame while streaming
    pub chunks_per_frame: usize,
    /// Retries for a busy sink before a chunk is given up for this frame
    pub sink_retries: u32,
    pub background: Color,
    pub mqtt: Option<MqttConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub topic: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            rotation: Rotation::Deg0,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            frame_interval_ms: 33,
            chunks_per_frame: 8,
            sink_retries: 15,
            background: Color::BLACK,
            mqtt: None,
        }
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: MQTT_DEFAULT_PORT,
            topic: MQTT_DEFAULT_TOPIC.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file; missing fields take defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "framebuffer size {}x{} has no pixels",
                self.width, self.height
            )));
        }
        if self.max_chunk_size == 0 {
            return Err(ConfigError::Invalid("max_chunk_size must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "width": 240, "rotation": 90 }"#).unwrap();
        assert_eq!(config.width, 240);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.rotation, Rotation::Deg90);
        assert_eq!(config.max_chunk_size, 1000);
        assert!(config.mqtt.is_none());
    }

    #[test]
    fn test_mqtt_section() {
        let config: Config =
            serde_json::from_str(r#"{ "mqtt": { "host": "broker.lan", "topic": "panel" } }"#).unwrap();
        let mqtt = config.mqtt.unwrap();
        assert_eq!(mqtt.host, "broker.lan");
        assert_eq!(mqtt.port, 1883);
        assert_eq!(mqtt.topic, "panel");
    }

    #[test]
    fn test_bad_rotation_rejected() {
        assert!(serde_json::from_str::<Config>(r#"{ "rotation": 45 }"#).is_err());
    }

    #[test]
    fn test_save_load_file() {
        let path = std::env::temp_dir().join(format!("gfxblend-config-{}.json", std::process::id()));
        let config = Config {
            width: 24,
            height: 48,
            background: Color::new(10, 20, 30),
            ..Config::default()
        };
        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validate() {
        let config = Config {
            width: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/nonexistent/gfxblend.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
