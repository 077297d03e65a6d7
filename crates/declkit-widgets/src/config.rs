#![forbid(unsafe_code)]

//! Construction-time defaults for view variants.
//!
//! A [`ViewDefaults`] is read once when a view is built; changing it later
//! does not affect existing views. With the `config` feature (on by default)
//! defaults can be loaded from TOML or JSON. Missing keys fall back to the
//! built-in values.
//!
//! ```toml
//! [flow_layout]
//! item_size = 80.0
//! scroll_axis = "horizontal"
//!
//! [button]
//! title = "OK"
//! ```

#[cfg(feature = "config")]
use std::path::Path;

use declkit_core::Axis;
use declkit_style::Color;
#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Errors from loading or validating [`ViewDefaults`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[cfg(feature = "config")]
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "config")]
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid value for {field}: {reason}")]
    Validation { field: &'static str, reason: String },
}

/// Default flow layout for collection views.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct FlowLayoutConfig {
    /// Square item side length.
    pub item_size: f64,
    pub minimum_interitem_spacing: f64,
    pub minimum_line_spacing: f64,
    pub scroll_axis: Axis,
}

impl Default for FlowLayoutConfig {
    fn default() -> Self {
        Self {
            item_size: 50.0,
            minimum_interitem_spacing: 5.0,
            minimum_line_spacing: 5.0,
            scroll_axis: Axis::Vertical,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ButtonDefaults {
    pub title: String,
    /// Background shown while highlighted, as `0xRRGGBBAA`.
    pub highlighted_background: Option<Color>,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ViewDefaults {
    pub flow_layout: FlowLayoutConfig,
    pub button: ButtonDefaults,
}

impl ViewDefaults {
    /// Reject sizes and spacings that are negative or not finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.flow_layout;
        for (field, value) in [
            ("flow_layout.item_size", layout.item_size),
            (
                "flow_layout.minimum_interitem_spacing",
                layout.minimum_interitem_spacing,
            ),
            ("flow_layout.minimum_line_spacing", layout.minimum_line_spacing),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation {
                    field,
                    reason: format!("expected a finite non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(feature = "config")]
impl ViewDefaults {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let defaults: Self = toml::from_str(input)?;
        defaults.validate()?;
        Ok(defaults)
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let defaults: Self = serde_json::from_str(input)?;
        defaults.validate()?;
        Ok(defaults)
    }

    /// Load from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let contents = std::fs::read_to_string(path)?;
        match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_defaults() {
        let defaults = ViewDefaults::default();
        assert_eq!(defaults.flow_layout.item_size, 50.0);
        assert_eq!(defaults.flow_layout.minimum_interitem_spacing, 5.0);
        assert_eq!(defaults.flow_layout.minimum_line_spacing, 5.0);
        assert_eq!(defaults.flow_layout.scroll_axis, Axis::Vertical);
        assert_eq!(defaults.button.title, "");
        assert!(defaults.validate().is_ok());
    }

    #[test]
    fn negative_spacing_is_rejected() {
        let mut defaults = ViewDefaults::default();
        defaults.flow_layout.minimum_line_spacing = -1.0;
        let err = defaults.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation {
                field: "flow_layout.minimum_line_spacing",
                ..
            }
        ));
    }

    #[test]
    fn non_finite_size_is_rejected() {
        let mut defaults = ViewDefaults::default();
        defaults.flow_layout.item_size = f64::NAN;
        assert!(defaults.validate().is_err());
    }

    #[cfg(feature = "config")]
    #[test]
    fn partial_toml_keeps_defaults() {
        let defaults = ViewDefaults::from_toml_str(
            r#"
            [flow_layout]
            item_size = 80.0
            scroll_axis = "horizontal"
            "#,
        )
        .unwrap();
        assert_eq!(defaults.flow_layout.item_size, 80.0);
        assert_eq!(defaults.flow_layout.scroll_axis, Axis::Horizontal);
        assert_eq!(defaults.flow_layout.minimum_line_spacing, 5.0);
        assert_eq!(defaults.button, ButtonDefaults::default());
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_button_defaults() {
        let defaults = ViewDefaults::from_json_str(
            r#"{ "button": { "title": "OK", "highlighted_background": 4278190335 } }"#,
        )
        .unwrap();
        assert_eq!(defaults.button.title, "OK");
        assert_eq!(
            defaults.button.highlighted_background,
            Some(Color(0xFF00_00FF))
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_validation_runs() {
        let err = ViewDefaults::from_toml_str("[flow_layout]\nitem_size = -3.0\n").unwrap_err();
        assert!(err.to_string().contains("flow_layout.item_size"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn malformed_json_reports_parse_error() {
        let err = ViewDefaults::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[cfg(feature = "config")]
    #[test]
    fn load_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("views.toml");
        std::fs::write(&toml_path, "[button]\ntitle = \"Save\"\n").unwrap();
        assert_eq!(ViewDefaults::load(&toml_path).unwrap().button.title, "Save");

        let json_path = dir.path().join("views.JSON");
        std::fs::write(&json_path, r#"{"flow_layout":{"item_size":10.0}}"#).unwrap();
        assert_eq!(
            ViewDefaults::load(&json_path).unwrap().flow_layout.item_size,
            10.0
        );

        let yaml_path = dir.path().join("views.yaml");
        std::fs::write(&yaml_path, "button: {}").unwrap();
        assert!(matches!(
            ViewDefaults::load(&yaml_path),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            ViewDefaults::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
