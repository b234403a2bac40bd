//! Mount configuration and the optional TOML config file.

use crate::color::Rgb;
use crate::effects::EffectId;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the host hands the engine on mount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    /// Effect name. Kept raw so unknown names can degrade instead of failing to load.
    pub effect_type: String,
    /// Tint for effects without a fixed palette.
    pub primary_color: Rgb,
    /// Accepted and passed through; carries no behavior.
    #[serde(rename = "loop")]
    pub looping: bool,
    /// Reserved. Only full-viewport placement (`false`) is implemented.
    pub contained: bool,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            effect_type: EffectId::None.name().to_string(),
            primary_color: Rgb::WHITE,
            looping: true,
            contained: false,
        }
    }
}

impl MountConfig {
    pub fn new(effect: impl Into<String>) -> Self {
        Self {
            effect_type: effect.into(),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.primary_color = color;
        self
    }

    /// The effect to run. Unknown names are logged and fall back to `none`.
    pub fn resolve_effect(&self) -> EffectId {
        self.effect_type.parse().unwrap_or_else(|err: EngineError| {
            log::warn!("{err}; showing no effect");
            EffectId::None
        })
    }
}

/// Settings that belong to the terminal host rather than the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    /// Logical units per terminal pixel.
    pub scale: f32,
    pub background: Rgb,
}

impl HostSettings {
    /// Rejects settings the terminal back-end cannot honor.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(EngineError::InvalidScale(self.scale));
        }
        Ok(())
    }
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            scale: 4.0,
            background: Rgb::BLACK,
        }
    }
}

/// Layout of a config file: mount keys at the top level, host keys under `[host]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    #[serde(flatten)]
    pub mount: MountConfig,
    pub host: HostSettings,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let file: ConfigFile = toml::from_str(text)?;
        file.host.validate()?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_inert() {
        let config = MountConfig::default();
        assert_eq!(config.resolve_effect(), EffectId::None);
        assert!(config.looping);
        assert!(!config.contained);
    }

    #[test]
    fn parses_full_file() {
        let file = ConfigFile::parse(
            r##"
            effect_type = "sparkles"
            primary_color = "#ffd700"
            loop = false

            [host]
            scale = 2.5
            background = "1a1b26"
            "##,
        )
        .unwrap();
        assert_eq!(file.mount.resolve_effect(), EffectId::Sparkles);
        assert_eq!(file.mount.primary_color, Rgb(0xff, 0xd7, 0x00));
        assert!(!file.mount.looping);
        assert_eq!(file.host.scale, 2.5);
        assert_eq!(file.host.background, Rgb(0x1a, 0x1b, 0x26));
    }

    #[test]
    fn unknown_effect_loads_and_degrades() {
        let file = ConfigFile::parse(r#"effect_type = "lava""#).unwrap();
        assert_eq!(file.mount.resolve_effect(), EffectId::None);
    }

    #[test]
    fn bad_color_is_a_parse_error() {
        let err = ConfigFile::parse(r#"primary_color = "red""#).unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn non_positive_scale_is_rejected() {
        for text in ["[host]\nscale = -3.0\n", "[host]\nscale = 0.0\n", "[host]\nscale = nan\n", "[host]\nscale = inf\n"] {
            let err = ConfigFile::parse(text).unwrap_err();
            assert!(matches!(err, EngineError::InvalidScale(_)), "{text:?} gave {err}");
        }
        assert!(HostSettings::default().validate().is_ok());
        assert_eq!(ConfigFile::parse("[host]\nscale = 0.5\n").unwrap().host.scale, 0.5);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ConfigFile::load(Path::new("/nonexistent/overlay.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/overlay.toml"));
    }
}
