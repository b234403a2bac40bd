use std::path::PathBuf;

/// Failures inside the engine. None of these ever reach the host as a panic;
/// callers degrade to "no overlay" and log.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown effect id: {0:?}")]
    UnknownEffect(String),

    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("invalid hex color: {0:?} (expected RRGGBB)")]
    InvalidColor(String),

    #[error("scale must be a positive number, got {0}")]
    InvalidScale(f32),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::SurfaceUnavailable(err.to_string())
    }
}
