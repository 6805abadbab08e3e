use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Errors from the host-provided content surface. Only bounds/visibility
/// failures are fatal to the owning window; everything else is recovered
/// locally by the orchestration core.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface creation failed: {0}")]
    CreateFailed(String),

    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    #[error("host window gone: {0}")]
    WindowGone(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AideError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unknown view: {0}")]
    UnknownView(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("bad editor pattern".into());
        assert_eq!(err.to_string(), "config validation error: bad editor pattern");
    }

    #[test]
    fn surface_error_display() {
        let err = SurfaceError::CreateFailed("out of memory".into());
        assert_eq!(err.to_string(), "surface creation failed: out of memory");

        let err = SurfaceError::WindowGone("main".into());
        assert_eq!(err.to_string(), "host window gone: main");
    }

    #[test]
    fn aide_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: AideError = config_err.into();
        assert!(matches!(err, AideError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn aide_error_from_surface() {
        let surface_err = SurfaceError::NavigationFailed("dns".into());
        let err: AideError = surface_err.into();
        assert!(matches!(err, AideError::Surface(_)));
        assert!(err.to_string().contains("dns"));
    }

    #[test]
    fn aide_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: AideError = io_err.into();
        assert!(matches!(err, AideError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn aide_error_unknown_view() {
        let err = AideError::UnknownView("abc-123".into());
        assert_eq!(err.to_string(), "unknown view: abc-123");
    }
}
