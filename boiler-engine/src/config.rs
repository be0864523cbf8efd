//! Engine configuration
//!
//! Defines the filesystem locations the pipeline works with and the
//! failure policy for the container build stage.

use std::path::PathBuf;

/// Engine configuration
///
/// Paths are configurable to allow running the agent outside its default
/// deployment layout (tests, containerized installs, non-root setups).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory under which per-run workspaces are created
    pub work_root: PathBuf,

    /// Operator configuration directory holding `<project>.env` files
    pub config_dir: PathBuf,

    /// Reverse-proxy "available sites" directory
    pub sites_available: PathBuf,

    /// Reverse-proxy "enabled sites" directory
    pub sites_enabled: PathBuf,

    /// Abort the run when the container build fails instead of continuing
    /// to the stop/start stages
    pub fatal_build_errors: bool,
}

impl EngineConfig {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - BOILER_WORK_ROOT (default: current directory)
    /// - BOILER_CONFIG_DIR (default: "config")
    /// - BOILER_SITES_AVAILABLE (default: /etc/nginx/sites-available)
    /// - BOILER_SITES_ENABLED (default: /etc/nginx/sites-enabled)
    /// - BOILER_FATAL_BUILD_ERRORS (default: false; "1" or "true" enables)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let work_root = std::env::var("BOILER_WORK_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.work_root);

        let config_dir = std::env::var("BOILER_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.config_dir);

        let sites_available = std::env::var("BOILER_SITES_AVAILABLE")
            .map(PathBuf::from)
            .unwrap_or(defaults.sites_available);

        let sites_enabled = std::env::var("BOILER_SITES_ENABLED")
            .map(PathBuf::from)
            .unwrap_or(defaults.sites_enabled);

        let fatal_build_errors = std::env::var("BOILER_FATAL_BUILD_ERRORS")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.fatal_build_errors);

        Self {
            work_root,
            config_dir,
            sites_available,
            sites_enabled,
            fatal_build_errors,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.work_root.as_os_str().is_empty() {
            return Err("work_root cannot be empty".to_string());
        }

        if self.config_dir.as_os_str().is_empty() {
            return Err("config_dir cannot be empty".to_string());
        }

        if self.sites_available == self.sites_enabled {
            return Err("sites_available and sites_enabled must differ".to_string());
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            work_root: PathBuf::from("."),
            config_dir: PathBuf::from("config"),
            sites_available: PathBuf::from("/etc/nginx/sites-available"),
            sites_enabled: PathBuf::from("/etc/nginx/sites-enabled"),
            fatal_build_errors: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.work_root, PathBuf::from("."));
        assert_eq!(config.config_dir, PathBuf::from("config"));
        assert!(!config.fatal_build_errors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();
        assert!(config.validate().is_ok());

        // Empty work_root should fail
        config.work_root = PathBuf::new();
        assert!(config.validate().is_err());

        config.work_root = PathBuf::from("/tmp");

        // Colliding proxy directories should fail
        config.sites_enabled = config.sites_available.clone();
        assert!(config.validate().is_err());
    }
}
