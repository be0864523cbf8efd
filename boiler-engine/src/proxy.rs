//! Reverse-proxy reconfiguration
//!
//! Installs a project's site definition into the proxy's available and
//! enabled site directories, then asks the proxy service to restart. The
//! copies must both succeed (a partially installed site is split routing
//! state); the restart's exit status is logged but never fatal.

use boiler_core::StageError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Narrow interface over the reverse proxy
pub trait ProxyService: Send + Sync {
    /// Installs `site_config` for `project_name` and reloads the proxy
    fn install(&self, site_config: &Path, project_name: &str) -> Result<(), StageError>;
}

/// Standard implementation managing an nginx install via the system
/// service manager
pub struct NginxCli {
    sites_available: PathBuf,
    sites_enabled: PathBuf,
}

impl NginxCli {
    pub fn new(sites_available: impl Into<PathBuf>, sites_enabled: impl Into<PathBuf>) -> Self {
        Self {
            sites_available: sites_available.into(),
            sites_enabled: sites_enabled.into(),
        }
    }

    fn restart(&self) {
        info!("Restarting nginx");

        match std::process::Command::new("service")
            .arg("nginx")
            .arg("restart")
            .output()
        {
            Ok(output) if output.status.success() => debug!("nginx restarted"),
            Ok(output) => warn!(
                "nginx restart exited with code {}: {}",
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Err(e) => warn!("Failed to execute nginx restart: {}", e),
        }
    }
}

impl ProxyService for NginxCli {
    fn install(&self, site_config: &Path, project_name: &str) -> Result<(), StageError> {
        let available = self.sites_available.join(project_name);
        let enabled = self.sites_enabled.join(project_name);

        fs::copy(site_config, &available).map_err(|e| {
            StageError::ProxyConfig(format!("copy to {} failed: {}", available.display(), e))
        })?;
        fs::copy(site_config, &enabled).map_err(|e| {
            StageError::ProxyConfig(format!("copy to {} failed: {}", enabled.display(), e))
        })?;

        info!(
            "Installed proxy config for {} ({} and {})",
            project_name,
            available.display(),
            enabled.display()
        );

        self.restart();

        Ok(())
    }
}
