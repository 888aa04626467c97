//! Platform capability probing
//!
//! A probe answers one question: does this runtime support platform-bound
//! public-key authentication ceremonies (a built-in WebAuthn authenticator)?

pub mod mock;

use std::ffi::OsString;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Capability probe unavailable: {0}")]
    Unavailable(String),
    #[error("Capability probe timed out after {0}ms")]
    Timeout(u64),
    #[error("Capability probe task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait CapabilityProbe: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Resolve whether a platform authenticator is available
    async fn platform_authenticator_available(&self) -> Result<bool, ProbeError>;
}

/// Run `probe` with an optional deadline, mapping an elapsed deadline to
/// [`ProbeError::Timeout`].
pub async fn run_probe(
    probe: &dyn CapabilityProbe,
    timeout: Option<Duration>,
) -> Result<bool, ProbeError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, probe.platform_authenticator_available())
            .await
            .map_err(|_| ProbeError::Timeout(limit.as_millis() as u64))?,
        None => probe.platform_authenticator_available().await,
    }
}

/// Probe with a fixed answer
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe(pub bool);

#[async_trait]
impl CapabilityProbe for StaticProbe {
    fn name(&self) -> &str {
        "static"
    }

    async fn platform_authenticator_available(&self) -> Result<bool, ProbeError> {
        Ok(self.0)
    }
}

/// Probe that reports support when a FIDO2 helper binary is installed
#[derive(Debug, Clone)]
pub struct ToolProbe {
    binary: String,
    search_path: Option<OsString>,
}

impl ToolProbe {
    /// Default helper shipped with libfido2
    pub const DEFAULT_BINARY: &'static str = "fido2-token";

    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            search_path: None,
        }
    }

    /// Search `paths` instead of the process `PATH`
    pub fn with_search_path(mut self, paths: impl Into<OsString>) -> Self {
        self.search_path = Some(paths.into());
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl Default for ToolProbe {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BINARY)
    }
}

#[async_trait]
impl CapabilityProbe for ToolProbe {
    fn name(&self) -> &str {
        &self.binary
    }

    async fn platform_authenticator_available(&self) -> Result<bool, ProbeError> {
        let binary = self.binary.clone();
        let search_path = self.search_path.clone();

        let found = tokio::task::spawn_blocking(move || {
            let cwd = std::env::current_dir()
                .map_err(|e| ProbeError::Unavailable(e.to_string()))?;
            let lookup = match search_path {
                Some(paths) => which::which_in(&binary, Some(paths), cwd),
                None => which::which(&binary),
            };
            match lookup {
                Ok(path) => {
                    tracing::debug!(binary = %binary, path = %path.display(), "Found authenticator helper");
                    Ok(true)
                }
                Err(which::Error::CannotFindBinaryPath) => Ok(false),
                Err(e) => Err(ProbeError::Unavailable(e.to_string())),
            }
        })
        .await
        .map_err(|e| ProbeError::Task(e.to_string()))??;

        Ok(found)
    }
}
