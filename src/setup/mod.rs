//! Environment bootstrap: isolated package environment plus the dataset.
//!
//! Only environment creation is fatal. Package install failures and dataset
//! download/extraction failures are logged and the run continues.

pub mod download;
pub mod environment;
pub mod extractor;

use std::fmt;
use std::fs;

use crate::config::SetupConfig;
use environment::PackageManager;

/// Setup error types
#[derive(Debug)]
pub enum SetupError {
    Io(String),
    Network(String),
    Archive(String),
    Process(String),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Io(e) => write!(f, "IO error: {}", e),
            SetupError::Network(e) => write!(f, "Network error: {}", e),
            SetupError::Archive(e) => write!(f, "ZIP error: {}", e),
            SetupError::Process(e) => write!(f, "Process error: {}", e),
        }
    }
}

impl std::error::Error for SetupError {}

impl From<std::io::Error> for SetupError {
    fn from(e: std::io::Error) -> Self {
        SetupError::Io(e.to_string())
    }
}

/// Which packages made it into the environment
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub installed: Vec<String>,
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetStatus {
    Ready,
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct SetupReport {
    pub environment_created: bool,
    pub packages: InstallReport,
    pub dataset: DatasetStatus,
}

pub struct Bootstrapper<P: PackageManager> {
    manager: P,
    config: SetupConfig,
}

impl<P: PackageManager> Bootstrapper<P> {
    pub fn new(manager: P, config: SetupConfig) -> Self {
        Self { manager, config }
    }

    pub fn manager(&self) -> &P {
        &self.manager
    }

    pub fn config(&self) -> &SetupConfig {
        &self.config
    }

    /// Create the environment unless its directory already exists.
    /// Returns whether anything was created.
    pub fn ensure_environment(&self) -> Result<bool, SetupError> {
        let dir = &self.config.venv_dir;
        if dir.exists() {
            tracing::info!("Virtual environment {} already exists.", dir.display());
            return Ok(false);
        }

        tracing::info!("Creating virtual environment at {}...", dir.display());
        self.manager.create_environment(dir)?;
        Ok(true)
    }

    /// Install each package independently; one failure never stops the rest
    pub fn install_packages(&self, packages: &[String]) -> InstallReport {
        let mut report = InstallReport::default();

        for package in packages {
            if let Err(e) = self.manager.upgrade_installer() {
                tracing::warn!("Failed to upgrade installer: {}", e);
            }

            match self.manager.install(package) {
                Ok(()) => report.installed.push(package.clone()),
                Err(e) => {
                    tracing::warn!("Failed to install {}, skipping. ({})", package, e);
                    report.failed.push(package.clone());
                }
            }
        }

        report
    }

    /// Download, extract and delete the dataset archive. Never fails the run.
    pub fn fetch_dataset(&self) -> DatasetStatus {
        match fetch_dataset(
            &self.config.data_url,
            &self.config.data_path,
            &self.config.data_dir,
        ) {
            Ok(()) => {
                tracing::info!("Dataset ready!");
                DatasetStatus::Ready
            }
            Err(e) => {
                tracing::warn!("Failed to download/extract dataset: {}", e);
                DatasetStatus::Failed(e.to_string())
            }
        }
    }

    pub fn run(&self) -> Result<SetupReport, SetupError> {
        self.run_with(true)
    }

    /// Full bootstrap; with `fetch_dataset` false the download is skipped
    pub fn run_with(&self, fetch_dataset: bool) -> Result<SetupReport, SetupError> {
        let environment_created = self.ensure_environment()?;
        let packages = self.install_packages(&self.config.requirements);
        let dataset = if fetch_dataset {
            self.fetch_dataset()
        } else {
            tracing::info!("Skipping dataset download");
            DatasetStatus::Skipped
        };

        println!("\nSetup complete!");
        println!(
            "Activate your virtual environment with: {}",
            environment::activation_hint(&self.config.venv_dir)
        );
        println!("Then you can run your project scripts with the installed packages.");

        Ok(SetupReport {
            environment_created,
            packages,
            dataset,
        })
    }
}

/// Download `url` to `archive_path`, extract it into `extract_dir`, remove the archive
pub fn fetch_dataset(
    url: &str,
    archive_path: &std::path::Path,
    extract_dir: &std::path::Path,
) -> Result<(), SetupError> {
    fs::create_dir_all(extract_dir)?;
    download::download_file(url, archive_path)?;
    extractor::extract_archive(archive_path, extract_dir)?;
    fs::remove_file(archive_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(SetupError::Network("refused".into()).to_string(), "Network error: refused");
        assert_eq!(SetupError::Archive("bad".into()).to_string(), "ZIP error: bad");

        let io: SetupError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(io, SetupError::Io(_)));
    }
}
