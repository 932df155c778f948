use std::path::{Path, PathBuf};
use std::process::Command;

use super::SetupError;

/// Creates isolated environments and installs packages into them
pub trait PackageManager {
    fn create_environment(&self, dir: &Path) -> Result<(), SetupError>;

    /// Upgrade the installer inside the environment
    fn upgrade_installer(&self) -> Result<(), SetupError>;

    fn install(&self, package: &str) -> Result<(), SetupError>;
}

/// `python -m venv` plus the venv's own pip
pub struct PythonVenv {
    base_python: String,
    venv_dir: PathBuf,
}

impl PythonVenv {
    pub fn new(venv_dir: impl Into<PathBuf>) -> Self {
        let base_python = if cfg!(windows) { "python" } else { "python3" };
        Self::with_interpreter(base_python, venv_dir)
    }

    pub fn with_interpreter(base_python: impl Into<String>, venv_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_python: base_python.into(),
            venv_dir: venv_dir.into(),
        }
    }

    /// Interpreter inside the environment
    pub fn venv_python(&self) -> PathBuf {
        venv_python(&self.venv_dir)
    }

    fn pip(&self, args: &[&str]) -> Result<(), SetupError> {
        let python = self.venv_python();
        let mut cmd = Command::new(&python);
        cmd.arg("-m").arg("pip").args(args);
        run_command(cmd)
    }
}

impl PackageManager for PythonVenv {
    fn create_environment(&self, dir: &Path) -> Result<(), SetupError> {
        let mut cmd = Command::new(&self.base_python);
        cmd.arg("-m").arg("venv").arg(dir);
        run_command(cmd)
    }

    fn upgrade_installer(&self) -> Result<(), SetupError> {
        self.pip(&["install", "--upgrade", "pip"])
    }

    fn install(&self, package: &str) -> Result<(), SetupError> {
        self.pip(&["install", package])
    }
}

pub fn venv_python(venv_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_dir.join("Scripts").join("python.exe")
    } else {
        venv_dir.join("bin").join("python")
    }
}

/// Shell command that activates the environment
pub fn activation_hint(venv_dir: &Path) -> String {
    if cfg!(windows) {
        format!("{}", venv_dir.join("Scripts").join("activate").display())
    } else {
        format!("source {}", venv_dir.join("bin").join("activate").display())
    }
}

/// Run to completion, mapping spawn failures and non-zero exits to errors
fn run_command(mut cmd: Command) -> Result<(), SetupError> {
    let shown = format!("{:?}", cmd);
    tracing::info!("Running: {}", shown);

    let status = cmd
        .status()
        .map_err(|e| SetupError::Process(format!("{}: {}", shown, e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(SetupError::Process(format!("{} exited with {}", shown, status)))
    }
}
