use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Which automation script to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    FullSetup,
    BuildOvpn,
}

impl Task {
    pub fn label(&self) -> &'static str {
        match self {
            Task::FullSetup => "Full setup",
            Task::BuildOvpn => "Build OVPN files",
        }
    }

    /// Client configs are built per user, so an empty user list is refused.
    pub fn requires_users(&self) -> bool {
        matches!(self, Task::BuildOvpn)
    }
}

/// Interpreter and script locations for the automation toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunnerConfig {
    pub interpreters: Vec<String>,
    #[serde(default)]
    pub interpreter_args: Vec<String>,
    #[serde(default = "current_dir")]
    pub script_dir: PathBuf,
    pub full_setup_script: String,
    pub build_ovpn_script: String,
}

fn current_dir() -> PathBuf {
    PathBuf::from(".")
}

impl RunnerConfig {
    /// Script for `task`; relative locations resolve against `store_dir`.
    pub fn script_path(&self, task: Task, store_dir: &Path) -> PathBuf {
        let script = match task {
            Task::FullSetup => &self.full_setup_script,
            Task::BuildOvpn => &self.build_ovpn_script,
        };
        let dir = if self.script_dir.is_absolute() {
            self.script_dir.clone()
        } else {
            store_dir.join(&self.script_dir)
        };
        dir.join(script)
    }
}

#[derive(Debug, Deserialize)]
struct RunnerFile {
    runner: RunnerConfig,
}

/// Errors returned when loading a runner configuration file.
#[derive(Debug, Error)]
pub enum RunnerConfigError {
    #[error("failed to read runner config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse runner config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load a runner configuration from a TOML file.
pub fn load_runner_config(path: &Path) -> Result<RunnerConfig, RunnerConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| RunnerConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_runner_config(&raw, path.display().to_string())
}

/// The configuration shipped with the binary.
pub fn default_runner_config() -> RunnerConfig {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/defaults/runner.toml"));
    match parse_runner_config(embedded, "embedded runner.toml".to_string()) {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "embedded runner config is invalid, using built-in values");
            fallback_runner_config()
        }
    }
}

/// `path` when given and loadable, otherwise the embedded defaults.
pub fn runner_config_or_default(path: Option<&Path>) -> RunnerConfig {
    let Some(path) = path else {
        return default_runner_config();
    };
    load_runner_config(path).unwrap_or_else(|err| {
        warn!(error = %err, "falling back to embedded runner config");
        default_runner_config()
    })
}

fn parse_runner_config(raw: &str, path: String) -> Result<RunnerConfig, RunnerConfigError> {
    let file: RunnerFile =
        toml::from_str(raw).map_err(|source| RunnerConfigError::Parse { path, source })?;
    Ok(file.runner)
}

fn fallback_runner_config() -> RunnerConfig {
    RunnerConfig {
        interpreters: vec!["pwsh".into(), "powershell".into(), "powershell.exe".into()],
        interpreter_args: vec![
            "-NoProfile".into(),
            "-ExecutionPolicy".into(),
            "Bypass".into(),
            "-File".into(),
        ],
        script_dir: current_dir(),
        full_setup_script: "Run-Full-Setup.ps1".into(),
        build_ovpn_script: "Build-Ovpn-Files.ps1".into(),
    }
}
