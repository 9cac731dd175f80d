//! Spawning the automation scripts and streaming their output.
//!
//! Each output stream of the child is drained by its own thread; lines from
//! both arrive on one channel in the order they were read, followed by a
//! single [`RunEvent::Finished`].

use std::env;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use thiserror::Error;
use tracing::{debug, warn};

use crate::runner_config::{RunnerConfig, Task};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("no interpreter found on PATH (tried: {})", .candidates.join(", "))]
    InterpreterNotFound { candidates: Vec<String> },
    #[error("script not found: {path}")]
    ScriptNotFound { path: String },
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

/// A fully resolved command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl Invocation {
    /// `<interpreter> <args..> <script> -ProfileIndex <n> -ProfileName <name>`.
    pub fn for_task(
        config: &RunnerConfig,
        task: Task,
        store_dir: &Path,
        profile_number: usize,
        profile_name: &str,
    ) -> Result<Self, RunnerError> {
        let program = find_interpreter(&config.interpreters).ok_or_else(|| {
            RunnerError::InterpreterNotFound {
                candidates: config.interpreters.clone(),
            }
        })?;
        let script = config.script_path(task, store_dir);
        if !script.is_file() {
            return Err(RunnerError::ScriptNotFound {
                path: script.display().to_string(),
            });
        }

        let mut args = config.interpreter_args.clone();
        args.push(script.display().to_string());
        args.extend([
            "-ProfileIndex".to_string(),
            profile_number.to_string(),
            "-ProfileName".to_string(),
            profile_name.to_string(),
        ]);

        Ok(Self {
            program,
            args,
            working_dir: store_dir.to_path_buf(),
        })
    }
}

/// Progress of a running script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// One line from stdout or stderr, without its terminator.
    Line(String),
    /// The child exited; `None` when it was terminated by a signal.
    Finished { code: Option<i32> },
}

/// First candidate that resolves to an executable file.
///
/// Candidates containing a path separator are checked as given; bare names
/// are searched on `PATH`.
pub fn find_interpreter(candidates: &[String]) -> Option<PathBuf> {
    let search: Vec<PathBuf> = env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).collect())
        .unwrap_or_default();

    candidates.iter().find_map(|candidate| {
        let direct = Path::new(candidate);
        if direct.components().count() > 1 {
            return direct.is_file().then(|| direct.to_path_buf());
        }
        search
            .iter()
            .map(|dir| dir.join(candidate))
            .find(|path| path.is_file())
    })
}

/// Start `invocation` and return the channel its output arrives on.
pub fn spawn(invocation: &Invocation) -> Result<Receiver<RunEvent>, RunnerError> {
    debug!(
        program = %invocation.program.display(),
        args = ?invocation.args,
        dir = %invocation.working_dir.display(),
        "starting automation script"
    );
    let mut child = Command::new(&invocation.program)
        .args(&invocation.args)
        .current_dir(&invocation.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| RunnerError::Spawn {
            program: invocation.program.display().to_string(),
            source,
        })?;

    let (tx, rx) = mpsc::channel();
    let readers: Vec<_> = [
        child.stdout.take().map(|out| forward_lines(out, tx.clone())),
        child.stderr.take().map(|err| forward_lines(err, tx.clone())),
    ]
    .into_iter()
    .flatten()
    .collect();

    thread::spawn(move || {
        for reader in readers {
            if reader.join().is_err() {
                warn!("output reader thread panicked");
            }
        }
        let code = match child.wait() {
            Ok(status) => status.code(),
            Err(err) => {
                warn!(error = %err, "failed to wait for automation script");
                None
            }
        };
        let _ = tx.send(RunEvent::Finished { code });
    });

    Ok(rx)
}

fn forward_lines<R>(stream: R, tx: Sender<RunEvent>) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        for line in BufReader::new(stream).lines() {
            match line {
                Ok(line) => {
                    if tx.send(RunEvent::Line(line)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "stopped reading script output");
                    break;
                }
            }
        }
    })
}
