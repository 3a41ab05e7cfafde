//! Abstraction over "run this WS1S script, report what came back" so that
//! classification logic can be tested without a MONA binary on `PATH`.

use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use netcheck_base::{NetcheckError, Result};

/// The raw result of running a script through a decision procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_success: bool,
}

/// Anything capable of running a MONA script and returning its output.
///
/// `Sync` so a single handle can be shared across the `rayon` fan-out in
/// [`crate::driver::check_all`].
pub trait SolverHandle: Sync {
    fn run(&self, script: &str, timeout: Duration) -> Result<SolverOutput>;
}

/// Runs scripts by shelling out to a MONA binary.
///
/// The script is written to a temporary file (MONA takes a file path, not
/// stdin) which is removed on every exit path because it is a
/// [`tempfile::NamedTempFile`]. The subprocess is polled rather than waited
/// on directly so a hung solver can be killed after `timeout`.
pub struct MonaSolver {
    binary: PathBuf,
}

impl MonaSolver {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }

    /// A handle pointing at `mona` resolved from `PATH`, the CLI default.
    pub fn on_path() -> Self {
        Self::new("mona")
    }
}

impl SolverHandle for MonaSolver {
    fn run(&self, script: &str, timeout: Duration) -> Result<SolverOutput> {
        let mut file = tempfile::Builder::new()
            .prefix("netcheck-")
            .suffix(".mona")
            .tempfile()
            .map_err(|e| NetcheckError::solver_failure(format!("could not create temp file: {e}")))?;
        file.write_all(script.as_bytes())
            .map_err(|e| NetcheckError::solver_failure(format!("could not write script: {e}")))?;
        file.flush()
            .map_err(|e| NetcheckError::solver_failure(format!("could not flush script: {e}")))?;

        let mut child = Command::new(&self.binary)
            .arg(file.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| NetcheckError::solver_failure(format!("could not start '{}': {e}", self.binary.display())))?;

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child
                .try_wait()
                .map_err(|e| NetcheckError::solver_failure(format!("could not poll solver: {e}")))?
            {
                break status;
            }
            if started.elapsed() >= timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(NetcheckError::solver_failure(format!(
                    "solver did not exit within {:?}",
                    timeout
                )));
            }
            std::thread::sleep(Duration::from_millis(20));
        };

        let output = child
            .wait_with_output()
            .map_err(|e| NetcheckError::solver_failure(format!("could not collect solver output: {e}")))?;

        Ok(SolverOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_success: status.success(),
        })
    }
}

/// A canned [`SolverHandle`] for exercising [`crate::verdict::Verdict`]
/// classification without a real MONA binary.
#[cfg(test)]
pub struct FakeSolver {
    pub stdout: String,
    pub exit_success: bool,
}

#[cfg(test)]
impl FakeSolver {
    pub fn unsatisfiable() -> Self {
        Self {
            stdout: "Formula is unsatisfiable\n".to_string(),
            exit_success: true,
        }
    }

    pub fn satisfiable() -> Self {
        Self {
            stdout: "A satisfying example of least length is:\n".to_string(),
            exit_success: true,
        }
    }

    pub fn crashed(message: impl Into<String>) -> Self {
        Self {
            stdout: message.into(),
            exit_success: false,
        }
    }
}

#[cfg(test)]
impl SolverHandle for FakeSolver {
    fn run(&self, _script: &str, _timeout: Duration) -> Result<SolverOutput> {
        Ok(SolverOutput {
            stdout: self.stdout.clone(),
            stderr: String::new(),
            exit_success: self.exit_success,
        })
    }
}
