//! Running the external database tool.
//!
//! [`CommandRunner`] is the seam between reconciliation and the operating
//! system, so tests can script the tool's answers.

use std::env;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::{Error, Result};

/// Exit code and captured streams of one finished command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub rc: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.rc == 0
    }
}

pub trait CommandRunner {
    /// Run `args[0]` with the remaining arguments, feeding `stdin` if given,
    /// and wait for it to exit.
    fn run(&self, args: &[String], stdin: Option<&str>) -> Result<CommandOutput>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, args: &[String], stdin: Option<&str>) -> Result<CommandOutput> {
        (**self).run(args, stdin)
    }
}

/// Runs commands as child processes.
#[derive(Clone, Debug, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, args: &[String], stdin: Option<&str>) -> Result<CommandOutput> {
        let (program, rest) = args
            .split_first()
            .ok_or_else(|| Error::Config("empty command line".to_string()))?;
        let spawn_err = |source| Error::Spawn {
            program: program.clone(),
            source,
        };

        let mut child = Command::new(program)
            .args(rest)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        if let Some(data) = stdin {
            if let Some(mut pipe) = child.stdin.take() {
                match pipe.write_all(data.as_bytes()) {
                    // Exited without reading all of its input; the exit code tells why
                    Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {}
                    result => result.map_err(spawn_err)?,
                }
            }
        }

        let output = child.wait_with_output().map_err(spawn_err)?;
        Ok(CommandOutput {
            // Killed by a signal
            rc: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Resolve `name` to an executable file, searching `path` when it is a bare
/// command name.
pub fn find_executable_in(name: &str, path: Option<&OsStr>) -> Result<PathBuf> {
    let not_found = || Error::Config(format!("Failed to find required executable {}", name));

    if name.contains('/') {
        let candidate = PathBuf::from(name);
        return if is_executable(&candidate) {
            Ok(candidate)
        } else {
            Err(not_found())
        };
    }

    let path = path.ok_or_else(not_found)?;
    env::split_paths(path)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
        .ok_or_else(not_found)
}

/// Resolve `name` against the `PATH` of this process.
pub fn find_executable(name: &str) -> Result<PathBuf> {
    let path = env::var_os("PATH");
    find_executable_in(name, path.as_deref())
}
