//! Child process sessions.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use regex::bytes::Regex;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};
use wfe_oracle::{eventually, PollError, PollPolicy};

use crate::buffer::OutputBuffer;
use crate::error::DriverError;

/// Shell used to interpret command lines.
const SHELL: &str = "/bin/sh";

/// Read chunk size for the output pumps.
const CHUNK_SIZE: usize = 8192;

/// Which output stream an assertion reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn index(self) -> usize {
        match self {
            Stream::Stdout => 0,
            Stream::Stderr => 1,
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdout => f.write_str("stdout"),
            Stream::Stderr => f.write_str("stderr"),
        }
    }
}

/// What a [`CommandSpec`] hands to the OS.
#[derive(Debug, Clone)]
enum Invocation {
    /// Interpreted by `/bin/sh -c`.
    Shell,
    /// Executed directly, so a missing program fails at spawn time.
    Exec { program: String, args: Vec<String> },
}

/// A command line plus the environment it runs in.
///
/// The environment is inherited from the caller; `env` entries override it.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    line: String,
    invocation: Invocation,
    envs: Vec<(String, String)>,
    cwd: Option<PathBuf>,
    echo: bool,
}

impl CommandSpec {
    /// A shell command line.
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            invocation: Invocation::Shell,
            envs: Vec::new(),
            cwd: None,
            echo: false,
        }
    }

    /// `program` with `args`, executed without a shell. The quoted command
    /// line is kept for logs and error messages.
    pub fn exec<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let program = program.into();
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut line = shell_quote(&program);
        for arg in &args {
            line.push(' ');
            line.push_str(&shell_quote(arg));
        }
        Self {
            line,
            invocation: Invocation::Exec { program, args },
            envs: Vec::new(),
            cwd: None,
            echo: false,
        }
    }

    /// Override one environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Run in `dir` instead of the caller's working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Log the command line and its output at info level.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    /// The program run directly, if this is not a shell line.
    pub fn program(&self) -> Option<&str> {
        match &self.invocation {
            Invocation::Shell => None,
            Invocation::Exec { program, .. } => Some(program),
        }
    }
}

/// Resolve `program` the way `execvp` would: a name containing `/` is taken
/// as a path, anything else is searched for on `PATH`.
pub fn find_executable(program: &str) -> Option<PathBuf> {
    if program.contains('/') {
        let path = PathBuf::from(program);
        return is_executable(&path).then_some(path);
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Quote `word` for safe interpolation into a `/bin/sh` command line.
pub fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,@%+".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// A running (or finished) child process.
///
/// Dropping a session kills the child if it is still running.
#[derive(Debug)]
pub struct Session {
    command: String,
    pid: Option<u32>,
    stdout: OutputBuffer,
    stderr: OutputBuffer,
    cursors: [usize; 2],
    exit: watch::Receiver<Option<i32>>,
    kill: Option<oneshot::Sender<()>>,
    poll: PollPolicy,
}

impl Session {
    /// Spawn `spec` and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(spec: CommandSpec) -> Result<Self, DriverError> {
        let CommandSpec {
            line,
            invocation,
            envs,
            cwd,
            echo,
        } = spec;

        let mut command = match &invocation {
            Invocation::Shell => {
                let mut command = Command::new(SHELL);
                command.arg("-c").arg(&line);
                command
            }
            Invocation::Exec { program, args } => {
                let mut command = Command::new(program);
                command.args(args);
                command
            }
        };
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &envs {
            command.env(key, value);
        }
        if let Some(dir) = &cwd {
            command.current_dir(dir);
        }

        if echo {
            info!(command = %line, cwd = ?cwd, "exec");
        } else {
            debug!(command = %line, cwd = ?cwd, "exec");
        }

        let mut child = command.spawn().map_err(|source| DriverError::Spawn {
            command: line.clone(),
            source,
        })?;
        let pid = child.id();

        let stdout = OutputBuffer::new();
        let stderr = OutputBuffer::new();
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        let (exit_tx, exit_rx) = watch::channel(None);
        let (kill_tx, mut kill_rx) = oneshot::channel::<()>();

        let supervisor = {
            let stdout = stdout.clone();
            let stderr = stderr.clone();
            let line = line.clone();
            async move {
                let out_task = tokio::spawn(pump(stdout_pipe, stdout.clone()));
                let err_task = tokio::spawn(pump(stderr_pipe, stderr.clone()));

                let status = tokio::select! {
                    status = child.wait() => status,
                    _ = &mut kill_rx => {
                        debug!(command = %line, "killing child");
                        if let Err(e) = child.kill().await {
                            warn!(command = %line, error = %e, "failed to kill child");
                        }
                        child.wait().await
                    }
                };

                // Publish the exit only once both streams are drained, so an
                // observer that sees the exit also sees all output.
                let _ = out_task.await;
                let _ = err_task.await;

                let code = match status {
                    Ok(status) => status.code().unwrap_or(-1),
                    Err(e) => {
                        warn!(command = %line, error = %e, "failed to wait for child");
                        -1
                    }
                };

                if echo {
                    info!(
                        command = %line,
                        exit_code = code,
                        stdout = %stdout.text(),
                        stderr = %stderr.text(),
                        "exited"
                    );
                } else {
                    debug!(command = %line, exit_code = code, "exited");
                }

                let _ = exit_tx.send(Some(code));
            }
        };
        tokio::spawn(supervisor);

        Ok(Self {
            command: line,
            pid,
            stdout,
            stderr,
            cursors: [0, 0],
            exit: exit_rx,
            kill: Some(kill_tx),
            poll: PollPolicy::default(),
        })
    }

    /// Override the poll interval used by assertions.
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// The command line this session runs.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Live buffer for `stream`.
    pub fn buffer(&self, stream: Stream) -> &OutputBuffer {
        match stream {
            Stream::Stdout => &self.stdout,
            Stream::Stderr => &self.stderr,
        }
    }

    /// Everything captured on `stream` so far.
    pub fn contents(&self, stream: Stream) -> Vec<u8> {
        self.buffer(stream).contents()
    }

    /// Everything captured on `stream` so far, as lossy UTF-8.
    pub fn text(&self, stream: Stream) -> String {
        self.buffer(stream).text()
    }

    /// Exit code if the process has already exited. `-1` means killed by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        *self.exit.borrow()
    }

    /// Kill the child if it is still running.
    pub fn kill(&mut self) {
        if let Some(kill) = self.kill.take() {
            let _ = kill.send(());
        }
    }

    /// Wait until the unread part of `stream` matches `pattern`, then move
    /// the stream's cursor past the match. Returns the matched text.
    ///
    /// Fails immediately if the process exits without the pattern appearing.
    pub async fn say(
        &mut self,
        stream: Stream,
        pattern: &str,
        timeout: Duration,
    ) -> Result<String, DriverError> {
        let regex = Regex::new(pattern).map_err(|source| DriverError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let cursor = self.cursors[stream.index()];
        let what = format!("{stream} to match /{pattern}/");

        let found = {
            let buffer = self.buffer(stream);
            let exit = &self.exit;
            let regex = &regex;
            eventually(&what, self.poll.with_timeout(timeout), || async move {
                // Read the exit state first: output is complete once it is set.
                let exit_code = *exit.borrow();
                let data = buffer.contents_from(cursor);
                if let Some(m) = regex.find(&data) {
                    let text = String::from_utf8_lossy(m.as_bytes()).into_owned();
                    return Some(Ok((cursor + m.end(), text)));
                }
                exit_code.map(Err)
            })
            .await
        };

        match found {
            Ok(Ok((end, text))) => {
                self.cursors[stream.index()] = end;
                Ok(text)
            }
            Ok(Err(exit_code)) => Err(DriverError::NoMatch {
                command: self.command.clone(),
                what,
                exit_code,
                stdout: self.stdout.text(),
                stderr: self.stderr.text(),
            }),
            Err(PollError::Timeout { what, .. }) => Err(self.timeout(what)),
        }
    }

    /// Wait for the process to exit and return its code.
    pub async fn wait(&self, timeout: Duration) -> Result<i32, DriverError> {
        let mut exit = self.exit.clone();
        let code = match tokio::time::timeout(timeout, exit.wait_for(Option::is_some)).await {
            Ok(Ok(code)) => (*code).unwrap_or(-1),
            Ok(Err(_)) => {
                return Err(DriverError::Lost {
                    command: self.command.clone(),
                })
            }
            Err(_) => return Err(self.timeout(format!("exit within {timeout:?}"))),
        };
        Ok(code)
    }

    /// Wait for the process to exit with `expected`.
    pub async fn exit(&self, expected: i32, timeout: Duration) -> Result<(), DriverError> {
        let actual = self.wait(timeout).await?;
        if actual == expected {
            Ok(())
        } else {
            Err(DriverError::UnexpectedExit {
                command: self.command.clone(),
                expected,
                actual,
                stdout: self.stdout.text(),
                stderr: self.stderr.text(),
            })
        }
    }

    fn timeout(&self, what: String) -> DriverError {
        DriverError::Timeout {
            command: self.command.clone(),
            what,
            stdout: self.stdout.text(),
            stderr: self.stderr.text(),
        }
    }
}

async fn pump<R>(reader: Option<R>, buffer: OutputBuffer)
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return;
    };
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => buffer.append(&chunk[..n]),
            Err(e) => {
                debug!(error = %e, "output pipe closed with error");
                break;
            }
        }
    }
}
