//! Prompt-driven interpreter session over stdin/stdout pipes.
//!
//! IDL is a line-oriented REPL: it prints `IDL> ` when ready, executes one
//! command line at a time, and prefixes diagnostics with `% `. A session
//! writes command lines to the child's stdin and accumulates stdout until
//! the next prompt appears.

use std::io;
use std::process::Stdio;
use std::sync::LazyLock;

use regex::Regex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, trace};

use fhd_protocol::{FunctionCall, IdlValue, KeywordArgs, ParseError, ProcedureCall, parse_printed};

use crate::error::SessionError;

/// Prompt emitted by the interpreter when it is ready for input.
pub const PROMPT: &str = "IDL> ";

/// Variable used to stage function results inside the session. The
/// trailing underscore keeps it out of the way of user-visible names.
const RESULT_VAR: &str = "fhd_result_";

// Diagnostics look like `% FHD_SETUP: Variable is undefined: X.`;
// compilation notices share the prefix and are not errors.
static DIAGNOSTIC_LINE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^%\s+(.+)$").expect("static regex is valid"));

/// One spawned interpreter process, paired 1:1 with a single invocation.
pub struct Session {
	locator: String,
	child: Child,
	stdin: ChildStdin,
	stdout: ChildStdout,
	closed: bool,
}

impl Session {
	/// Spawns the interpreter at `locator` and waits for its first prompt.
	pub async fn open(locator: &str) -> Result<Self, SessionError> {
		debug!(target: "fhd.session", locator, "starting interpreter session");

		let start_error = |source: io::Error| SessionError::Start {
			locator: locator.to_string(),
			source,
		};

		let mut child = Command::new(locator)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::null())
			.kill_on_drop(true)
			.spawn()
			.map_err(start_error)?;

		let stdin = child
			.stdin
			.take()
			.ok_or_else(|| start_error(io::Error::other("interpreter stdin not captured")))?;
		let stdout = child
			.stdout
			.take()
			.ok_or_else(|| start_error(io::Error::other("interpreter stdout not captured")))?;

		let mut session = Self {
			locator: locator.to_string(),
			child,
			stdin,
			stdout,
			closed: false,
		};

		match session.read_to_prompt().await {
			Ok(banner) => {
				trace!(target: "fhd.session", banner = banner.trim(), "interpreter ready");
				Ok(session)
			}
			Err(source) => Err(SessionError::Start {
				locator: session.locator.clone(),
				source,
			}),
		}
	}

	/// Locator this session was started from.
	pub fn locator(&self) -> &str {
		&self.locator
	}

	/// Invokes a remote procedure by name; no return value.
	pub async fn call_procedure(
		&mut self,
		name: &str,
		kwargs: &KeywordArgs,
	) -> Result<(), SessionError> {
		let command = ProcedureCall { name, kwargs }.to_string();
		debug!(target: "fhd.session", %command, "invoking procedure");
		self.run_command(&command).await?;
		Ok(())
	}

	/// Invokes a remote function by name and returns the decoded value.
	///
	/// The result is staged in a session-local variable, then retrieved by
	/// querying its type code and element count before printing it.
	pub async fn call_function(
		&mut self,
		name: &str,
		args: &[IdlValue],
		kwargs: &KeywordArgs,
	) -> Result<IdlValue, SessionError> {
		let call = FunctionCall { name, args, kwargs };
		let command = format!("{RESULT_VAR} = {call}");
		debug!(target: "fhd.session", %command, "invoking function");
		self.run_command(&command).await?;

		let type_code = self.query_long(&format!("print, size({RESULT_VAR}, /type)")).await?;
		let n_elements = self.query_long(&format!("print, n_elements({RESULT_VAR})")).await?;
		let printed = self.run_command(&format!("print, {RESULT_VAR}")).await?;

		let value = parse_printed(type_code, n_elements as usize, &printed)?;
		trace!(target: "fhd.session", ?value, "function result decoded");
		Ok(value)
	}

	/// Shuts the interpreter down and reaps the process.
	///
	/// Idempotent, and callable after a prior failure on the same handle:
	/// when the pipe is already gone the child is killed instead.
	pub async fn close(&mut self) -> Result<(), SessionError> {
		if self.closed {
			return Ok(());
		}
		self.closed = true;
		debug!(target: "fhd.session", locator = %self.locator, "closing interpreter session");

		if self.send_line("exit").await.is_err() {
			self.child
				.kill()
				.await
				.map_err(|e| SessionError::Close(format!("kill after broken pipe: {e}")))?;
			return Ok(());
		}

		match self.child.wait().await {
			Ok(status) if status.success() => Ok(()),
			Ok(status) => Err(SessionError::Close(format!("interpreter exited with {status}"))),
			Err(e) => Err(SessionError::Close(e.to_string())),
		}
	}

	/// Runs one command line and returns the output produced before the
	/// next prompt, with interpreter diagnostics classified as errors.
	async fn run_command(&mut self, command: &str) -> Result<String, SessionError> {
		self.send_line(command).await?;
		let output = self.read_to_prompt().await?;
		if let Some(message) = first_error_line(&output) {
			return Err(SessionError::Remote {
				command: command.to_string(),
				message,
			});
		}
		Ok(output)
	}

	// A command whose whole output must be one printed integer.
	async fn query_long(&mut self, command: &str) -> Result<i64, SessionError> {
		let output = self.run_command(command).await?;
		let text = output.trim();
		let value = text
			.parse::<i64>()
			.map_err(|_| ParseError::Int(text.to_string()))?;
		Ok(value)
	}

	async fn send_line(&mut self, line: &str) -> io::Result<()> {
		trace!(target: "fhd.session", line, "sending command line");
		self.stdin.write_all(line.as_bytes()).await?;
		self.stdin.write_all(b"\n").await?;
		self.stdin.flush().await
	}

	async fn read_to_prompt(&mut self) -> io::Result<String> {
		let mut buffer: Vec<u8> = Vec::new();
		let mut chunk = [0u8; 4096];
		loop {
			let n = self.stdout.read(&mut chunk).await?;
			if n == 0 {
				return Err(io::Error::new(
					io::ErrorKind::UnexpectedEof,
					"interpreter closed its output before the prompt",
				));
			}
			buffer.extend_from_slice(&chunk[..n]);
			if buffer.ends_with(PROMPT.as_bytes()) {
				let output = &buffer[..buffer.len() - PROMPT.len()];
				return Ok(String::from_utf8_lossy(output).into_owned());
			}
		}
	}
}

/// First interpreter diagnostic in `output` that is an actual error,
/// skipping compilation notices.
fn first_error_line(output: &str) -> Option<String> {
	for line in output.lines() {
		let Some(captures) = DIAGNOSTIC_LINE.captures(line.trim_end()) else {
			continue;
		};
		let message = captures[1].to_string();
		if message.starts_with("Compiled module") {
			continue;
		}
		return Some(message);
	}
	None
}
