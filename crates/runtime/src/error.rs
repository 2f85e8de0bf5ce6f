//! Session-level error types.

use std::io;

use thiserror::Error;

/// Failures while starting, driving, or shutting down one interpreter
/// session.
#[derive(Debug, Error)]
pub enum SessionError {
	/// The interpreter executable could not be spawned, or it exited
	/// before producing its first prompt.
	#[error("failed to start interpreter session at `{locator}`")]
	Start {
		locator: String,
		#[source]
		source: io::Error,
	},

	/// The interpreter reported an error while executing a command.
	#[error("interpreter error during `{command}`: {message}")]
	Remote { command: String, message: String },

	/// The pipe to the interpreter broke mid-command.
	#[error("interpreter i/o failed")]
	Io(#[from] io::Error),

	/// A printed result could not be decoded.
	#[error("could not decode interpreter output")]
	Parse(#[from] fhd_protocol::ParseError),

	/// The session did not shut down cleanly.
	#[error("failed to close interpreter session: {0}")]
	Close(String),
}
