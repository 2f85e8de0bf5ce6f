//! Error taxonomy for the dispatch layer.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FhdError>;

/// Errors surfaced by descriptor construction and execution.
///
/// A failed invocation never stores a partial result. When both the
/// remote call and the subsequent session close fail, the invocation
/// error is surfaced and the close failure is only logged.
#[derive(Debug, Error)]
pub enum FhdError {
	/// The descriptor was built with neither positional nor keyword
	/// arguments, so no call kind could be determined.
	#[error("cannot determine call kind for `{0}`: supply positional or keyword arguments")]
	Configuration(String),

	/// The interpreter session could not be started.
	#[error("failed to start interpreter session at `{locator}`")]
	SessionStart {
		locator: String,
		#[source]
		source: anyhow::Error,
	},

	/// The remote procedure or function failed inside the interpreter.
	#[error("remote execution of `{name}` failed")]
	RemoteExecution {
		name: String,
		#[source]
		source: anyhow::Error,
	},

	/// The session did not shut down cleanly after the invocation.
	#[error("failed to close interpreter session")]
	SessionClose(#[source] anyhow::Error),
}
