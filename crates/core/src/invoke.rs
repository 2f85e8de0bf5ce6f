//! Single-shot session invocation: open, call once, close.

use tracing::{debug, warn};

use fhd_protocol::{IdlValue, KeywordArgs};

use crate::bridge::InterpreterBridge;
use crate::error::Result;

/// Runs one remote procedure in a freshly started session.
///
/// The session is closed on every exit path. If the call fails and the
/// close fails too, the call error is surfaced and the close failure is
/// logged. No retries.
pub async fn invoke_procedure(
	bridge: &dyn InterpreterBridge,
	name: &str,
	locator: &str,
	kwargs: &KeywordArgs,
) -> Result<()> {
	let mut session = bridge.open_session(locator).await?;
	let outcome = session.call_procedure(name, kwargs).await;
	finish(name, outcome, session.close().await)
}

/// Runs one remote function in a freshly started session and returns its
/// value.
///
/// Same lifecycle and error precedence as [`invoke_procedure`].
pub async fn invoke_function(
	bridge: &dyn InterpreterBridge,
	name: &str,
	locator: &str,
	args: &[IdlValue],
	kwargs: &KeywordArgs,
) -> Result<IdlValue> {
	let mut session = bridge.open_session(locator).await?;
	let outcome = session.call_function(name, args, kwargs).await;
	finish(name, outcome, session.close().await)
}

fn finish<T>(name: &str, outcome: Result<T>, closed: Result<()>) -> Result<T> {
	match (outcome, closed) {
		(Ok(value), Ok(())) => {
			debug!(target: "fhd.invoke", name, "invocation completed");
			Ok(value)
		}
		(Ok(_), Err(close)) => Err(close),
		(Err(call), Ok(())) => Err(call),
		(Err(call), Err(close)) => {
			warn!(target: "fhd.invoke", name, error = %close, "session close failed after invocation error");
			Err(call)
		}
	}
}
