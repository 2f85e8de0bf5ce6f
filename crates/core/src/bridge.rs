//! Seam between the dispatch layer and the interpreter bridge.
//!
//! The dispatch layer depends on the interpreter only through these two
//! traits: obtain a session at a locator, then call exactly one procedure
//! or function through it and release it. [`ProcessBridge`] is the
//! default implementation, driving a real interpreter process via
//! `fhd-runtime`; [`crate::testing::FakeBridge`] substitutes a scripted
//! in-memory session.

use async_trait::async_trait;

use fhd_protocol::{IdlValue, KeywordArgs};
use fhd_runtime::{Session, SessionError};

use crate::error::{FhdError, Result};

/// One open interpreter session, paired 1:1 with a single invocation.
#[async_trait]
pub trait InterpreterSession: Send {
	/// Invokes a remote procedure by name; no return value.
	async fn call_procedure(&mut self, name: &str, kwargs: &KeywordArgs) -> Result<()>;

	/// Invokes a remote function by name and returns the decoded value.
	async fn call_function(
		&mut self,
		name: &str,
		args: &[IdlValue],
		kwargs: &KeywordArgs,
	) -> Result<IdlValue>;

	/// Releases the session. Callable after a prior failure on the same
	/// handle.
	async fn close(&mut self) -> Result<()>;
}

/// Opens one interpreter session per invocation.
#[async_trait]
pub trait InterpreterBridge: Send + Sync {
	async fn open_session(&self, locator: &str) -> Result<Box<dyn InterpreterSession>>;
}

/// Default bridge backed by a spawned interpreter process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessBridge;

#[async_trait]
impl InterpreterBridge for ProcessBridge {
	async fn open_session(&self, locator: &str) -> Result<Box<dyn InterpreterSession>> {
		let session = Session::open(locator).await.map_err(|e| into_core_error("open", e))?;
		Ok(Box::new(ProcessSession { session }))
	}
}

struct ProcessSession {
	session: Session,
}

#[async_trait]
impl InterpreterSession for ProcessSession {
	async fn call_procedure(&mut self, name: &str, kwargs: &KeywordArgs) -> Result<()> {
		self.session
			.call_procedure(name, kwargs)
			.await
			.map_err(|e| into_core_error(name, e))
	}

	async fn call_function(
		&mut self,
		name: &str,
		args: &[IdlValue],
		kwargs: &KeywordArgs,
	) -> Result<IdlValue> {
		self.session
			.call_function(name, args, kwargs)
			.await
			.map_err(|e| into_core_error(name, e))
	}

	async fn close(&mut self) -> Result<()> {
		self.session.close().await.map_err(|e| into_core_error("close", e))
	}
}

fn into_core_error(name: &str, err: SessionError) -> FhdError {
	match err {
		SessionError::Start { locator, source } => FhdError::SessionStart {
			locator,
			source: anyhow::Error::new(source),
		},
		SessionError::Close(message) => FhdError::SessionClose(anyhow::anyhow!(message)),
		other => FhdError::RemoteExecution {
			name: name.to_string(),
			source: anyhow::Error::new(other),
		},
	}
}
