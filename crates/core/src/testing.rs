//! Scriptable fakes for exercising dispatch without an interpreter.
//!
//! [`FakeBridge`] stands in for [`ProcessBridge`]: each `open_session`
//! consumes the next [`SessionScript`] entry and yields a session that
//! records what was invoked on it and replays the scripted outcome. An
//! exhausted script keeps succeeding, so simple tests need no setup.
//!
//! [`ProcessBridge`]: crate::bridge::ProcessBridge

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use fhd_protocol::{IdlValue, KeywordArgs};

use crate::bridge::{InterpreterBridge, InterpreterSession};
use crate::call::CallKind;
use crate::error::{FhdError, Result};

/// Behavior of one scripted session, consumed per `open_session`.
#[derive(Debug, Default)]
pub struct SessionScript {
	/// Refuse to open at all.
	pub open: Option<FhdError>,
	/// Outcome of the single call; `Ok(None)` suits procedures, functions
	/// fall back to `Long(0)`.
	pub call: Option<Result<Option<IdlValue>>>,
	/// Outcome of the close; defaults to success.
	pub close: Option<Result<()>>,
}

/// Record of one invocation observed by a fake session.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
	pub kind: CallKind,
	pub name: String,
	pub locator: String,
	pub args: Vec<IdlValue>,
	pub kwargs: KeywordArgs,
}

/// In-memory bridge that replays scripted sessions and records calls.
#[derive(Default)]
pub struct FakeBridge {
	script: Mutex<VecDeque<SessionScript>>,
	calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeBridge {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues a scripted session.
	pub fn push(&self, script: SessionScript) {
		self.script.lock().push_back(script);
	}

	/// Queues a session whose call succeeds with `value`.
	pub fn push_value(&self, value: IdlValue) {
		self.push(SessionScript {
			call: Some(Ok(Some(value))),
			..SessionScript::default()
		});
	}

	/// Queues a session that refuses to open.
	pub fn push_open_error(&self, error: FhdError) {
		self.push(SessionScript {
			open: Some(error),
			..SessionScript::default()
		});
	}

	/// Queues a session whose call fails; `close_error` makes the close
	/// fail as well.
	pub fn push_call_error(&self, error: FhdError, close_error: Option<FhdError>) {
		self.push(SessionScript {
			call: Some(Err(error)),
			close: close_error.map(Err),
			..SessionScript::default()
		});
	}

	/// Queues a session whose call succeeds but whose close fails.
	pub fn push_close_error(&self, error: FhdError) {
		self.push(SessionScript {
			close: Some(Err(error)),
			..SessionScript::default()
		});
	}

	/// All invocations observed so far, in order.
	pub fn calls(&self) -> Vec<RecordedCall> {
		self.calls.lock().clone()
	}
}

#[async_trait]
impl InterpreterBridge for FakeBridge {
	async fn open_session(&self, locator: &str) -> Result<Box<dyn InterpreterSession>> {
		let entry = self.script.lock().pop_front().unwrap_or_default();
		if let Some(error) = entry.open {
			return Err(error);
		}
		Ok(Box::new(FakeSession {
			locator: locator.to_string(),
			call: entry.call,
			close: entry.close,
			calls: Arc::clone(&self.calls),
		}))
	}
}

struct FakeSession {
	locator: String,
	call: Option<Result<Option<IdlValue>>>,
	close: Option<Result<()>>,
	calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeSession {
	fn record(&self, kind: CallKind, name: &str, args: &[IdlValue], kwargs: &KeywordArgs) {
		self.calls.lock().push(RecordedCall {
			kind,
			name: name.to_string(),
			locator: self.locator.clone(),
			args: args.to_vec(),
			kwargs: kwargs.clone(),
		});
	}

	fn take_call(&mut self) -> Result<Option<IdlValue>> {
		self.call.take().unwrap_or(Ok(None))
	}
}

#[async_trait]
impl InterpreterSession for FakeSession {
	async fn call_procedure(&mut self, name: &str, kwargs: &KeywordArgs) -> Result<()> {
		self.record(CallKind::Procedure, name, &[], kwargs);
		self.take_call().map(|_| ())
	}

	async fn call_function(
		&mut self,
		name: &str,
		args: &[IdlValue],
		kwargs: &KeywordArgs,
	) -> Result<IdlValue> {
		self.record(CallKind::Function, name, args, kwargs);
		self.take_call().map(|value| value.unwrap_or(IdlValue::Long(0)))
	}

	async fn close(&mut self) -> Result<()> {
		self.close.take().unwrap_or(Ok(()))
	}
}
