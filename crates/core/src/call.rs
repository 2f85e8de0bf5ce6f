//! Pending-call descriptors and dispatch.

use tracing::debug;

use fhd_protocol::{IdlValue, KeywordArgs};

use crate::DEFAULT_IDL_PATH;
use crate::bridge::{InterpreterBridge, ProcessBridge};
use crate::error::{FhdError, Result};
use crate::invoke::{invoke_function, invoke_procedure};

/// Whether a descriptor targets a procedure (no return value) or a
/// function (returns a value).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
	Procedure,
	Function,
}

/// One pending remote invocation.
///
/// The kind is fixed when the descriptor is built: positional arguments
/// select a function call, keyword arguments alone select a procedure
/// call. Arguments may be replaced any number of times before execution,
/// and each [`execute`](Self::execute) performs an independent interpreter
/// round trip in its own session.
#[derive(Debug, Clone)]
pub struct CallDescriptor {
	name: String,
	kind: CallKind,
	args: Vec<IdlValue>,
	kwargs: KeywordArgs,
	idl_path: String,
	result: Option<IdlValue>,
}

impl CallDescriptor {
	/// Builds a descriptor, deriving the call kind from the argument sets.
	///
	/// Fails with [`FhdError::Configuration`] when both sets are empty.
	pub fn new(
		name: impl Into<String>,
		args: Vec<IdlValue>,
		kwargs: KeywordArgs,
	) -> Result<Self> {
		let name = name.into();
		let kind = if !args.is_empty() {
			CallKind::Function
		} else if !kwargs.is_empty() {
			CallKind::Procedure
		} else {
			return Err(FhdError::Configuration(name));
		};
		Ok(Self {
			name,
			kind,
			args,
			kwargs,
			idl_path: DEFAULT_IDL_PATH.to_string(),
			result: None,
		})
	}

	/// Builds a function-kind descriptor from positional arguments.
	pub fn function(name: impl Into<String>, args: Vec<IdlValue>) -> Result<Self> {
		Self::new(name, args, KeywordArgs::new())
	}

	/// Builds a procedure-kind descriptor from keyword arguments.
	pub fn procedure(name: impl Into<String>, kwargs: KeywordArgs) -> Result<Self> {
		Self::new(name, Vec::new(), kwargs)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> CallKind {
		self.kind
	}

	pub fn args(&self) -> &[IdlValue] {
		&self.args
	}

	pub fn kwargs(&self) -> &KeywordArgs {
		&self.kwargs
	}

	/// Locator the next execution will start the interpreter from.
	pub fn idl_path(&self) -> &str {
		&self.idl_path
	}

	pub fn set_idl_path(&mut self, locator: impl Into<String>) {
		self.idl_path = locator.into();
	}

	/// Replaces the positional arguments wholesale.
	///
	/// The call kind chosen at construction is kept, even when the new
	/// set is empty.
	pub fn set_args(&mut self, args: Vec<IdlValue>) {
		self.args = args;
	}

	/// Merges keyword arguments: existing keys are overwritten, new keys
	/// added. Booleans are stored as the 0/1 integers the interpreter
	/// expects.
	pub fn set_kwargs<K, V, I>(&mut self, pairs: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<IdlValue>,
	{
		self.kwargs.extend(pairs);
	}

	/// Result of the last function-kind execution, if any.
	pub fn result(&self) -> Option<&IdlValue> {
		self.result.as_ref()
	}

	pub fn take_result(&mut self) -> Option<IdlValue> {
		self.result.take()
	}

	/// Runs the call against a freshly started interpreter session.
	pub async fn execute(&mut self) -> Result<()> {
		self.execute_with(&ProcessBridge).await
	}

	/// Runs the call through a caller-supplied bridge.
	///
	/// Procedure kinds discard any result; function kinds store the
	/// returned value, readable via [`result`](Self::result). On failure
	/// no result is stored.
	pub async fn execute_with(&mut self, bridge: &dyn InterpreterBridge) -> Result<()> {
		debug!(target: "fhd.call", name = %self.name, kind = ?self.kind, "executing descriptor");
		match self.kind {
			CallKind::Procedure => {
				invoke_procedure(bridge, &self.name, &self.idl_path, &self.kwargs).await
			}
			CallKind::Function => {
				let value =
					invoke_function(bridge, &self.name, &self.idl_path, &self.args, &self.kwargs)
						.await?;
				self.result = Some(value);
				Ok(())
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn positional_arguments_select_function_kind() {
		let call = CallDescriptor::function("n_obs", vec![IdlValue::from("obs.sav")]).unwrap();
		assert_eq!(call.kind(), CallKind::Function);
	}

	#[test]
	fn keyword_arguments_select_procedure_kind() {
		let kwargs: KeywordArgs = [("n_pol", 2)].into_iter().collect();
		let call = CallDescriptor::procedure("general_obs", kwargs).unwrap();
		assert_eq!(call.kind(), CallKind::Procedure);
	}

	#[test]
	fn positional_arguments_win_when_both_are_given() {
		let kwargs: KeywordArgs = [("quiet", 1)].into_iter().collect();
		let call = CallDescriptor::new("n_obs", vec![IdlValue::from(1)], kwargs).unwrap();
		assert_eq!(call.kind(), CallKind::Function);
	}

	#[test]
	fn empty_argument_sets_are_a_configuration_error() {
		let err = CallDescriptor::new("orphan", Vec::new(), KeywordArgs::new()).unwrap_err();
		assert!(matches!(err, FhdError::Configuration(name) if name == "orphan"));
	}

	#[test]
	fn set_args_keeps_the_kind_fixed() {
		let kwargs: KeywordArgs = [("n_pol", 2)].into_iter().collect();
		let mut call = CallDescriptor::procedure("general_obs", kwargs).unwrap();
		call.set_args(vec![IdlValue::from(7)]);
		assert_eq!(call.kind(), CallKind::Procedure);
		assert_eq!(call.args(), [IdlValue::Long(7)]);
	}

	#[test]
	fn set_kwargs_normalizes_booleans_to_integers() {
		let kwargs: KeywordArgs = [("n_pol", 2)].into_iter().collect();
		let mut call = CallDescriptor::procedure("general_obs", kwargs).unwrap();
		call.set_kwargs([("silent", true), ("deconvolve", false)]);
		assert_eq!(call.kwargs().get("silent"), Some(&IdlValue::Long(1)));
		assert_eq!(call.kwargs().get("deconvolve"), Some(&IdlValue::Long(0)));
	}

	#[test]
	fn set_kwargs_overwrites_existing_keys() {
		let kwargs: KeywordArgs = [("n_pol", 2)].into_iter().collect();
		let mut call = CallDescriptor::procedure("general_obs", kwargs).unwrap();
		call.set_kwargs([("n_pol", 4)]);
		assert_eq!(call.kwargs().get("n_pol"), Some(&IdlValue::Long(4)));
		assert_eq!(call.kwargs().len(), 1);
	}

	#[test]
	fn default_locator_is_overridable() {
		let mut call = CallDescriptor::function("n_obs", vec![IdlValue::from(1)]).unwrap();
		assert_eq!(call.idl_path(), crate::DEFAULT_IDL_PATH);
		call.set_idl_path("/opt/idl/bin/idl");
		assert_eq!(call.idl_path(), "/opt/idl/bin/idl");
	}
}
