//! Rendering of procedure and function invocations as IDL command lines.

use std::fmt;

use crate::value::{IdlValue, KeywordArgs};

/// A procedure invocation: `name, KEY=value, ...`.
///
/// Procedures take keyword arguments only and produce no return value.
#[derive(Debug, Clone)]
pub struct ProcedureCall<'a> {
	pub name: &'a str,
	pub kwargs: &'a KeywordArgs,
}

impl fmt::Display for ProcedureCall<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)?;
		for (key, value) in self.kwargs.iter() {
			write!(f, ", {key}={}", value.to_literal())?;
		}
		Ok(())
	}
}

/// A function invocation: `name(arg, ..., KEY=value)`.
#[derive(Debug, Clone)]
pub struct FunctionCall<'a> {
	pub name: &'a str,
	pub args: &'a [IdlValue],
	pub kwargs: &'a KeywordArgs,
}

impl fmt::Display for FunctionCall<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}(", self.name)?;
		let mut first = true;
		for arg in self.args {
			if !first {
				f.write_str(", ")?;
			}
			first = false;
			f.write_str(&arg.to_literal())?;
		}
		for (key, value) in self.kwargs.iter() {
			if !first {
				f.write_str(", ")?;
			}
			first = false;
			write!(f, "{key}={}", value.to_literal())?;
		}
		f.write_str(")")
	}
}
