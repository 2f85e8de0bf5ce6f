//! Parsing of printed interpreter output back into values.
//!
//! Function results are retrieved by printing a staging variable inside
//! the session; the caller first queries IDL's `size(x, /type)` code and
//! `n_elements(x)`, then decodes the printed text with those in hand.

use thiserror::Error;

use crate::value::IdlValue;

/// Failures while decoding printed interpreter output.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
	#[error("invalid integer in interpreter output: `{0}`")]
	Int(String),
	#[error("invalid float in interpreter output: `{0}`")]
	Float(String),
	#[error("unsupported IDL type code {0}")]
	UnsupportedType(i64),
	#[error("expected {expected} printed elements, found {found}")]
	ElementCount { expected: usize, found: usize },
}

/// Decodes one printed scalar according to its IDL type code.
///
/// Codes 1-3 and 12-15 are the integer kinds, 4 and 5 the floating
/// kinds, 7 is string. Structures, pointers and objects are not
/// representable here.
pub fn parse_scalar(type_code: i64, text: &str) -> Result<IdlValue, ParseError> {
	let text = text.trim();
	match type_code {
		1..=3 | 12..=15 => text
			.parse::<i64>()
			.map(IdlValue::Long)
			.map_err(|_| ParseError::Int(text.to_string())),
		4 | 5 => text
			.parse::<f64>()
			.map(IdlValue::Double)
			.map_err(|_| ParseError::Float(text.to_string())),
		7 => Ok(IdlValue::Str(text.to_string())),
		other => Err(ParseError::UnsupportedType(other)),
	}
}

/// Decodes printed output for a value of known type and element count.
///
/// Scalars pass straight through; arrays are split on whitespace for the
/// numeric kinds and on lines for strings, which is how IDL prints them.
pub fn parse_printed(type_code: i64, n_elements: usize, text: &str) -> Result<IdlValue, ParseError> {
	if n_elements <= 1 {
		return parse_scalar(type_code, text);
	}

	let tokens: Vec<&str> = if type_code == 7 {
		text.lines().map(str::trim).filter(|line| !line.is_empty()).collect()
	} else {
		text.split_whitespace().collect()
	};

	if tokens.len() != n_elements {
		return Err(ParseError::ElementCount { expected: n_elements, found: tokens.len() });
	}

	tokens
		.into_iter()
		.map(|token| parse_scalar(type_code, token))
		.collect::<Result<Vec<_>, _>>()
		.map(IdlValue::List)
}
