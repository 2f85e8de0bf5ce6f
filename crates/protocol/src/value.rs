//! Value model shared between the caller and the interpreter.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A value that can cross into an IDL session.
///
/// IDL has no native boolean type, so there is deliberately no boolean
/// variant: `From<bool>` folds `true`/`false` into `Long(1)`/`Long(0)`
/// before the value is stored anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdlValue {
	Long(i64),
	Double(f64),
	Str(String),
	List(Vec<IdlValue>),
}

impl IdlValue {
	/// Renders the value as an IDL source literal.
	///
	/// Strings are single-quoted with embedded quotes doubled; lists
	/// become bracketed array literals.
	pub fn to_literal(&self) -> String {
		match self {
			IdlValue::Long(v) => v.to_string(),
			IdlValue::Double(v) => double_literal(*v),
			IdlValue::Str(v) => format!("'{}'", v.replace('\'', "''")),
			IdlValue::List(items) => {
				let rendered: Vec<String> = items.iter().map(IdlValue::to_literal).collect();
				format!("[{}]", rendered.join(", "))
			}
		}
	}
}

// A whole-valued double must keep its decimal point or the interpreter
// reads it back as an integer.
fn double_literal(v: f64) -> String {
	if v.is_finite() && v.fract() == 0.0 {
		format!("{v:.1}")
	} else {
		v.to_string()
	}
}

impl fmt::Display for IdlValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_literal())
	}
}

impl From<bool> for IdlValue {
	fn from(v: bool) -> Self {
		IdlValue::Long(i64::from(v))
	}
}

macro_rules! from_integer {
	($($ty:ty),*) => {
		$(impl From<$ty> for IdlValue {
			fn from(v: $ty) -> Self {
				IdlValue::Long(i64::from(v))
			}
		})*
	};
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for IdlValue {
	fn from(v: f64) -> Self {
		IdlValue::Double(v)
	}
}

impl From<f32> for IdlValue {
	fn from(v: f32) -> Self {
		IdlValue::Double(f64::from(v))
	}
}

impl From<&str> for IdlValue {
	fn from(v: &str) -> Self {
		IdlValue::Str(v.to_string())
	}
}

impl From<String> for IdlValue {
	fn from(v: String) -> Self {
		IdlValue::Str(v)
	}
}

impl From<Vec<IdlValue>> for IdlValue {
	fn from(v: Vec<IdlValue>) -> Self {
		IdlValue::List(v)
	}
}

impl From<Vec<String>> for IdlValue {
	fn from(v: Vec<String>) -> Self {
		IdlValue::List(v.into_iter().map(IdlValue::Str).collect())
	}
}

impl From<&[&str]> for IdlValue {
	fn from(v: &[&str]) -> Self {
		IdlValue::List(v.iter().map(|s| IdlValue::from(*s)).collect())
	}
}

/// Keyword arguments for a remote call.
///
/// Keys are unique; setting an existing key overwrites its value.
/// Iteration is ordered by key so rendered commands are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordArgs(BTreeMap<String, IdlValue>);

impl KeywordArgs {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores a keyword, overwriting any previous value under the key.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<IdlValue>) {
		self.0.insert(key.into(), value.into());
	}

	pub fn get(&self, key: &str) -> Option<&IdlValue> {
		self.0.get(key)
	}

	pub fn remove(&mut self, key: &str) -> Option<IdlValue> {
		self.0.remove(key)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &IdlValue)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v))
	}
}

impl<K: Into<String>, V: Into<IdlValue>> FromIterator<(K, V)> for KeywordArgs {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut kwargs = Self::new();
		kwargs.extend(iter);
		kwargs
	}
}

impl<K: Into<String>, V: Into<IdlValue>> Extend<(K, V)> for KeywordArgs {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (key, value) in iter {
			self.set(key, value);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bool_folds_to_long() {
		assert_eq!(IdlValue::from(true), IdlValue::Long(1));
		assert_eq!(IdlValue::from(false), IdlValue::Long(0));
	}

	#[test]
	fn string_literal_doubles_quotes() {
		assert_eq!(IdlValue::from("it's").to_literal(), "'it''s'");
	}

	#[test]
	fn whole_double_keeps_decimal_point() {
		assert_eq!(IdlValue::from(2.0).to_literal(), "2.0");
		assert_eq!(IdlValue::from(2.5).to_literal(), "2.5");
	}

	#[test]
	fn list_literal_is_bracketed() {
		let list = IdlValue::from(vec!["a.dat".to_string(), "b.dat".to_string()]);
		assert_eq!(list.to_literal(), "['a.dat', 'b.dat']");
	}

	#[test]
	fn set_overwrites_existing_key() {
		let mut kwargs = KeywordArgs::new();
		kwargs.set("n_pol", 2);
		kwargs.set("n_pol", 4);
		assert_eq!(kwargs.get("n_pol"), Some(&IdlValue::Long(4)));
		assert_eq!(kwargs.len(), 1);
	}

	#[test]
	fn kwargs_iterate_in_key_order() {
		let kwargs: KeywordArgs = [("beta", 1), ("alpha", 2)].into_iter().collect();
		let keys: Vec<&str> = kwargs.iter().map(|(k, _)| k).collect();
		assert_eq!(keys, ["alpha", "beta"]);
	}
}
