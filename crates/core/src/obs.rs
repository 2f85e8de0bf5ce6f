//! Convenience builder for the pipeline's `general_obs` entry point.

use glob::glob;
use tracing::debug;

use fhd_protocol::KeywordArgs;

use crate::bridge::InterpreterBridge;
use crate::call::CallDescriptor;
use crate::error::Result;

/// Remote procedure driven by [`GeneralObs`].
pub const GENERAL_OBS: &str = "general_obs";

/// Keyword under which the resolved dataset paths are passed.
pub const VIS_FILE_LIST: &str = "vis_file_list";

const WILDCARDS: [char; 4] = ['*', '?', '[', ']'];

/// Dataset reference accepted by [`GeneralObs`]: a single path, a glob
/// pattern, or an explicit path list.
#[derive(Debug, Clone, PartialEq)]
pub enum UvfitsInput {
	Path(String),
	List(Vec<String>),
}

impl UvfitsInput {
	/// Resolves the input into an ordered list of paths.
	///
	/// A path containing any of `*?[]` is expanded against the
	/// filesystem; matches come back in alphabetical order and an empty
	/// expansion is not an error. An explicit list passes through
	/// unchanged.
	pub fn resolve(&self) -> Vec<String> {
		match self {
			UvfitsInput::Path(path) if path.contains(WILDCARDS) => expand(path),
			UvfitsInput::Path(path) => vec![path.clone()],
			UvfitsInput::List(paths) => paths.clone(),
		}
	}
}

impl From<&str> for UvfitsInput {
	fn from(path: &str) -> Self {
		UvfitsInput::Path(path.to_string())
	}
}

impl From<String> for UvfitsInput {
	fn from(path: String) -> Self {
		UvfitsInput::Path(path)
	}
}

impl From<Vec<String>> for UvfitsInput {
	fn from(paths: Vec<String>) -> Self {
		UvfitsInput::List(paths)
	}
}

impl From<&[&str]> for UvfitsInput {
	fn from(paths: &[&str]) -> Self {
		UvfitsInput::List(paths.iter().map(|p| p.to_string()).collect())
	}
}

// Entries the matcher cannot read are skipped; an invalid pattern
// matches nothing rather than erroring.
fn expand(pattern: &str) -> Vec<String> {
	match glob(pattern) {
		Ok(entries) => entries
			.filter_map(|entry| entry.ok())
			.map(|path| path.display().to_string())
			.collect(),
		Err(error) => {
			debug!(target: "fhd.obs", pattern, %error, "invalid glob pattern matches nothing");
			Vec::new()
		}
	}
}

/// Builder for dispatching the FHD `general_obs` procedure.
///
/// Owns a procedure-kind [`CallDescriptor`] whose `vis_file_list` keyword
/// is derived from the dataset input at construction.
#[derive(Debug, Clone)]
pub struct GeneralObs {
	call: CallDescriptor,
}

impl GeneralObs {
	/// Builds the call with the default interpreter locator.
	pub fn new(uvfits: impl Into<UvfitsInput>, kwargs: KeywordArgs) -> Result<Self> {
		let mut kwargs = kwargs;
		let files = uvfits.into().resolve();
		debug!(target: "fhd.obs", count = files.len(), "resolved vis_file_list");
		kwargs.set(VIS_FILE_LIST, files);
		let call = CallDescriptor::procedure(GENERAL_OBS, kwargs)?;
		Ok(Self { call })
	}

	/// Builds the call with an explicit interpreter locator.
	pub fn with_idl_path(
		uvfits: impl Into<UvfitsInput>,
		kwargs: KeywordArgs,
		idl_path: impl Into<String>,
	) -> Result<Self> {
		let mut obs = Self::new(uvfits, kwargs)?;
		obs.call.set_idl_path(idl_path);
		Ok(obs)
	}

	/// Recomputes `vis_file_list` from a new dataset input.
	pub fn load_uvfits(&mut self, uvfits: impl Into<UvfitsInput>) {
		let files = uvfits.into().resolve();
		self.call.set_kwargs([(VIS_FILE_LIST, files)]);
	}

	pub fn descriptor(&self) -> &CallDescriptor {
		&self.call
	}

	pub fn descriptor_mut(&mut self) -> &mut CallDescriptor {
		&mut self.call
	}

	/// Runs `general_obs` against a freshly started interpreter session.
	pub async fn execute(&mut self) -> Result<()> {
		self.call.execute().await
	}

	/// Runs `general_obs` through a caller-supplied bridge.
	pub async fn execute_with(&mut self, bridge: &dyn InterpreterBridge) -> Result<()> {
		self.call.execute_with(bridge).await
	}
}
