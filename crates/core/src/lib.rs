//! Dispatch layer for running FHD pipeline commands inside an IDL
//! interpreter session.
//!
//! A [`CallDescriptor`] captures one pending remote invocation, procedure
//! or function, and [`CallDescriptor::execute`] performs the full
//! open/invoke/close cycle against a freshly started session. The
//! [`GeneralObs`] builder wraps the pipeline's `general_obs` entry point,
//! deriving its `vis_file_list` keyword from a flexible dataset input.
//!
//! The interpreter itself is reached through the [`bridge`] seam:
//! [`ProcessBridge`] spawns a real process via `fhd-runtime`, while
//! [`testing::FakeBridge`] substitutes a scripted in-memory session.

pub mod bridge;
pub mod call;
pub mod error;
pub mod invoke;
pub mod obs;
pub mod testing;

/// Default locator used to start an interpreter session when none is
/// configured on the descriptor. Resolved through `PATH` like any other
/// command name.
pub const DEFAULT_IDL_PATH: &str = "idl";

pub use bridge::{InterpreterBridge, InterpreterSession, ProcessBridge};
pub use call::{CallDescriptor, CallKind};
pub use error::{FhdError, Result};
pub use fhd_protocol::{IdlValue, KeywordArgs};
pub use invoke::{invoke_function, invoke_procedure};
pub use obs::{GENERAL_OBS, GeneralObs, UvfitsInput, VIS_FILE_LIST};
