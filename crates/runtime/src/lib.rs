//! IDL interpreter session lifecycle.
//!
//! Spawns the interpreter executable, drives its prompt-based command loop
//! over stdin/stdout pipes, classifies interpreter error output, and
//! decodes printed function results. One [`Session`] maps to exactly one
//! spawned process.

pub mod error;
pub mod session;

pub use error::SessionError;
pub use session::{PROMPT, Session};
