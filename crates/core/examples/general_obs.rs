// Dispatch a general_obs run against a local IDL installation.
//
// Usage:
//   cargo run --example general_obs -- '/data/mwa/*.uvfits'
//
// The argument may be a single path, or a glob pattern expanded against
// the filesystem before the call is submitted.

use anyhow::Result;

use fhd::{GeneralObs, KeywordArgs};

#[tokio::main]
async fn main() -> Result<()> {
	tracing_subscriber::fmt::init();

	let uvfits = std::env::args().nth(1).unwrap_or_else(|| "*.uvfits".to_string());

	let mut kwargs = KeywordArgs::new();
	kwargs.set("n_pol", 2);
	kwargs.set("recalculate_all", true);

	let mut obs = GeneralObs::new(uvfits.as_str(), kwargs)?;
	println!("dispatching general_obs for {uvfits}");
	obs.execute().await?;
	println!("general_obs finished");

	Ok(())
}
