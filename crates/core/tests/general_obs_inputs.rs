//! Dataset-input normalization and dispatch for the general_obs builder.

use tempfile::TempDir;

use fhd::testing::FakeBridge;
use fhd::{CallKind, GENERAL_OBS, GeneralObs, IdlValue, KeywordArgs, UvfitsInput, VIS_FILE_LIST};

fn list_as_strings(value: &IdlValue) -> Vec<String> {
	match value {
		IdlValue::List(items) => items
			.iter()
			.map(|item| match item {
				IdlValue::Str(s) => s.clone(),
				other => panic!("expected string path, got {other:?}"),
			})
			.collect(),
		other => panic!("expected list, got {other:?}"),
	}
}

#[test]
fn glob_pattern_expands_to_matching_files() {
	let dir = TempDir::new().unwrap();
	std::fs::write(dir.path().join("1.dat"), b"").unwrap();
	std::fs::write(dir.path().join("2.dat"), b"").unwrap();
	std::fs::write(dir.path().join("ignore.txt"), b"").unwrap();

	let pattern = dir.path().join("*.dat").display().to_string();
	let obs = GeneralObs::new(pattern, KeywordArgs::new()).unwrap();

	assert_eq!(obs.descriptor().name(), GENERAL_OBS);
	assert_eq!(obs.descriptor().kind(), CallKind::Procedure);

	let files = obs.descriptor().kwargs().get(VIS_FILE_LIST).expect("vis_file_list is set");
	let mut found = list_as_strings(files);
	found.sort();
	let mut expected = vec![
		dir.path().join("1.dat").display().to_string(),
		dir.path().join("2.dat").display().to_string(),
	];
	expected.sort();
	assert_eq!(found, expected);
}

#[test]
fn question_mark_counts_as_a_wildcard() {
	let dir = TempDir::new().unwrap();
	std::fs::write(dir.path().join("a.dat"), b"").unwrap();

	let pattern = dir.path().join("?.dat").display().to_string();
	let resolved = UvfitsInput::from(pattern).resolve();
	assert_eq!(resolved, vec![dir.path().join("a.dat").display().to_string()]);
}

#[test]
fn unmatched_glob_resolves_to_an_empty_list() {
	let dir = TempDir::new().unwrap();
	let pattern = dir.path().join("*.uvfits").display().to_string();
	assert_eq!(UvfitsInput::from(pattern).resolve(), Vec::<String>::new());
}

#[test]
fn explicit_list_keeps_order_and_content() {
	let paths = vec!["a.dat".to_string(), "b.dat".to_string(), "c.dat".to_string()];
	let obs = GeneralObs::new(paths.clone(), KeywordArgs::new()).unwrap();
	let files = obs.descriptor().kwargs().get(VIS_FILE_LIST).unwrap();
	assert_eq!(list_as_strings(files), paths);
}

#[tokio::test]
async fn builder_dispatches_as_a_procedure() {
	let bridge = FakeBridge::new();
	let kwargs: KeywordArgs = [("n_pol", 2)].into_iter().collect();
	let mut obs =
		GeneralObs::with_idl_path("single.uvfits", kwargs, "/opt/idl/bin/idl").unwrap();

	obs.execute_with(&bridge).await.unwrap();

	let calls = bridge.calls();
	assert_eq!(calls.len(), 1);
	assert_eq!(calls[0].kind, CallKind::Procedure);
	assert_eq!(calls[0].name, GENERAL_OBS);
	assert_eq!(calls[0].locator, "/opt/idl/bin/idl");
	assert_eq!(
		calls[0].kwargs.get(VIS_FILE_LIST),
		Some(&IdlValue::from(vec!["single.uvfits".to_string()]))
	);
	assert_eq!(calls[0].kwargs.get("n_pol"), Some(&IdlValue::Long(2)));
}
