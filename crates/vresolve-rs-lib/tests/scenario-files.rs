use vresolve_rs::algorithm::*;
use vresolve_rs::inputs::*;
use vresolve_rs::{ResolverOptions, Scenario};
use vresolve_rs_test_utils::*;

fn test_data(name: &str) -> std::path::PathBuf {
	std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-data").join(name)
}

#[test]
fn load_and_resolve_job_x() {
	let _ = env_logger::builder().is_test(true).try_init();

	let scenario = Scenario::load(test_data("job-x.json")).expect("failed to load scenario");
	assert_eq!(scenario.inputs.0.len(), 2);
	assert_eq!(scenario.inputs.0[0].passed, jobs(&[1]));
	assert!(!scenario.inputs.0[0].use_every_version);

	let mapping = scenario.resolve(&ResolverOptions::default()).unwrap().expect("job x scenario resolves");
	assert_eq!(mapping["a"], InputVersion { version_id: VersionId(2), first_occurrence: true });
	assert_eq!(mapping["b"], InputVersion { version_id: VersionId(20), first_occurrence: true });
	assert!(passed_constraints_hold(&scenario, &mapping));
}

#[test]
fn saved_scenario_loads_back() {
	let scenario = ScenarioBuilder::new()
		.versions(1, &[1, 2])
		.build(1, 100, &[(1, 2)])
		.consumed(9, 900, "a", 1, 1)
		.input(InputConfig { passed: jobs(&[1]), use_every_version: true, ..input("a", 9, 1) })
		.input(InputConfig { pinned_version_id: Some(VersionId(1)), ..input("b", 9, 1) })
		.finish();

	let file = write_scenario(&scenario).expect("failed to write scenario");
	assert_eq!(Scenario::load(file.path()).expect("failed to load scenario"), scenario);
}

#[test]
fn missing_db_defaults_to_empty() {
	let scenario = Scenario::from_json(r#"{ "inputs": [ { "name": "a", "job_id": 1, "resource_id": 1 } ] }"#).unwrap();
	assert!(scenario.db.resource_versions.is_empty());
	assert_eq!(scenario.resolve(&ResolverOptions::default()).unwrap(), None);
}

#[test]
fn malformed_json_is_an_error() {
	assert!(matches!(Scenario::from_json("{ \"inputs\": 3 }"), Err(vresolve_rs::Error::SerdeJSON(_))));
}

#[test]
fn duplicate_inputs_are_rejected_on_load() {
	let json = r#"{ "inputs": [
		{ "name": "a", "job_id": 1, "resource_id": 1 },
		{ "name": "a", "job_id": 1, "resource_id": 2 }
	] }"#;
	assert!(matches!(Scenario::from_json(json), Err(vresolve_rs::Error::Validation(_))));
}

#[test]
fn missing_file_is_io_error() {
	assert!(matches!(Scenario::load(test_data("does-not-exist.json")), Err(vresolve_rs::Error::IO(_))));
}
