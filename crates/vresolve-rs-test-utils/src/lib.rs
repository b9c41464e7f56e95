//! Various helpers for testing the resolver.
//!
//! Includes a brute force resolver to compare results against and `proptest` strategies
//! for generating small build histories.

use proptest::prelude::*;
use vresolve_rs::algorithm::*;
use vresolve_rs::history::*;
use vresolve_rs::inputs::*;
use vresolve_rs::Scenario;

/// Builds a [`Scenario`] a record at a time.
#[derive(Debug, Default)]
pub struct ScenarioBuilder {
	scenario: Scenario,
}

impl ScenarioBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds versions of `resource`, listed oldest first.
	pub fn versions(mut self, resource: u64, versions: &[u64]) -> Self {
		let first = self.scenario.db.resource_versions.len() as u64;
		for (i, v) in versions.iter().enumerate() {
			self.scenario.db.resource_versions.push(ResourceVersion {
				version_id: VersionId(*v),
				resource_id: ResourceId(resource),
				check_order: first + i as u64 + 1,
			});
		}
		self
	}

	/// Records a build of `job` that output each `(resource, version)`.
	pub fn build(mut self, job: u64, build: u64, outputs: &[(u64, u64)]) -> Self {
		for (resource, version) in outputs {
			self.scenario.db.build_outputs.push(BuildOutput {
				version_id: VersionId(*version),
				resource_id: ResourceId(*resource),
				build_id: BuildId(build),
				job_id: JobId(job),
			});
		}
		self
	}

	/// Records that a build of `job` consumed `version` of `resource` as `input_name`.
	pub fn consumed(mut self, job: u64, build: u64, input_name: &str, resource: u64, version: u64) -> Self {
		self.scenario.db.build_inputs.push(BuildInput {
			version_id: VersionId(version),
			resource_id: ResourceId(resource),
			build_id: BuildId(build),
			job_id: JobId(job),
			input_name: input_name.to_owned(),
		});
		self
	}

	pub fn input(mut self, config: InputConfig) -> Self {
		self.scenario.inputs.0.push(config);
		self
	}

	pub fn finish(self) -> Scenario {
		self.scenario
	}
}

/// An input of `job` on `resource` with no constraints.
pub fn input(name: &str, job: u64, resource: u64) -> InputConfig {
	InputConfig {
		name: name.to_owned(),
		job_id: JobId(job),
		resource_id: ResourceId(resource),
		passed: Default::default(),
		use_every_version: false,
		pinned_version_id: None,
	}
}

pub fn jobs(ids: &[u64]) -> JobSet {
	ids.iter().map(|j| JobId(*j)).collect()
}

/// Saves `scenario` to a temporary file that is removed on drop.
pub fn write_scenario(scenario: &Scenario) -> vresolve_rs::Result<tempfile::NamedTempFile> {
	let file = tempfile::Builder::new().suffix(".json").tempfile()?;
	scenario.save(file.path())?;
	Ok(file)
}

/* Brute force */

/// Tries every combination of candidates, honoring pins, and returns the first one where
/// every passed constraint is met by a single build.
pub fn brute_force(candidates: &InputCandidates) -> Option<ResolvedInputs> {
	let inputs = candidates.inputs();
	let choices: Vec<Vec<VersionId>> = inputs.iter()
		.map(|i| i.version_ids().filter(|v| i.pinned_version_id().map_or(true, |p| p == *v)).collect())
		.collect();

	fn search(inputs: &[InputVersionCandidates], choices: &[Vec<VersionId>], chosen: &mut Vec<VersionId>) -> Option<ResolvedInputs> {
		if chosen.len() == inputs.len() {
			return if shares_builds(inputs, chosen) {
				Some(inputs.iter().zip(chosen.iter()).map(|(i, v)| (i.input().to_owned(), *v)).collect())
			} else {
				None
			}
		}

		for v in &choices[chosen.len()] {
			chosen.push(*v);
			if let Some(resolved) = search(inputs, choices, chosen) {
				return Some(resolved)
			}
			chosen.pop();
		}
		None
	}

	search(inputs, &choices, &mut Vec::with_capacity(inputs.len()))
}

/// For every job, the versions chosen for inputs that passed it were all used by one build of it.
fn shares_builds(inputs: &[InputVersionCandidates], chosen: &[VersionId]) -> bool {
	let jobs: JobSet = inputs.iter().flat_map(|i| i.passed_jobs().iter().copied()).collect();

	jobs.into_iter().all(|job| {
		let mut common: Option<BuildSet> = None;
		for (input, version) in inputs.iter().zip(chosen) {
			if !input.passed_jobs().contains(&job) {
				continue;
			}
			let builds = input.candidates().iter()
				.find(|c| c.id == *version)
				.and_then(|c| c.builds(job))
				.cloned()
				.unwrap_or_default();
			common = Some(match common {
				None => builds,
				Some(common) => common.intersection(&builds).copied().collect(),
			});
		}
		common.map_or(true, |c| !c.is_empty())
	})
}

/// Checks `mapping` against the recorded build outputs directly, without going through any candidates.
///
/// For every job some build of it must have output the chosen version of every input that passed it.
pub fn passed_constraints_hold(scenario: &Scenario, mapping: &InputMapping) -> bool {
	let configs = &scenario.inputs.0;
	let jobs: JobSet = configs.iter().flat_map(|c| c.passed.iter().copied()).collect();

	jobs.into_iter().all(|job| {
		let constrained: Vec<_> = configs.iter().filter(|c| c.passed.contains(&job)).collect();
		let builds: BuildSet = scenario.db.build_outputs.iter()
			.filter(|o| o.job_id == job)
			.map(|o| o.build_id)
			.collect();

		builds.into_iter().any(|build| {
			constrained.iter().all(|c| {
				let Some(chosen) = mapping.get(&c.name) else { return false };
				scenario.db.build_outputs.iter().any(|o| {
					o.job_id == job
						&& o.build_id == build
						&& o.resource_id == c.resource_id
						&& o.version_id == chosen.version_id
				})
			})
		})
	})
}

/* Strategies */

const JOBS: u64 = 2;
const SCHEDULED_JOB: u64 = 9;
const ABSENT_VERSION: u64 = 999;

/// Small random histories: up to 3 resources of up to 4 versions, 2 upstream jobs with
/// up to 4 builds each, and up to 4 inputs with random passed constraints and pins.
pub fn arb_scenario() -> impl Strategy<Value = Scenario> {
	let versions = prop::collection::vec(1usize..=4, 1..=3);
	let builds = prop::collection::vec(
		prop::collection::vec(prop::collection::vec(prop::option::of(0usize..4), 3), 0..=4),
		JOBS as usize,
	);
	let inputs = prop::collection::vec((0usize..3, 0u8..4, prop::option::weighted(0.2, 0usize..5)), 1..=4);

	(versions, builds, inputs).prop_map(|(versions, builds, inputs)| {
		let version_id = |resource: usize, i: usize| (resource as u64 + 1) * 10 + i as u64 + 1;

		let mut builder = ScenarioBuilder::new();
		for (resource, count) in versions.iter().enumerate() {
			let ids: Vec<u64> = (0..*count).map(|i| version_id(resource, i)).collect();
			builder = builder.versions(resource as u64 + 1, &ids);
		}

		for (job, job_builds) in builds.iter().enumerate() {
			for (build, outputs) in job_builds.iter().enumerate() {
				let outputs: Vec<(u64, u64)> = outputs.iter()
					.enumerate()
					.filter(|(resource, _)| *resource < versions.len())
					.filter_map(|(resource, v)| v.map(|v| (resource as u64 + 1, version_id(resource, v % versions[resource]))))
					.collect();
				builder = builder.build(job as u64 + 1, (job as u64 + 1) * 100 + build as u64, &outputs);
			}
		}

		for (n, (resource, passed, pin)) in inputs.into_iter().enumerate() {
			let resource = resource % versions.len();
			let passed: Vec<u64> = (0..JOBS).filter(|j| passed & (1 << j) != 0).map(|j| j + 1).collect();
			let pin = pin.map(|p| if p < versions[resource] { version_id(resource, p) } else { ABSENT_VERSION });

			builder = builder.input(InputConfig {
				passed: jobs(&passed),
				pinned_version_id: pin.map(VersionId),
				..input(&format!("input-{n}"), SCHEDULED_JOB, resource as u64 + 1)
			});
		}

		builder.finish()
	})
}
