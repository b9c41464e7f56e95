//! A read-only snapshot of the versions and builds a pipeline has seen.
//!
//! Loading it from storage is up to the caller, this only answers the questions
//! the resolver needs answered.

use serde::{Serialize, Deserialize};

use crate::algorithm::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceVersion {
	pub version_id: VersionId,
	pub resource_id: ResourceId,
	/// Higher is newer.
	pub check_order: u64,
}

/// A version a build produced, or consumed and passed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOutput {
	pub version_id: VersionId,
	pub resource_id: ResourceId,
	pub build_id: BuildId,
	pub job_id: JobId,
}

/// A version a build used for one of its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInput {
	pub version_id: VersionId,
	pub resource_id: ResourceId,
	pub build_id: BuildId,
	pub job_id: JobId,
	pub input_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionsDB {
	#[serde(default)]
	pub resource_versions: Vec<ResourceVersion>,
	#[serde(default)]
	pub build_outputs: Vec<BuildOutput>,
	#[serde(default)]
	pub build_inputs: Vec<BuildInput>,
}

impl VersionsDB {
	fn check_order(&self, resource: ResourceId, version: VersionId) -> Option<u64> {
		self.resource_versions.iter()
			.find(|v| v.resource_id == resource && v.version_id == version)
			.map(|v| v.check_order)
	}

	/// Every known version of `resource`, without any build associations.
	pub fn all_versions_of_resource(&self, resource: ResourceId) -> VersionCandidates {
		let mut candidates = VersionCandidates::default();
		for v in self.resource_versions.iter().filter(|v| v.resource_id == resource) {
			candidates.add(v.version_id, v.check_order);
		}
		candidates
	}

	/// Versions of `resource` that went through a build of every job in `passed`.
	///
	/// Each version is annotated with the builds that used it. Outputs of versions missing
	/// from `resource_versions` are ignored since they can't be ordered.
	pub fn versions_of_resource_passed_jobs(&self, resource: ResourceId, passed: &JobSet) -> VersionCandidates {
		let mut candidates: Option<VersionCandidates> = None;

		for job in passed {
			let mut versions = VersionCandidates::default();
			for output in self.build_outputs.iter().filter(|o| o.resource_id == resource && o.job_id == *job) {
				let Some(check_order) = self.check_order(resource, output.version_id) else {
					log::warn!("Build {} of job {} output unknown version {}", output.build_id, job, output.version_id);
					continue;
				};
				versions.add_build(output.version_id, check_order, *job, output.build_id);
			}

			candidates = Some(match candidates {
				None => versions,
				Some(c) => c.intersect_by_version(&versions),
			});
		}

		candidates.unwrap_or_default()
	}

	/// `true` when no build of `job` has used `version` as `input_name` before.
	pub fn is_version_first_occurrence(&self, version: VersionId, job: JobId, input_name: &str) -> bool {
		!self.build_inputs.iter()
			.any(|i| i.version_id == version && i.job_id == job && i.input_name == input_name)
	}

	pub fn existing_build_resolver(&self, job: JobId, resource: ResourceId) -> BuildInputsResolver {
		BuildInputsResolver::from_build_inputs(&self.build_inputs, job, resource)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn db() -> VersionsDB {
		let version = |v: u64, r: u64| ResourceVersion { version_id: VersionId(v), resource_id: ResourceId(r), check_order: v };
		let output = |v: u64, r: u64, b: u64, j: u64| BuildOutput { version_id: VersionId(v), resource_id: ResourceId(r), build_id: BuildId(b), job_id: JobId(j) };
		VersionsDB {
			resource_versions: vec![version(1, 1), version(2, 1), version(3, 1), version(10, 2)],
			build_outputs: vec![
				output(1, 1, 100, 1),
				output(2, 1, 101, 1),
				output(2, 1, 200, 2),
				output(3, 1, 201, 2),
				output(99, 1, 202, 2),
			],
			build_inputs: vec![
				BuildInput { version_id: VersionId(2), resource_id: ResourceId(1), build_id: BuildId(300), job_id: JobId(3), input_name: "in".into() },
			],
		}
	}

	fn ids(c: &VersionCandidates) -> Vec<u64> {
		c.version_ids().map(|v| v.0).collect()
	}

	#[test]
	fn all_versions_are_newest_first() {
		assert_eq!(ids(&db().all_versions_of_resource(ResourceId(1))), vec![3, 2, 1]);
		assert!(db().all_versions_of_resource(ResourceId(5)).is_empty());
	}

	#[test]
	fn passed_single_job() {
		let c = db().versions_of_resource_passed_jobs(ResourceId(1), &[JobId(2)].into_iter().collect());
		assert_eq!(ids(&c), vec![3, 2]);
		assert_eq!(c.build_ids(JobId(2)), BuildSet::from([BuildId(200), BuildId(201)]));
	}

	#[test]
	fn passed_jobs_intersect_by_version() {
		let c = db().versions_of_resource_passed_jobs(ResourceId(1), &[JobId(1), JobId(2)].into_iter().collect());
		assert_eq!(ids(&c), vec![2]);
		assert_eq!(c.build_ids(JobId(1)), BuildSet::from([BuildId(101)]));
		assert_eq!(c.build_ids(JobId(2)), BuildSet::from([BuildId(200)]));
	}

	#[test]
	fn passed_versions_are_ordered_within_their_resource() {
		/* Version 1 is also a version of resource 1, with an unrelated check order */
		let version = |v: u64, r: u64, order: u64| ResourceVersion { version_id: VersionId(v), resource_id: ResourceId(r), check_order: order };
		let output = |v: u64, b: u64| BuildOutput { version_id: VersionId(v), resource_id: ResourceId(2), build_id: BuildId(b), job_id: JobId(1) };
		let db = VersionsDB {
			resource_versions: vec![version(1, 1, 50), version(1, 2, 1), version(2, 2, 2)],
			build_outputs: vec![output(1, 100), output(2, 101)],
			build_inputs: vec![],
		};

		let passed = db.versions_of_resource_passed_jobs(ResourceId(2), &[JobId(1)].into_iter().collect());
		assert_eq!(ids(&passed), vec![2, 1]);
		assert_eq!(ids(&passed), ids(&db.all_versions_of_resource(ResourceId(2))));
	}

	#[test]
	fn first_occurrence_is_per_job_and_input() {
		let db = db();
		assert!(!db.is_version_first_occurrence(VersionId(2), JobId(3), "in"));
		assert!(db.is_version_first_occurrence(VersionId(2), JobId(3), "other"));
		assert!(db.is_version_first_occurrence(VersionId(2), JobId(1), "in"));
	}

	#[test]
	fn existing_builds_are_scoped_to_job_and_resource() {
		let db = db();
		let resolver = db.existing_build_resolver(JobId(3), ResourceId(1));
		assert!(resolver.exists_for_resource());
		assert!(resolver.exists_for_version(VersionId(2)));
		assert!(!db.existing_build_resolver(JobId(3), ResourceId(2)).exists_for_resource());
	}
}
