//! Resolving a job's declared inputs against the build history.

use std::collections::BTreeMap;
use std::sync::Arc;
use serde::{Serialize, Deserialize};

use crate::algorithm::*;
use crate::history::VersionsDB;
use crate::config::ResolverOptions;

/// An input as declared on a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
	pub name: String,
	/// The job the input belongs to.
	pub job_id: JobId,
	pub resource_id: ResourceId,
	#[serde(default)]
	pub passed: JobSet,
	#[serde(default)]
	pub use_every_version: bool,
	#[serde(default)]
	pub pinned_version_id: Option<VersionId>,
}

/// The version chosen for one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputVersion {
	pub version_id: VersionId,
	/// The job has never used this version for this input before.
	pub first_occurrence: bool,
}

pub type InputMapping = BTreeMap<String, InputVersion>;

/// All inputs of one job, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputConfigs(pub Vec<InputConfig>);

impl InputConfigs {
	/// Assembles the candidates of every input from `db`.
	///
	/// `Ok(None)` when an input with passed constraints has no version that went through them,
	/// there's nothing to resolve until those jobs produce something.
	pub fn candidates(&self, db: &VersionsDB) -> crate::Result<Option<InputCandidates>> {
		self.validate()?;

		let mut inputs = Vec::with_capacity(self.0.len());

		for config in &self.0 {
			let versions = if config.passed.is_empty() {
				db.all_versions_of_resource(config.resource_id)
			} else {
				let versions = db.versions_of_resource_passed_jobs(config.resource_id, &config.passed);
				if versions.is_empty() {
					log::debug!("No versions of resource {} passed jobs {:?} for input {}", config.resource_id, config.passed, config.name);
					return Ok(None)
				}
				versions
			};

			let resolver = Arc::new(db.existing_build_resolver(config.job_id, config.resource_id));

			inputs.push(
				InputVersionCandidates::new(config.name.clone(), versions, resolver)
					.passed(config.passed.iter().copied())
					.pinned(config.pinned_version_id)
					.use_every_version(config.use_every_version)
			);
		}

		InputCandidates::new(inputs).map(Some)
	}

	/// Input names must be unique within a job.
	pub fn validate(&self) -> crate::Result<()> {
		ensure_unique_names(self.0.iter().map(|c| c.name.as_str()))
	}

	/// Chooses a version for every input, `Ok(None)` if they can't be resolved yet.
	///
	/// Errors only come from invalid configs, never from the inputs being unsatisfiable.
	pub fn resolve(&self, db: &VersionsDB, options: &ResolverOptions) -> crate::Result<Option<InputMapping>> {
		let Some(candidates) = self.candidates(db)? else { return Ok(None) };
		let Some(resolved) = candidates.resolve(options) else { return Ok(None) };

		let mut mapping = InputMapping::new();
		for config in &self.0 {
			/* Every input is present in a successful resolve */
			let Some(version_id) = resolved.get(&config.name).copied() else { return Ok(None) };
			mapping.insert(config.name.clone(), InputVersion {
				version_id,
				first_occurrence: db.is_version_first_occurrence(version_id, config.job_id, &config.name),
			});
		}

		Ok(Some(mapping))
	}
}

impl FromIterator<InputConfig> for InputConfigs {
	fn from_iter<T: IntoIterator<Item = InputConfig>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}
