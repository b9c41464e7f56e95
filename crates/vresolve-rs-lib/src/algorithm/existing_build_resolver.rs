use std::collections::BTreeSet;

use super::ids::*;
use crate::history::BuildInput;

/// Answers questions about what earlier builds of a job consumed for one input.
pub trait ExistingBuildResolver: std::fmt::Debug + Send + Sync {
	/// A build already used exactly this version for the input.
	fn exists_for_version(&self, version: VersionId) -> bool;
	/// The input has ever used the resource at all.
	fn exists_for_resource(&self) -> bool;
}

/// Resolver backed by the recorded build inputs of a single job and resource.
#[derive(Debug, Clone, Default)]
pub struct BuildInputsResolver {
	consumed: BTreeSet<VersionId>,
}

impl BuildInputsResolver {
	/// A resolver where exactly `consumed` have been used before.
	pub fn new(consumed: impl IntoIterator<Item = VersionId>) -> Self {
		Self { consumed: consumed.into_iter().collect() }
	}

	/// Collects the versions of `resource` that builds of `job` consumed.
	pub fn from_build_inputs<'a>(inputs: impl IntoIterator<Item = &'a BuildInput>, job: JobId, resource: ResourceId) -> Self {
		Self::new(inputs.into_iter()
			.filter(|i| i.job_id == job && i.resource_id == resource)
			.map(|i| i.version_id))
	}
}

impl ExistingBuildResolver for BuildInputsResolver {
	fn exists_for_version(&self, version: VersionId) -> bool {
		self.consumed.contains(&version)
	}

	fn exists_for_resource(&self) -> bool {
		!self.consumed.is_empty()
	}
}
