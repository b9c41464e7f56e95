use std::sync::Arc;

use super::ids::*;
use super::version_candidates::*;
use super::existing_build_resolver::ExistingBuildResolver;

/// Everything the resolver knows about one input during an attempt.
#[derive(Debug, Clone)]
pub struct InputVersionCandidates {
	input: String,
	passed: JobSet,
	pinned_version_id: Option<VersionId>,
	candidates: VersionCandidates,
	resolver: Arc<dyn ExistingBuildResolver>,

	has_used_resource: bool,
}

impl InputVersionCandidates {
	pub fn new(input: impl Into<String>, candidates: VersionCandidates, resolver: Arc<dyn ExistingBuildResolver>) -> Self {
		Self {
			input: input.into(),
			passed: Default::default(),
			pinned_version_id: None,
			candidates,
			resolver,
			has_used_resource: false,
		}
	}

	/// Jobs whose builds the chosen version must have passed through.
	pub fn passed(mut self, jobs: impl IntoIterator<Item = JobId>) -> Self {
		self.passed = jobs.into_iter().collect();
		self
	}

	pub fn pinned(mut self, version: Option<VersionId>) -> Self {
		self.pinned_version_id = version;
		self
	}

	/// Versions must be consumed in order instead of jumping to the newest.
	pub fn use_every_version(mut self, use_every_version: bool) -> Self {
		self.has_used_resource = use_every_version && self.resolver.exists_for_resource();
		self
	}

	pub fn input(&self) -> &str {
		&self.input
	}

	pub fn passed_jobs(&self) -> &JobSet {
		&self.passed
	}

	pub fn pinned_version_id(&self) -> Option<VersionId> {
		self.pinned_version_id
	}

	pub fn candidates(&self) -> &VersionCandidates {
		&self.candidates
	}

	pub fn len(&self) -> usize {
		self.candidates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.candidates.is_empty()
	}

	pub fn version_ids(&self) -> VersionIds<'_> {
		self.candidates.version_ids()
	}

	/// The same input with a different candidate set.
	pub(super) fn with_candidates(&self, candidates: VersionCandidates) -> Self {
		Self { candidates, ..self.clone() }
	}

	/// Only counts when consuming every version, a fresh input isn't made to start at the oldest.
	pub fn has_used_resource(&self) -> bool {
		self.has_used_resource
	}

	/// Whether picking `candidate` keeps the input consuming versions in order.
	///
	/// `versions` is the iterator `candidate` was just taken from, its next item is the
	/// version immediately older than `candidate`.
	pub fn is_next(&self, candidate: VersionId, versions: &mut VersionIds<'_>) -> bool {
		if !self.has_used_resource() {
			return true
		}

		/* Picking a version that was already consumed again is stable */
		if self.resolver.exists_for_version(candidate) {
			return true
		}

		let Some(older) = versions.peek() else {
			/* Oldest version, nothing can be skipped */
			return true
		};

		self.resolver.exists_for_version(older)
	}
}
