//! The still-viable versions of a single input.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use super::ids::*;

/// One live version along with the builds, per job, that used it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionCandidate {
	pub id: VersionId,
	/// Higher is preferred. Usually the order versions were discovered in.
	pub check_order: u64,
	builds: BTreeMap<JobId, BuildSet>,
}

impl VersionCandidate {
	pub fn new(id: VersionId, check_order: u64) -> Self {
		Self { id, check_order, builds: Default::default() }
	}

	/// Builds of `job` recorded against this version, `None` when the job never used it.
	pub fn builds(&self, job: JobId) -> Option<&BuildSet> {
		self.builds.get(&job)
	}

	fn sort_key(&self) -> (std::cmp::Reverse<u64>, std::cmp::Reverse<VersionId>) {
		(std::cmp::Reverse(self.check_order), std::cmp::Reverse(self.id))
	}
}

/// Versions ordered most preferred first.
///
/// Instances are never widened once assembled, every operation used while resolving
/// returns a new, narrower set. A version that isn't present is excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionCandidates {
	versions: Vec<VersionCandidate>,
}

impl VersionCandidates {
	/* Assembly */

	/// Adds a version without any build associations.
	/// Adding a version that is already present keeps the existing entry.
	pub fn add(&mut self, id: VersionId, check_order: u64) {
		self.entry(id, check_order);
	}

	/// Records that `build` of `job` used version `id`, adding the version if needed.
	pub fn add_build(&mut self, id: VersionId, check_order: u64, job: JobId, build: BuildId) {
		self.entry(id, check_order).builds.entry(job).or_default().insert(build);
	}

	fn entry(&mut self, id: VersionId, check_order: u64) -> &mut VersionCandidate {
		let i = match self.versions.iter().position(|v| v.id == id) {
			Some(i) => i,
			None => {
				let candidate = VersionCandidate::new(id, check_order);
				let i = self.versions.partition_point(|v| v.sort_key() < candidate.sort_key());
				self.versions.insert(i, candidate);
				i
			}
		};
		&mut self.versions[i]
	}

	/* Queries */

	pub fn len(&self) -> usize {
		self.versions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.versions.is_empty()
	}

	pub fn contains(&self, id: VersionId) -> bool {
		self.versions.iter().any(|v| v.id == id)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, VersionCandidate> {
		self.versions.iter()
	}

	/// A fresh iterator over the live ids, most preferred first.
	pub fn version_ids(&self) -> VersionIds<'_> {
		VersionIds { underlying: self.versions.iter().peekable() }
	}

	/// Union of the builds of `job` over every live version.
	pub fn build_ids(&self, job: JobId) -> BuildSet {
		self.versions.iter()
			.filter_map(|v| v.builds(job))
			.flat_map(|builds| builds.iter().copied())
			.collect()
	}

	/* Narrowing */

	/// Only `id`, or nothing if `id` isn't a candidate.
	pub fn for_version(&self, id: VersionId) -> Self {
		Self {
			versions: self.versions.iter().filter(|v| v.id == id).cloned().collect()
		}
	}

	/// Drops versions that were only used by builds of `job` outside of `keep`.
	///
	/// Versions `job` never used pass through untouched. The builds kept against a
	/// surviving version are narrowed to `keep` as well.
	pub fn prune_versions_of_other_build_ids(&self, job: JobId, keep: &BuildSet) -> Self {
		let versions = self.versions.iter().filter_map(|v| {
			let Some(builds) = v.builds(job) else { return Some(v.clone()) };

			let kept: BuildSet = builds.intersection(keep).copied().collect();
			if kept.is_empty() {
				return None
			}

			let mut v = v.clone();
			v.builds.insert(job, kept);
			Some(v)
		}).collect();

		Self { versions }
	}

	/// Versions present in both sets with their build associations merged.
	pub fn intersect_by_version(&self, other: &Self) -> Self {
		let versions = self.versions.iter().filter_map(|v| {
			let o = other.versions.iter().find(|o| o.id == v.id)?;
			let mut v = v.clone();
			for (job, builds) in &o.builds {
				v.builds.entry(*job).or_default().extend(builds.iter().copied());
			}
			Some(v)
		}).collect();

		Self { versions }
	}
}

impl<'a> IntoIterator for &'a VersionCandidates {
	type Item = &'a VersionCandidate;
	type IntoIter = std::slice::Iter<'a, VersionCandidate>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Iterator over version ids that can look at the next, older, id without consuming it.
pub struct VersionIds<'a> {
	underlying: std::iter::Peekable<std::slice::Iter<'a, VersionCandidate>>,
}

impl<'a> VersionIds<'a> {
	/// The version that will be produced next, which is older than the last one produced.
	pub fn peek(&mut self) -> Option<VersionId> {
		self.underlying.peek().map(|v| v.id)
	}
}

impl<'a> Iterator for VersionIds<'a> {
	type Item = VersionId;

	fn next(&mut self) -> Option<Self::Item> {
		self.underlying.next().map(|v| v.id)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn candidates(versions: &[(u64, u64, &[(u64, u64)])]) -> VersionCandidates {
		let mut c = VersionCandidates::default();
		for (id, check_order, builds) in versions {
			c.add(VersionId(*id), *check_order);
			for (job, build) in *builds {
				c.add_build(VersionId(*id), *check_order, JobId(*job), BuildId(*build));
			}
		}
		c
	}

	fn ids(c: &VersionCandidates) -> Vec<u64> {
		c.version_ids().map(|v| v.0).collect()
	}

	fn builds(ids: &[u64]) -> BuildSet {
		ids.iter().map(|b| BuildId(*b)).collect()
	}

	#[test]
	fn versions_are_ordered_most_preferred_first() {
		let c = candidates(&[(1, 1, &[]), (3, 3, &[]), (2, 2, &[])]);
		assert_eq!(ids(&c), vec![3, 2, 1]);
	}

	#[test]
	fn equal_check_order_prefers_higher_id() {
		let c = candidates(&[(4, 1, &[]), (7, 1, &[]), (5, 2, &[])]);
		assert_eq!(ids(&c), vec![5, 7, 4]);
	}

	#[test]
	fn adding_a_version_twice_keeps_one_entry() {
		let c = candidates(&[(1, 1, &[(1, 10)]), (1, 1, &[(1, 11)])]);
		assert_eq!(c.len(), 1);
		assert_eq!(c.build_ids(JobId(1)), builds(&[10, 11]));
	}

	#[test]
	fn version_ids_is_rederived_on_demand() {
		let c = candidates(&[(1, 1, &[]), (2, 2, &[])]);
		let mut first = c.version_ids();
		first.next();
		assert_eq!(ids(&c), vec![2, 1]);
	}

	#[test]
	fn peek_does_not_consume() {
		let c = candidates(&[(1, 1, &[]), (2, 2, &[])]);
		let mut it = c.version_ids();
		assert_eq!(it.next(), Some(VersionId(2)));
		assert_eq!(it.peek(), Some(VersionId(1)));
		assert_eq!(it.next(), Some(VersionId(1)));
		assert_eq!(it.peek(), None);
	}

	#[test]
	fn for_version_missing_is_empty() {
		let c = candidates(&[(1, 1, &[]), (2, 2, &[])]);
		assert_eq!(ids(&c.for_version(VersionId(2))), vec![2]);
		assert!(c.for_version(VersionId(9)).is_empty());
	}

	#[test]
	fn build_ids_is_union_for_job() {
		let c = candidates(&[(1, 1, &[(1, 10), (2, 20)]), (2, 2, &[(1, 11)])]);
		assert_eq!(c.build_ids(JobId(1)), builds(&[10, 11]));
		assert_eq!(c.build_ids(JobId(2)), builds(&[20]));
		assert!(c.build_ids(JobId(3)).is_empty());
	}

	#[test]
	fn prune_keeps_unrelated_versions() {
		let c = candidates(&[(1, 1, &[(1, 10)]), (2, 2, &[(2, 20)]), (3, 3, &[])]);
		let pruned = c.prune_versions_of_other_build_ids(JobId(1), &builds(&[]));
		assert_eq!(ids(&pruned), vec![3, 2]);
	}

	#[test]
	fn prune_narrows_builds_of_kept_versions() {
		let c = candidates(&[(1, 1, &[(1, 10), (1, 11)]), (2, 2, &[(1, 12)])]);
		let pruned = c.prune_versions_of_other_build_ids(JobId(1), &builds(&[11]));
		assert_eq!(ids(&pruned), vec![1]);
		assert_eq!(pruned.build_ids(JobId(1)), builds(&[11]));
	}

	#[test]
	fn prune_is_idempotent() {
		let c = candidates(&[(1, 1, &[(1, 10), (1, 11)]), (2, 2, &[(1, 12)]), (3, 3, &[(2, 30)])]);
		let keep = builds(&[11, 12]);
		let once = c.prune_versions_of_other_build_ids(JobId(1), &keep);
		let twice = once.prune_versions_of_other_build_ids(JobId(1), &keep);
		assert_eq!(once, twice);
	}

	#[test]
	fn intersect_merges_annotations() {
		let a = candidates(&[(1, 1, &[(1, 10)]), (2, 2, &[(1, 11)])]);
		let b = candidates(&[(2, 2, &[(2, 20)]), (3, 3, &[(2, 21)])]);
		let both = a.intersect_by_version(&b);
		assert_eq!(ids(&both), vec![2]);
		assert_eq!(both.build_ids(JobId(1)), builds(&[11]));
		assert_eq!(both.build_ids(JobId(2)), builds(&[20]));
	}
}
