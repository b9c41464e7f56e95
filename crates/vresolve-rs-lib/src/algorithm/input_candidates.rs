//! The backtracking resolver.
//!
//! # Process
//! Each level of the search
//! 1. restricts pinned inputs to their pin,
//! 1. prunes every input to versions used by builds that all constrained inputs share,
//! 1. picks the first input with more than one candidate and tries each of its versions in
//! preference order, recursing with that input fixed.
//!
//! Once every input has a single candidate left that candidate is the resolution.
//! Every level derives new, narrower candidates so backtracking is simply returning.

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use super::ids::*;
use super::input_version_candidates::InputVersionCandidates;
use crate::config::ResolverOptions;

/// One version per input, keyed by input name.
pub type ResolvedInputs = BTreeMap<String, VersionId>;

/// The inputs of a single build being resolved. Built fresh for every attempt.
#[derive(Debug, Clone, Default)]
pub struct InputCandidates {
	inputs: Vec<InputVersionCandidates>,
}

impl InputCandidates {
	/// The order of `inputs` decides which input is branched on first.
	///
	/// Fails when two inputs share a name since they would share a key in the resolution.
	pub fn new(inputs: Vec<InputVersionCandidates>) -> crate::Result<Self> {
		ensure_unique_names(inputs.iter().map(|i| i.input()))?;
		Ok(Self { inputs })
	}

	pub fn inputs(&self) -> &[InputVersionCandidates] {
		&self.inputs
	}

	pub fn len(&self) -> usize {
		self.inputs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inputs.is_empty()
	}

	/// Every job any input has to have passed.
	pub fn jobs(&self) -> JobSet {
		self.inputs.iter().flat_map(|i| i.passed_jobs().iter().copied()).collect()
	}

	/// Runs a whole attempt, `None` when the inputs can't be resolved yet.
	pub fn resolve(&self, options: &ResolverOptions) -> Option<ResolvedInputs> {
		let jobs = self.jobs();
		let mut budget = Budget::new(options);

		log::debug!("Resolving inputs {} across {} jobs", self, jobs.len());
		let resolved = self.reduce(0, &jobs, &mut budget);
		match &resolved {
			Some(r) => log::debug!("Resolved inputs after {} attempts: {:?}", budget.attempts(), r),
			None => log::debug!("Inputs not resolvable after {} attempts", budget.attempts()),
		}
		resolved
	}

	/// One level of the search, see the module documentation.
	///
	/// `jobs` must be the same for every level of an attempt.
	pub fn reduce(&self, depth: usize, jobs: &JobSet, budget: &mut Budget) -> Option<ResolvedInputs> {
		if !budget.charge() {
			return None
		}

		let candidates = self.apply_pins().prune_to_common_builds(jobs);

		for (i, input) in candidates.inputs.iter().enumerate() {
			if input.len() == 1 {
				continue;
			}

			/* No candidates leaves the iterator empty which fails this level */
			let mut versions = input.version_ids();
			while let Some(version) = versions.next() {
				if !input.is_next(version, &mut versions) {
					log::trace!("[{depth}] {} {} would skip an unconsumed version", input.input(), version);
					continue;
				}

				log::trace!("[{depth}] trying {} {}", input.input(), version);
				if let Some(resolved) = candidates.pin(i, version).reduce(depth + 1, jobs, budget) {
					return Some(resolved)
				}
			}

			return None
		}

		let mut resolved = ResolvedInputs::new();
		for input in &candidates.inputs {
			let version = input.version_ids().next()?;
			resolved.insert(input.input().to_owned(), version);
		}
		Some(resolved)
	}

	/// Input `index` restricted to `version`.
	fn pin(&self, index: usize, version: VersionId) -> Self {
		let mut pinned = self.clone();
		let input = &self.inputs[index];
		pinned.inputs[index] = input.with_candidates(input.candidates().for_version(version));
		pinned
	}

	/// Every pinned input restricted to its pin. Pins that aren't candidates leave the input empty.
	fn apply_pins(&self) -> Self {
		let mut pinned = self.clone();
		for (i, input) in self.inputs.iter().enumerate() {
			if let Some(version) = input.pinned_version_id() {
				if input.len() != 1 || !input.candidates().contains(version) {
					pinned = pinned.pin(i, version);
				}
			}
		}
		pinned
	}

	/// Narrows every input to the versions used by builds shared by all inputs constrained by each job.
	///
	/// Pruning for one job can remove builds of another, so this repeats until nothing changes.
	pub fn prune_to_common_builds(&self, jobs: &JobSet) -> Self {
		let mut pruned = self.clone();

		loop {
			let mut changed = false;

			for job in jobs {
				let common = pruned.common_build_ids(*job);

				for input in &mut pruned.inputs {
					let narrowed = input.candidates().prune_versions_of_other_build_ids(*job, &common);
					if &narrowed != input.candidates() {
						*input = input.with_candidates(narrowed);
						changed = true;
					}
				}
			}

			if !changed {
				return pruned
			}
		}
	}

	/// Builds of `job` every input that knows about `job` has a candidate from.
	/// Inputs without any builds of `job` don't take part.
	pub fn common_build_ids(&self, job: JobId) -> BuildSet {
		let mut common: Option<BuildSet> = None;

		for input in &self.inputs {
			let ids = input.candidates().build_ids(job);
			if ids.is_empty() {
				continue;
			}

			common = Some(match common {
				None => ids,
				Some(common) => common.intersection(&ids).copied().collect(),
			});
		}

		common.unwrap_or_default()
	}
}

/// Input names key the resolution, so a name may only be used once.
pub(crate) fn ensure_unique_names<'a>(names: impl IntoIterator<Item = &'a str>) -> crate::Result<()> {
	let mut seen = HashSet::new();
	for name in names {
		if !seen.insert(name) {
			return Err(crate::Error::Validation(format!("input \"{name}\" is declared more than once")))
		}
	}
	Ok(())
}

impl std::fmt::Display for InputCandidates {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let lens: Vec<String> = self.inputs.iter()
			.map(|i| format!("{} ({} versions)", i.input(), i.len()))
			.collect();
		write!(f, "[{}]", lens.join("; "))
	}
}

/// Work remaining for one attempt.
#[derive(Debug)]
pub struct Budget {
	attempts: u64,
	max_attempts: Option<u64>,
	deadline: Option<Instant>,
	exhausted: bool,
}

impl Budget {
	pub fn new(options: &ResolverOptions) -> Self {
		Self {
			attempts: 0,
			max_attempts: options.max_attempts(),
			deadline: options.timeout().map(|t| Instant::now() + t),
			exhausted: false,
		}
	}

	/// Counts one attempt, `false` once the budget has run out.
	pub fn charge(&mut self) -> bool {
		if self.exhausted {
			return false
		}

		self.attempts += 1;

		let out_of_attempts = self.max_attempts.is_some_and(|max| self.attempts > max);
		let out_of_time = self.deadline.is_some_and(|d| Instant::now() >= d);
		if out_of_attempts || out_of_time {
			log::warn!("Giving up resolving inputs after {} attempts, budget exhausted", self.attempts - 1);
			self.exhausted = true;
			return false
		}

		true
	}

	pub fn attempts(&self) -> u64 {
		self.attempts
	}

	pub fn is_exhausted(&self) -> bool {
		self.exhausted
	}
}
