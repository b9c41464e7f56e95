//! Deciding which version of every input a build should use.
//!
//! # Usage
//! 1. Create an [`InputVersionCandidates`] for every input with its [`VersionCandidates`] and an [`ExistingBuildResolver`].
//! 1. Collect them in order into [`InputCandidates`].
//! 1. [`InputCandidates::resolve()`] to get [`ResolvedInputs`], or `None` if the inputs can't be satisfied yet.
//!
//! [`crate::inputs::InputConfigs`] does all of this from a [`crate::history::VersionsDB`].

mod ids;
pub use ids::*;

mod version_candidates;
pub use version_candidates::VersionCandidate;
pub use version_candidates::VersionCandidates;
pub use version_candidates::VersionIds;

mod existing_build_resolver;
pub use existing_build_resolver::ExistingBuildResolver;
pub use existing_build_resolver::BuildInputsResolver;

mod input_version_candidates;
pub use input_version_candidates::InputVersionCandidates;

mod input_candidates;
pub use input_candidates::InputCandidates;
pub use input_candidates::ResolvedInputs;
pub use input_candidates::Budget;
pub(crate) use input_candidates::ensure_unique_names;
