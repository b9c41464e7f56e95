//! Opaque identifiers and the ordered sets built from them.

use std::collections::BTreeSet;
use serde::{Serialize, Deserialize};

macro_rules! identifier {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(pub u64);

		impl From<u64> for $name {
			fn from(value: u64) -> Self { Self(value) }
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				write!(f, "{}", self.0)
			}
		}
	};
}

identifier!(
	/// A single version of a resource.
	///
	/// Preference between versions is not derived from the id, see [`super::VersionCandidate::check_order`].
	VersionId
);
identifier!(
	/// A build of some job.
	BuildId
);
identifier!(
	/// A job in the pipeline.
	JobId
);
identifier!(
	/// The resource a version belongs to.
	ResourceId
);

/// Ordered so resolution visits jobs in the same order every time.
pub type JobSet = BTreeSet<JobId>;
pub type BuildSet = BTreeSet<BuildId>;
