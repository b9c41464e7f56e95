//! Limits placed on a single resolution attempt.

use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u64 = 100_000;

const MAX_ATTEMPTS_VAR: &str = "VRESOLVE_MAX_ATTEMPTS";
const TIMEOUT_MS_VAR: &str = "VRESOLVE_TIMEOUT_MS";

/// Resolving is exponential in the worst case, these bound how much work one attempt may do.
/// An attempt that runs out is reported as unresolvable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
	max_attempts: Option<u64>,
	timeout: Option<Duration>,
}

impl Default for ResolverOptions {
	fn default() -> Self {
		Self {
			max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
			timeout: None,
		}
	}
}

impl ResolverOptions {
	/// No bounds at all, matches resolving with nothing but the search space to stop it.
	pub fn unbounded() -> Self {
		Self { max_attempts: None, timeout: None }
	}

	/// Defaults overridden by `VRESOLVE_MAX_ATTEMPTS` and `VRESOLVE_TIMEOUT_MS`.
	///
	/// Either variable may be `0` or `none` to remove that bound.
	pub fn from_env() -> crate::Result<Self> {
		let mut options = Self::default();
		if let Ok(v) = std::env::var(MAX_ATTEMPTS_VAR) {
			options.max_attempts = parse_bound(MAX_ATTEMPTS_VAR, &v)?;
		}
		if let Ok(v) = std::env::var(TIMEOUT_MS_VAR) {
			options.timeout = parse_bound(TIMEOUT_MS_VAR, &v)?.map(Duration::from_millis);
		}
		Ok(options)
	}

	/// Number of times the resolver may enter a level of the search.
	pub fn max_attempts(&self) -> Option<u64> {
		self.max_attempts
	}
	pub fn set_max_attempts(&mut self, max_attempts: Option<u64>) {
		self.max_attempts = max_attempts;
	}

	pub fn timeout(&self) -> Option<Duration> {
		self.timeout
	}
	pub fn set_timeout(&mut self, timeout: Option<Duration>) {
		self.timeout = timeout;
	}
}

/// `0` and `none` mean unbounded.
pub(crate) fn parse_bound(name: &str, value: &str) -> crate::Result<Option<u64>> {
	let value = value.trim();
	if value.eq_ignore_ascii_case("none") {
		return Ok(None)
	}
	match value.parse::<u64>() {
		Ok(0) => Ok(None),
		Ok(n) => Ok(Some(n)),
		Err(e) => Err(crate::Error::Validation(format!("{name} must be a positive integer or \"none\", got \"{value}\": {e}"))),
	}
}
