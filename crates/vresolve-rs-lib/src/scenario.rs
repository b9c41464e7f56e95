//! A build history and a job's inputs stored together as JSON.
//!
//! Handy for reproducing a resolve outside of a running pipeline.

use serde::{Serialize, Deserialize};

use crate::history::VersionsDB;
use crate::inputs::{InputConfigs, InputMapping};
use crate::config::ResolverOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
	#[serde(default)]
	pub db: VersionsDB,
	pub inputs: InputConfigs,
}

impl Scenario {
	pub fn from_json(json: &str) -> crate::Result<Self> {
		let scenario: Self = serde_json::from_str(json)?;
		scenario.inputs.validate()?;
		Ok(scenario)
	}

	pub fn to_json(&self) -> crate::Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	pub fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let path = path.as_ref();
		log::trace!("Loading scenario from {}", path.display());
		Self::from_json(&std::fs::read_to_string(path)?)
	}

	pub fn save(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
		std::fs::write(path, self.to_json()?)?;
		Ok(())
	}

	pub fn resolve(&self, options: &ResolverOptions) -> crate::Result<Option<InputMapping>> {
		self.inputs.resolve(&self.db, options)
	}
}
