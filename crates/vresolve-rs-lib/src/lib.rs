pub mod error;
pub use error::Result;
pub use error::Error;

pub mod config;
pub use config::ResolverOptions;

pub mod algorithm;
pub use algorithm::InputCandidates;
pub use algorithm::ResolvedInputs;

pub mod history;
pub use history::VersionsDB;

pub mod inputs;
pub use inputs::InputConfigs;
pub use inputs::InputMapping;

pub mod scenario;
pub use scenario::Scenario;
