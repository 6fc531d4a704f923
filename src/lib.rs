// src/lib.rs
pub use engine::{Evaluation, UnitEngine};
pub use error::ProvisionError;
pub use federation::{GithubFederation, GITHUB_ISSUER_HOST, STS_AUDIENCE};
pub use synth::SyntheticProvider;
pub use traits::{ResourceProvider, ResourceState};
pub use types::{DeployContext, ParameterMap};
pub use unit::{ProvisioningUnit, ResourceHandle};

mod engine;
mod error;
pub mod execution;
mod federation;
mod synth;
mod traits;
pub mod types;
mod unit;
pub mod units;

#[cfg(test)]
mod tests;
