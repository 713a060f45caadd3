//! Deployment of the fundraising apps: organization creation, app
//! registration, permission bootstrap and the handoff to governance.

pub mod bootstrap;
pub mod config;
pub mod error;


pub use bootstrap::{deploy, Dao, Deployment};
pub use config::{DeploymentParameters, NetworksFile};
pub use error::DeployError;
