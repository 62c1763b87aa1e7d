// aura-api: Async transport clients for the trackers Aura aggregates.
//
// REST providers (GitHub, Jira, FogBugz) go through reqwest; CLI-delegated
// providers (GitHub auth, Azure DevOps) shell out through a `CommandRunner`.

pub mod azure;
pub mod command;
pub mod error;
pub mod fogbugz;
pub mod github;
pub mod jira;
pub mod transport;

pub use command::{CommandOutput, CommandRunner, ProcessRunner};
pub use error::Error;
pub use transport::TransportConfig;
