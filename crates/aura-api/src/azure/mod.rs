// Azure DevOps transport: everything goes through the `az` CLI and its
// `azure-devops` extension, reusing the user's existing `az login`.

mod cli;
pub mod models;

pub use cli::{AzAuth, AzCli, DevOpsDefaults};
pub use models::{Account, AccountUser, Identity, PullRequest, Repository, WorkItem, WorkItemFields};
