// GitHub transport: token discovery through the `gh` CLI plus REST calls
// against the v3 API.

mod cli;
mod client;
pub mod models;

pub use cli::{GhAuth, GhCli};
pub use client::GitHubClient;
pub use models::{Issue, Label, SearchResult, User};
