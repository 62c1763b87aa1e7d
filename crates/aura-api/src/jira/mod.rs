// Jira Cloud transport: Basic auth (email + API token) against REST v3.

mod client;
pub mod models;

pub use client::JiraClient;
pub use models::{Issue, IssueFields, Myself, SearchResult};
