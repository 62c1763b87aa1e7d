// FogBugz transport: JSON API with a logon token per session.

mod client;
pub mod models;

pub use client::FogBugzClient;
pub use models::{Case, Person};
