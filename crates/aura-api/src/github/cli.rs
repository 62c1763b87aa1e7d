// `gh` CLI delegation: installation probe, token extraction and username
// discovery. The token never leaves this module unwrapped except to build
// the REST client.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::debug;

use crate::command::{CommandRunner, probe, run_checked};
use crate::error::Error;

const GH: &str = "gh";

/// Result of probing the `gh` CLI.
#[derive(Debug, Clone)]
pub struct GhAuth {
    pub cli_available: bool,
    pub authenticated: bool,
    pub username: Option<String>,
    pub token: Option<SecretString>,
}

impl GhAuth {
    fn unavailable() -> Self {
        Self {
            cli_available: false,
            authenticated: false,
            username: None,
            token: None,
        }
    }
}

#[derive(Clone)]
pub struct GhCli {
    runner: Arc<dyn CommandRunner>,
}

impl GhCli {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    pub async fn is_installed(&self) -> bool {
        probe(self.runner.as_ref(), GH, &["--version"]).await
    }

    /// Extract the OAuth token from `gh auth token`.
    pub async fn token(&self) -> Result<SecretString, Error> {
        let stdout = run_checked(self.runner.as_ref(), GH, &["auth", "token"]).await?;
        let token = stdout.trim();
        if token.is_empty() {
            return Err(Error::NotLoggedIn {
                program: "GitHub",
                login_hint: "gh auth login",
            });
        }
        Ok(SecretString::from(token.to_owned()))
    }

    /// Username from the "Logged in to github.com account USER" line of
    /// `gh auth status`. The CLI writes this to stderr on older versions.
    pub async fn username(&self) -> Option<String> {
        let output = self.runner.run(GH, &["auth", "status"]).await.ok()?;
        parse_username(&output.stdout).or_else(|| parse_username(&output.stderr))
    }

    /// Full probe: installed → token → username.
    pub async fn auth(&self) -> GhAuth {
        if !self.is_installed().await {
            return GhAuth::unavailable();
        }

        match self.token().await {
            Ok(token) => GhAuth {
                cli_available: true,
                authenticated: true,
                username: self.username().await,
                token: Some(token),
            },
            Err(e) => {
                debug!(error = %e, "gh token unavailable");
                GhAuth {
                    cli_available: true,
                    ..GhAuth::unavailable()
                }
            }
        }
    }
}

fn parse_username(text: &str) -> Option<String> {
    text.lines()
        .filter(|line| line.contains("Logged in to"))
        .find_map(|line| {
            let (_, account) = line.split_once("account ")?;
            account.split_whitespace().next().map(str::to_owned)
        })
        .filter(|name| !name.is_empty())
}
