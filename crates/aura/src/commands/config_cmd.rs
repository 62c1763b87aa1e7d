//! Config subcommand handlers.

use std::io::IsTerminal;

use dialoguer::Input;
use secrecy::SecretString;
use url::Url;

use aura_config::{Config, KeyringCredentialStore, SecretStorage};
use aura_core::adapter::{FogBugzAdapter, JiraAdapter};
use aura_core::{
    AuthStatus, CredentialStore, FogBugzConfig, JiraConfig, ProviderAdapter, ProviderConfig,
    ProviderKind,
};

use crate::cli::{
    ConfigArgs, ConfigCommand, CredentialProvider, GlobalOpts, SetFogBugzArgs, SetJiraArgs,
    StoreOpts,
};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking secrets.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    if let Some(n) = cfg.sync.stale_after_failures {
        let _ = writeln!(out);
        let _ = writeln!(out, "[sync]");
        let _ = writeln!(out, "stale_after_failures = {n}");
    }

    if let Some(ref jira) = cfg.jira {
        let _ = writeln!(out);
        let _ = writeln!(out, "[jira]");
        let _ = writeln!(out, "instance_url = \"{}\"", jira.instance_url);
        let _ = writeln!(out, "email = \"{}\"", jira.email);
        if jira.api_token.is_some() {
            let _ = writeln!(out, "api_token = \"****\"");
        }
        if let Some(ref env) = jira.api_token_env {
            let _ = writeln!(out, "api_token_env = \"{env}\"");
        }
    }

    if let Some(ref fogbugz) = cfg.fogbugz {
        let _ = writeln!(out);
        let _ = writeln!(out, "[fogbugz]");
        let _ = writeln!(out, "instance_url = \"{}\"", fogbugz.instance_url);
        let _ = writeln!(out, "email = \"{}\"", fogbugz.email);
        if fogbugz.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = fogbugz.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
    }

    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// Use the flag value, or prompt for it on a terminal.
fn text_or_prompt(value: Option<String>, flag: &str, prompt: &str) -> Result<String, CliError> {
    if let Some(value) = value {
        return Ok(value);
    }
    if !interactive() {
        return Err(CliError::Validation {
            field: flag.into(),
            reason: format!("--{flag} is required when not running interactively"),
        });
    }
    Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(prompt_err)
}

fn secret_or_prompt(value: Option<String>, flag: &str, prompt: &str) -> Result<SecretString, CliError> {
    if let Some(value) = value {
        return Ok(SecretString::from(value));
    }
    if !interactive() {
        return Err(CliError::Validation {
            field: flag.into(),
            reason: format!("--{flag} is required when not running interactively"),
        });
    }
    let secret = rpassword::prompt_password(format!("{prompt}: ")).map_err(prompt_err)?;
    Ok(SecretString::from(secret))
}

fn parse_url(raw: &str) -> Result<Url, CliError> {
    raw.trim().parse().map_err(|_| CliError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

fn store_for(opts: &StoreOpts) -> KeyringCredentialStore {
    let storage = if opts.plaintext {
        SecretStorage::Plaintext
    } else {
        SecretStorage::Keyring
    };
    KeyringCredentialStore::new().with_storage(storage)
}

/// Save, then (unless told not to) probe the provider with the new
/// credentials. A failed probe warns; the credentials stay saved.
async fn save_and_verify(
    config: &ProviderConfig,
    opts: &StoreOpts,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = store_for(opts);
    store.save(config)?;
    let provider = config.provider();
    if !global.quiet {
        eprintln!("✓ {} credentials saved to {}", provider.label(), store.path().display());
    }

    if opts.no_verify {
        return Ok(());
    }

    let transport = aura_config::load_config_or_default().transport();
    let adapter: Box<dyn ProviderAdapter> = match provider {
        ProviderKind::FogBugz => Box::new(FogBugzAdapter::new(transport)),
        _ => Box::new(JiraAdapter::new(transport)),
    };

    match adapter.check_auth(Some(config)).await {
        Some(AuthStatus::Credential {
            valid: true,
            identity,
        }) => {
            if !global.quiet {
                let who = identity.unwrap_or_else(|| config.email().to_owned());
                eprintln!("✓ Connected to {} as {who}", provider.label());
            }
        }
        Some(_) => eprintln!(
            "⚠ {} rejected these credentials; `aura auth status` will show it disconnected",
            provider.label()
        ),
        None => eprintln!(
            "⚠ Could not reach {} at {}",
            provider.label(),
            config.instance_url()
        ),
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = aura_config::load_config()?;
            output::print_output(format_config_redacted(&cfg).trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&aura_config::config_path().display().to_string(), false);
            Ok(())
        }

        ConfigCommand::SetJira(SetJiraArgs {
            url,
            email,
            api_token,
            store,
        }) => {
            let url = text_or_prompt(url, "url", "Jira site URL")?;
            let email = text_or_prompt(email, "email", "Email")?;
            let api_token = secret_or_prompt(api_token, "api-token", "API token")?;
            let config = ProviderConfig::Jira(JiraConfig {
                instance_url: parse_url(&url)?,
                email,
                api_token,
            });
            save_and_verify(&config, &store, global).await
        }

        ConfigCommand::SetFogBugz(SetFogBugzArgs {
            url,
            email,
            password,
            store,
        }) => {
            let url = text_or_prompt(url, "url", "FogBugz URL")?;
            let email = text_or_prompt(email, "email", "Email")?;
            let password = secret_or_prompt(password, "password", "Password")?;
            let config = ProviderConfig::FogBugz(FogBugzConfig {
                instance_url: parse_url(&url)?,
                email,
                password,
            });
            save_and_verify(&config, &store, global).await
        }

        ConfigCommand::Delete { provider } => {
            let provider = match provider {
                CredentialProvider::Jira => ProviderKind::Jira,
                CredentialProvider::Fogbugz => ProviderKind::FogBugz,
            };
            KeyringCredentialStore::new().delete(provider)?;
            if !global.quiet {
                eprintln!("✓ {} credentials removed", provider.label());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use aura_config::JiraSection;

    use super::*;

    #[test]
    fn show_masks_secrets() {
        let cfg = Config {
            jira: Some(JiraSection {
                instance_url: "https://acme.atlassian.net".into(),
                email: "ada@example.com".into(),
                api_token: Some("super-secret".into()),
                api_token_env: None,
            }),
            ..Config::default()
        };
        let shown = format_config_redacted(&cfg);
        assert!(shown.contains("[jira]"));
        assert!(shown.contains("api_token = \"****\""));
        assert!(!shown.contains("super-secret"));
        assert!(!shown.contains("[fogbugz]"));
    }
}
