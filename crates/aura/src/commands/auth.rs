//! `aura auth status`.

use std::sync::Arc;

use tabled::Tabled;

use aura_core::{AuthMode, FetchPhase, ItemKind, ProviderStatus, UnifiedView};

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::Session;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Provider")]
    provider: &'static str,
    #[tabled(rename = "Sign-in")]
    mode: &'static str,
    #[tabled(rename = "Connected")]
    connected: &'static str,
    #[tabled(rename = "Identity")]
    identity: String,
    #[tabled(rename = "Issues")]
    fetch: String,
}

impl From<&ProviderStatus> for StatusRow {
    fn from(s: &ProviderStatus) -> Self {
        let connected = match (s.checked, s.connected) {
            (false, _) => "?",
            (true, true) => "yes",
            (true, false) => "no",
        };
        let fetch = match (s.phase, s.item_count, s.error.as_deref()) {
            (FetchPhase::Error, _, Some(error)) => output::truncate(error, 50),
            (_, Some(count), _) => count.to_string(),
            (phase, None, _) => phase.to_string(),
        };
        Self {
            provider: s.label,
            mode: match s.auth_mode {
                AuthMode::CliDelegated => "cli",
                AuthMode::Credential => "credentials",
            },
            connected,
            identity: s.identity.clone().unwrap_or_else(|| "-".into()),
            fetch,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

/// Runs a full Issues view (every provider feeds it) and reports each
/// provider's auth and fetch outcome.
pub async fn handle(args: &AuthArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Status => {
            let session = Session::load(global)?;
            let format = session.output_format(global);
            let view = UnifiedView::new(
                ItemKind::Issues,
                session.adapters(&[]),
                Arc::clone(&session.credentials),
                session.config.sync_config(),
            );
            let spinner = super::spinner(global, "Checking providers…".into());
            let snap = super::settle(&view, session.deadline(), &spinner).await?;

            let out = output::render_list(
                format,
                &snap.providers,
                |s| StatusRow::from(s),
                |s| format!("{}\t{}", s.provider, s.connected),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use aura_core::ProviderKind;

    use super::*;

    fn status(checked: bool, connected: bool) -> ProviderStatus {
        ProviderStatus {
            provider: ProviderKind::GitHub,
            label: "GitHub",
            auth_mode: AuthMode::CliDelegated,
            checked,
            connected,
            identity: Some("octocat".into()),
            phase: FetchPhase::Success,
            item_count: Some(4),
            error: None,
            consecutive_failures: 0,
            last_success_at: None,
        }
    }

    #[test]
    fn unchecked_provider_shows_question_mark() {
        assert_eq!(StatusRow::from(&status(false, false)).connected, "?");
        assert_eq!(StatusRow::from(&status(true, true)).connected, "yes");
    }

    #[test]
    fn fetch_column_prefers_error() {
        let mut s = status(true, true);
        s.phase = FetchPhase::Error;
        s.error = Some("GitHub API error 502: Bad Gateway".into());
        assert_eq!(
            StatusRow::from(&s).fetch,
            "GitHub API error 502: Bad Gateway"
        );
        assert_eq!(StatusRow::from(&status(true, true)).fetch, "4");
    }
}
