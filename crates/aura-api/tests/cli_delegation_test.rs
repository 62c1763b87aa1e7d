#![allow(clippy::unwrap_used)]
// `gh` and `az` delegation driven by scripted subprocess output.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::ExposeSecret;

use aura_api::azure::AzCli;
use aura_api::github::GhCli;
use aura_api::{CommandOutput, CommandRunner, Error};

// ── Helpers ─────────────────────────────────────────────────────────

/// Replies keyed by `"program arg1 arg2"` prefix. Unscripted commands
/// behave as if the binary were missing.
#[derive(Default)]
struct ScriptedRunner {
    replies: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    fn reply(mut self, command: &str, output: CommandOutput) -> Self {
        self.replies.insert(command.to_owned(), output);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(line.clone());

        self.replies
            .iter()
            .filter(|(prefix, _)| line.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, output)| output.clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{program}: not found")))
    }
}

fn az_ready() -> ScriptedRunner {
    ScriptedRunner::default()
        .reply("az --version", CommandOutput::ok("azure-cli 2.60.0"))
        .reply("az account show", CommandOutput::ok(""))
        .reply(
            "az devops configure --list",
            CommandOutput::ok(
                "[defaults]\norganization = https://dev.azure.com/contoso/\nproject = Fabrikam\n",
            ),
        )
}

// ── gh ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_gh_missing_binary() {
    let gh = GhCli::new(Arc::new(ScriptedRunner::default()));
    let auth = gh.auth().await;
    assert!(!auth.cli_available);
    assert!(!auth.authenticated);
}

#[tokio::test]
async fn test_gh_authenticated_with_username() {
    let runner = ScriptedRunner::default()
        .reply("gh --version", CommandOutput::ok("gh version 2.45.0"))
        .reply("gh auth token", CommandOutput::ok("gho_abc123\n"))
        .reply(
            "gh auth status",
            CommandOutput {
                success: true,
                stdout: String::new(),
                stderr: "github.com\n  ✓ Logged in to github.com account octocat (keyring)\n"
                    .into(),
            },
        );
    let gh = GhCli::new(Arc::new(runner));

    let auth = gh.auth().await;
    assert!(auth.cli_available);
    assert!(auth.authenticated);
    assert_eq!(auth.username.as_deref(), Some("octocat"));
    assert_eq!(auth.token.unwrap().expose_secret(), "gho_abc123");
}

#[tokio::test]
async fn test_gh_installed_but_logged_out() {
    let runner = ScriptedRunner::default()
        .reply("gh --version", CommandOutput::ok("gh version 2.45.0"))
        .reply(
            "gh auth token",
            CommandOutput::failed("no oauth token found for github.com"),
        );
    let gh = GhCli::new(Arc::new(runner));

    let auth = gh.auth().await;
    assert!(auth.cli_available);
    assert!(!auth.authenticated);
    assert!(auth.token.is_none());
}

#[tokio::test]
async fn test_gh_empty_token_is_not_logged_in() {
    let runner = ScriptedRunner::default().reply("gh auth token", CommandOutput::ok("  \n"));
    let gh = GhCli::new(Arc::new(runner));

    let err = gh.token().await.unwrap_err();
    assert!(matches!(err, Error::NotLoggedIn { .. }), "got: {err:?}");
}

// ── az ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_az_not_logged_in() {
    let runner = ScriptedRunner::default()
        .reply("az --version", CommandOutput::ok("azure-cli 2.60.0"))
        .reply("az account show", CommandOutput::failed("Please run 'az login'"));
    let az = AzCli::new(Arc::new(runner));

    let auth = az.auth().await;
    assert!(auth.cli_available);
    assert!(!auth.logged_in);

    let err = az.assigned_work_items().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Azure CLI not authenticated. Run `az login` first."
    );
}

#[tokio::test]
async fn test_az_missing_binary() {
    let az = AzCli::new(Arc::new(ScriptedRunner::default()));
    let err = az.active_pull_requests().await.unwrap_err();
    assert!(matches!(err, Error::CliUnavailable { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_az_work_items_get_web_urls() {
    let runner = az_ready().reply(
        "az boards query",
        CommandOutput::ok(
            r#"[{
                "id": 42,
                "fields": {
                    "System.Title": "Broken build",
                    "System.State": "Active",
                    "System.WorkItemType": "Bug",
                    "System.ChangedDate": "2024-01-15T10:30:00.000Z",
                    "System.Tags": "ci; infra",
                    "System.TeamProject": "Platform"
                }
            }]"#,
        ),
    );
    let runner = Arc::new(runner);
    let az = AzCli::new(runner.clone());

    let items = az.assigned_work_items().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(
        items[0].web_url.as_deref(),
        Some("https://dev.azure.com/contoso/Platform/_workitems/edit/42")
    );
    assert_eq!(items[0].fields.tag_list(), vec!["ci", "infra"]);
    assert!(runner.calls().iter().any(|c| c.starts_with("az boards query --wiql")));
}

#[tokio::test]
async fn test_az_pull_requests_get_web_urls() {
    let runner = az_ready().reply(
        "az repos pr list",
        CommandOutput::ok(
            r#"[{
                "pullRequestId": 7,
                "title": "Add retries",
                "status": "active",
                "createdBy": { "displayName": "Mona" },
                "repository": { "name": "service" },
                "sourceRefName": "refs/heads/feature/retries",
                "targetRefName": "refs/heads/main",
                "creationDate": "2024-01-10T08:00:00Z",
                "isDraft": false
            }]"#,
        ),
    );
    let az = AzCli::new(Arc::new(runner));

    let prs = az.active_pull_requests().await.unwrap();
    assert_eq!(
        prs[0].web_url.as_deref(),
        Some("https://dev.azure.com/contoso/Fabrikam/_git/service/pullrequest/7")
    );
    assert_eq!(prs[0].source_branch(), Some("feature/retries"));
}

#[tokio::test]
async fn test_az_missing_project_default() {
    let runner = ScriptedRunner::default()
        .reply("az --version", CommandOutput::ok("azure-cli 2.60.0"))
        .reply("az account show", CommandOutput::ok(""))
        .reply(
            "az devops configure --list",
            CommandOutput::ok("organization = https://dev.azure.com/contoso\n"),
        );
    let az = AzCli::new(Arc::new(runner));

    let err = az.assigned_work_items().await.unwrap_err();
    assert!(matches!(err, Error::NotConfigured(_)), "got: {err:?}");
}

#[tokio::test]
async fn test_az_identity_is_the_signed_in_user() {
    let runner = az_ready().reply(
        "az account show",
        CommandOutput::ok(
            r#"{"name": "Contoso Dev", "user": {"name": "ada@contoso.com", "type": "user"}}"#,
        ),
    );
    let az = AzCli::new(Arc::new(runner));

    let auth = az.auth().await;
    assert!(auth.logged_in);
    assert_eq!(auth.user.as_deref(), Some("ada@contoso.com"));
    assert_eq!(
        auth.defaults.organization.as_deref(),
        Some("https://dev.azure.com/contoso/")
    );
}

#[tokio::test]
async fn test_az_unreadable_account_still_logged_in() {
    let az = AzCli::new(Arc::new(az_ready()));

    let auth = az.auth().await;
    assert!(auth.logged_in);
    assert_eq!(auth.user, None);
}

#[tokio::test]
async fn test_az_cli_failure_carries_stderr() {
    let runner = az_ready().reply(
        "az boards query",
        CommandOutput::failed("ERROR: TF400813: not authorized\n"),
    );
    let az = AzCli::new(Arc::new(runner));

    let err = az.assigned_work_items().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "az boards query failed: ERROR: TF400813: not authorized"
    );
}
