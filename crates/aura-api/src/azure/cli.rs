use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{Account, PullRequest, WorkItem};
use crate::command::{CommandRunner, probe, run_checked};
use crate::error::{Error, body_preview};

const AZ: &str = "az";

const ASSIGNED_WIQL: &str = concat!(
    "SELECT [System.Id], [System.Title], [System.State], [System.WorkItemType], ",
    "[System.AssignedTo], [System.ChangedDate], [System.Tags], ",
    "[Microsoft.VSTS.Common.Priority] ",
    "FROM workitems WHERE [System.AssignedTo] = @Me ",
    "AND [System.State] <> 'Closed' AND [System.State] <> 'Removed' ",
    "AND [System.State] <> 'Done' ORDER BY [System.ChangedDate] DESC"
);

/// Organization and project defaults from `az devops configure --list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevOpsDefaults {
    pub organization: Option<String>,
    pub project: Option<String>,
}

impl DevOpsDefaults {
    /// Parse `key = value` lines; `None` and empty values are treated as unset.
    pub fn parse(text: &str) -> Self {
        let mut defaults = Self::default();
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() || value == "None" {
                continue;
            }
            match key.trim() {
                "organization" => defaults.organization = Some(value.to_owned()),
                "project" => defaults.project = Some(value.to_owned()),
                _ => {}
            }
        }
        defaults
    }

    fn require(&self) -> Result<(&str, &str), Error> {
        let org = self.organization.as_deref().ok_or_else(|| {
            Error::NotConfigured(
                "No Azure DevOps organization configured. Run `az devops configure \
                 --defaults organization=https://dev.azure.com/YOUR_ORG`"
                    .into(),
            )
        })?;
        let project = self.project.as_deref().ok_or_else(|| {
            Error::NotConfigured(
                "No Azure DevOps project configured. Run `az devops configure \
                 --defaults project=YOUR_PROJECT`"
                    .into(),
            )
        })?;
        Ok((org.trim_end_matches('/'), project))
    }
}

/// Result of probing the `az` CLI.
#[derive(Debug, Clone, Default)]
pub struct AzAuth {
    pub cli_available: bool,
    pub logged_in: bool,
    /// Signed-in user from `az account show`.
    pub user: Option<String>,
    pub defaults: DevOpsDefaults,
}

#[derive(Clone)]
pub struct AzCli {
    runner: Arc<dyn CommandRunner>,
}

impl AzCli {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    pub async fn auth(&self) -> AzAuth {
        if !probe(self.runner.as_ref(), AZ, &["--version"]).await {
            return AzAuth::default();
        }
        let account = match run_checked(
            self.runner.as_ref(),
            AZ,
            &["account", "show", "--output", "json"],
        )
        .await
        {
            Ok(stdout) => parse_json::<Account>(&stdout).unwrap_or_else(|e| {
                debug!(error = %e, "az account show output not understood");
                Account::default()
            }),
            Err(e) => {
                debug!(error = %e, "az not logged in");
                return AzAuth {
                    cli_available: true,
                    ..AzAuth::default()
                };
            }
        };

        AzAuth {
            cli_available: true,
            logged_in: true,
            user: account.user.and_then(|u| u.name).filter(|n| !n.trim().is_empty()),
            defaults: self.defaults().await,
        }
    }

    pub async fn defaults(&self) -> DevOpsDefaults {
        match run_checked(self.runner.as_ref(), AZ, &["devops", "configure", "--list"]).await {
            Ok(stdout) => DevOpsDefaults::parse(&stdout),
            Err(e) => {
                debug!(error = %e, "az devops defaults unavailable");
                DevOpsDefaults::default()
            }
        }
    }

    /// Open work items assigned to `@Me`.
    pub async fn assigned_work_items(&self) -> Result<Vec<WorkItem>, Error> {
        let defaults = self.ensure_ready().await?;
        let (org, project) = defaults.require()?;

        let stdout = run_checked(
            self.runner.as_ref(),
            AZ,
            &["boards", "query", "--wiql", ASSIGNED_WIQL, "--output", "json"],
        )
        .await?;

        let mut items: Vec<WorkItem> = parse_json(&stdout)?;
        for item in &mut items {
            let item_project = item.fields.team_project.as_deref().unwrap_or(project);
            item.web_url = Some(format!("{org}/{item_project}/_workitems/edit/{}", item.id));
        }
        debug!(count = items.len(), "azure work items");
        Ok(items)
    }

    /// Active pull requests in the default project.
    pub async fn active_pull_requests(&self) -> Result<Vec<PullRequest>, Error> {
        let defaults = self.ensure_ready().await?;
        let (org, project) = defaults.require()?;

        let stdout = run_checked(
            self.runner.as_ref(),
            AZ,
            &["repos", "pr", "list", "--status", "active", "--output", "json"],
        )
        .await?;

        let mut prs: Vec<PullRequest> = parse_json(&stdout)?;
        for pr in &mut prs {
            let repo = pr.repository_name().unwrap_or_default().to_owned();
            pr.web_url = Some(format!(
                "{org}/{project}/_git/{repo}/pullrequest/{}",
                pr.pull_request_id
            ));
        }
        debug!(count = prs.len(), "azure pull requests");
        Ok(prs)
    }

    async fn ensure_ready(&self) -> Result<DevOpsDefaults, Error> {
        let auth = self.auth().await;
        if !auth.cli_available {
            return Err(Error::CliUnavailable {
                program: AZ.into(),
                reason: "install from https://aka.ms/azure-cli".into(),
            });
        }
        if !auth.logged_in {
            return Err(Error::NotLoggedIn {
                program: "Azure",
                login_hint: "az login",
            });
        }
        Ok(auth.defaults)
    }
}

fn parse_json<T: DeserializeOwned>(stdout: &str) -> Result<T, Error> {
    serde_json::from_str(stdout).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body_preview(stdout),
    })
}
