//! `aura issues` and `aura prs`.

use std::sync::Arc;

use tabled::Tabled;

use aura_core::{ItemKind, UnifiedItem, UnifiedView};

use crate::cli::{GlobalOpts, ListArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::Session;

const TITLE_WIDTH: usize = 60;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "Provider")]
    provider: &'static str,
    #[tabled(rename = "Ref")]
    reference: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Where")]
    context: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Arc<UnifiedItem>> for ItemRow {
    fn from(item: &Arc<UnifiedItem>) -> Self {
        Self {
            provider: item.provider.label(),
            reference: item.reference.clone(),
            title: output::truncate(&item.title, TITLE_WIDTH),
            status: item.status.clone(),
            context: item.context.clone().unwrap_or_default(),
            updated: item.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(kind: ItemKind, args: &ListArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let session = Session::load(global)?;
    let format = session.output_format(global);
    let adapters = session.adapters(&args.provider);
    tracing::debug!(view = %kind, providers = adapters.len(), "building view");

    let view = UnifiedView::new(
        kind,
        adapters,
        Arc::clone(&session.credentials),
        session.config.sync_config(),
    );
    let spinner = super::spinner(global, format!("Fetching {kind}…"));
    let snap = super::settle(&view, session.deadline(), &spinner).await?;

    if snap.model.no_providers_connected {
        return Err(CliError::NoProvidersConnected {
            kind: kind.to_string(),
        });
    }

    output::print_banners(&snap.banners, output::should_color(global.color));

    let limit = args.limit.unwrap_or(usize::MAX);
    let items: Vec<Arc<UnifiedItem>> = snap.items.iter().take(limit).cloned().collect();

    if snap.model.empty_result && format == OutputFormat::Table && !global.quiet {
        eprintln!("No {kind} for you right now.");
    }

    let out = output::render_list(
        format,
        &items,
        |item| ItemRow::from(item),
        |item| item.url.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
