//! Provider status indicator: ◌/○/◐/●/✗ with color mapping.

use ratatui::style::{Color, Style};
use ratatui::text::Span;

use aura_core::{FetchPhase, ProviderStatus};

use crate::theme;

fn indicator(status: &ProviderStatus) -> (&'static str, Color) {
    match (status.checked, status.connected, status.phase) {
        (false, _, _) => ("◌", theme::BORDER_GRAY),
        (true, false, _) => ("○", theme::BORDER_GRAY),
        (true, true, FetchPhase::Loading) => ("◐", theme::ELECTRIC_YELLOW),
        (true, true, FetchPhase::Error) => ("✗", theme::ERROR_RED),
        (true, true, FetchPhase::NotStarted | FetchPhase::Success) => ("●", theme::SUCCESS_GREEN),
    }
}

/// `● GitHub 4  ○ Jira  ◐ FogBugz` for the screen header.
pub fn status_spans(providers: &[ProviderStatus]) -> Vec<Span<'static>> {
    let mut spans = vec![Span::raw(" ")];
    for status in providers {
        let (symbol, color) = indicator(status);
        spans.push(Span::styled(symbol, Style::default().fg(color)));
        spans.push(Span::styled(
            format!(" {}", status.label),
            Style::default().fg(if status.connected {
                theme::provider_color(status.provider)
            } else {
                theme::BORDER_GRAY
            }),
        ));
        if let Some(count) = status.item_count.filter(|_| status.connected) {
            spans.push(Span::styled(format!(" {count}"), theme::table_row()));
        }
        spans.push(Span::raw("   "));
    }
    spans
}
