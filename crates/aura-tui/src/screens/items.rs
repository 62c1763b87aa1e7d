//! Items screen: merged table with provider status, error banners and a
//! detail pane. One instance per tab.

use std::sync::Arc;

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use throbber_widgets_tui::{Throbber, ThrobberState};

use aura_core::{ErrorBanner, UnifiedItem, ViewSnapshot};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::{provider_status, time_fmt};

const PAGE: usize = 10;
const MAX_BANNER_ROWS: u16 = 4;
const DETAIL_HEIGHT: u16 = 10;

pub struct ItemsScreen {
    id: ScreenId,
    focused: bool,
    /// `None` until the data bridge delivers the first snapshot.
    snapshot: Option<Arc<ViewSnapshot>>,
    table_state: TableState,
    detail_open: bool,
    /// Index into the banners; `R` retries this one.
    selected_banner: usize,
    throbber_state: ThrobberState,
}

impl ItemsScreen {
    pub fn new(id: ScreenId) -> Self {
        Self {
            id,
            focused: false,
            snapshot: None,
            table_state: TableState::default(),
            detail_open: false,
            selected_banner: 0,
            throbber_state: ThrobberState::default(),
        }
    }

    fn items(&self) -> &[Arc<UnifiedItem>] {
        self.snapshot.as_deref().map_or(&[], |s| s.items.as_slice())
    }

    fn banners(&self) -> &[ErrorBanner] {
        self.snapshot.as_deref().map_or(&[], |s| s.banners.as_slice())
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn selected_item(&self) -> Option<&Arc<UnifiedItem>> {
        self.items().get(self.selected_index())
    }

    fn select(&mut self, idx: usize) {
        let len = self.items().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(idx.min(len - 1)));
        }
    }

    fn move_down(&mut self, n: usize) {
        self.select(self.selected_index().saturating_add(n));
    }

    fn move_up(&mut self, n: usize) {
        self.select(self.selected_index().saturating_sub(n));
    }

    /// Swap in a new snapshot, keeping the cursor on the same item when it
    /// is still present.
    fn apply_snapshot(&mut self, snap: Arc<ViewSnapshot>) {
        let previous = self.selected_item().map(|item| item.id.clone());
        self.snapshot = Some(snap);

        let idx = previous
            .and_then(|id| self.items().iter().position(|item| item.id == id))
            .unwrap_or_else(|| self.selected_index());
        self.select(idx);

        let banners = self.banners().len();
        if self.selected_banner >= banners {
            self.selected_banner = 0;
        }
        if self.items().is_empty() {
            self.detail_open = false;
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let Some(snap) = self.snapshot.as_deref() else {
            return;
        };
        let [left, right] =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(12)]).areas(area);

        frame.render_widget(
            Paragraph::new(Line::from(provider_status::status_spans(&snap.providers))),
            left,
        );

        if snap.model.any_loading {
            let throbber = Throbber::default()
                .label("syncing")
                .style(theme::key_hint())
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(throbber, right, &mut self.throbber_state.clone());
        }
    }

    fn render_banners(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .banners()
            .iter()
            .enumerate()
            .map(|(idx, banner)| {
                let selected = idx == self.selected_banner;
                let (marker, style) = if selected {
                    ("▸", theme::banner_selected())
                } else {
                    (" ", theme::banner())
                };
                Line::from(vec![
                    Span::styled(format!("{marker}✗ {}: ", banner.label), style),
                    Span::styled(banner.message.clone(), style),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let kind = self.id.kind();
        let block = Block::default()
            .title(format!(" {} ({}) ", self.id.label(), self.items().len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(snap) = self.snapshot.as_deref() else {
            self.render_waiting(frame, inner, "Checking providers…");
            return;
        };

        if snap.model.initial_load {
            self.render_waiting(frame, inner, "Checking providers…");
            return;
        }
        if snap.model.no_providers_connected {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  No providers are connected.",
                    Style::default().fg(theme::ELECTRIC_YELLOW),
                )),
                Line::from(Span::styled(
                    "  Sign in with `gh auth login` or `az login`, or save credentials with `aura config set-jira`.",
                    theme::key_hint(),
                )),
                Line::from(Span::styled(
                    "  Press a to check again.",
                    theme::key_hint(),
                )),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
            return;
        }
        if snap.items.is_empty() {
            if snap.model.any_loading {
                self.render_waiting(frame, inner, &format!("Fetching {kind}…"));
            } else if snap.model.empty_result {
                let message = format!("  No {kind} for you right now.");
                frame.render_widget(
                    Paragraph::new(vec![Line::from(""), Line::from(message)])
                        .style(theme::table_row()),
                    inner,
                );
            }
            return;
        }

        self.render_table(frame, inner, &snap.items);
    }

    fn render_waiting(&self, frame: &mut Frame, area: Rect, label: &str) {
        let [_, line] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);
        let throbber = Throbber::default()
            .label(format!(" {label}"))
            .style(Style::default().fg(theme::NEON_CYAN))
            .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        frame.render_stateful_widget(throbber, line, &mut self.throbber_state.clone());
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, items: &[Arc<UnifiedItem>]) {
        let now = Utc::now();
        let header = Row::new(["Provider", "Ref", "Title", "Status", "Where", "Updated"])
            .style(theme::table_header());

        let rows: Vec<Row> = items
            .iter()
            .map(|item| {
                Row::new(vec![
                    Cell::from(Span::styled(
                        item.provider.label(),
                        Style::default().fg(theme::provider_color(item.provider)),
                    )),
                    Cell::from(item.reference.clone()),
                    Cell::from(item.title.clone()),
                    Cell::from(item.status.clone()),
                    Cell::from(item.context.clone().unwrap_or_default()),
                    Cell::from(time_fmt::ago(item.updated_at, now)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(13),
                Constraint::Length(12),
                Constraint::Min(24),
                Constraint::Length(14),
                Constraint::Length(20),
                Constraint::Length(11),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected())
        .highlight_symbol("▸ ");

        frame.render_stateful_widget(table, area, &mut self.table_state.clone());
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, item: &UnifiedItem) {
        let block = Block::default()
            .title(format!(" {}  ·  {} ", item.reference, item.provider.label()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let field = |name: &'static str, value: String, color| {
            Line::from(vec![
                Span::styled(format!("  {name:<10}"), Style::default().fg(theme::DIM_WHITE)),
                Span::styled(value, Style::default().fg(color)),
            ])
        };
        let or_dash = |value: Option<&String>| value.cloned().unwrap_or_else(|| "─".into());
        let labels = if item.labels.is_empty() {
            "─".to_owned()
        } else {
            item.labels
                .iter()
                .map(|l| l.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let lines = vec![
            field("Title", item.title.clone(), theme::DIM_WHITE),
            field("URL", item.url.clone(), theme::NEON_CYAN),
            field("Status", item.status.clone(), theme::DIM_WHITE),
            field("Where", or_dash(item.context.as_ref()), theme::DIM_WHITE),
            field("Author", or_dash(item.author.as_ref()), theme::DIM_WHITE),
            field("Priority", or_dash(item.priority.as_ref()), theme::DIM_WHITE),
            field("Labels", labels, theme::CORAL),
            field(
                "Updated",
                item.updated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
                theme::DIM_WHITE,
            ),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}

impl Component for ItemsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('d') => self.move_down(PAGE),
                KeyCode::Char('u') => self.move_up(PAGE),
                _ => {}
            }
            return Ok(None);
        }

        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_down(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_up(1);
                None
            }
            KeyCode::PageDown => {
                self.move_down(PAGE);
                None
            }
            KeyCode::PageUp => {
                self.move_up(PAGE);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.select(0);
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.select(usize::MAX);
                None
            }
            KeyCode::Enter => {
                self.detail_open = !self.detail_open && self.selected_item().is_some();
                None
            }
            KeyCode::Esc => {
                self.detail_open = false;
                None
            }
            KeyCode::Char('b') => {
                let banners = self.banners().len();
                if banners > 0 {
                    self.selected_banner = (self.selected_banner + 1) % banners;
                }
                None
            }
            KeyCode::Char('r') => Some(Action::Refresh(self.id)),
            KeyCode::Char('R') => self
                .banners()
                .get(self.selected_banner)
                .map(|banner| Action::Retry(self.id, banner.provider)),
            KeyCode::Char('a') => Some(Action::RecheckAuth(self.id)),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => self.throbber_state.calc_next(),
            Action::SnapshotUpdated(id, snap) if *id == self.id => {
                self.apply_snapshot(Arc::clone(snap));
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let banner_rows = u16::try_from(self.banners().len())
            .unwrap_or(MAX_BANNER_ROWS)
            .min(MAX_BANNER_ROWS);
        let detail = self.selected_item().filter(|_| self.detail_open);
        let detail_rows = if detail.is_some() { DETAIL_HEIGHT } else { 0 };

        let [status_area, banner_area, list_area, detail_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(banner_rows),
            Constraint::Min(3),
            Constraint::Length(detail_rows),
        ])
        .areas(area);

        self.render_status_line(frame, status_area);
        if banner_rows > 0 {
            self.render_banners(frame, banner_area);
        }
        self.render_list(frame, list_area);
        if let Some(item) = detail {
            self.render_detail(frame, detail_area, item);
        }
    }

    fn is_animating(&self) -> bool {
        self.snapshot
            .as_deref()
            .is_none_or(|s| s.model.initial_load || s.model.any_loading)
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
