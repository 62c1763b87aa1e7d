//! Application core: event loop, tab management, action dispatch.

use std::collections::{HashMap, HashSet};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use aura_core::UnifiedView;

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge;
use crate::event::{Event, EventReader, THROBBER_INTERVAL};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// Top-level application state and event loop.
pub struct App {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// The view behind each tab.
    views: HashMap<ScreenId, UnifiedView>,
    /// Merged item count per tab, for the tab bar.
    counts: HashMap<ScreenId, usize>,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Tabs whose view has been mounted; a view mounts on its first visit.
    mounted: HashSet<ScreenId>,
    /// Stops every data bridge.
    data_cancel: CancellationToken,
    bridges: Vec<JoinHandle<()>>,
}

impl App {
    pub fn new(views: Vec<UnifiedView>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let views = views
            .into_iter()
            .map(|view| (ScreenId::from_kind(view.kind()), view))
            .collect();

        Self {
            active_screen: ScreenId::default(),
            screens: create_screens().into_iter().collect(),
            views,
            counts: HashMap::new(),
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            mounted: HashSet::new(),
            data_cancel: CancellationToken::new(),
            bridges: Vec::new(),
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Show a tab's view. The first visit mounts it through its own bridge
    /// task, so that activation coincides with mount; later visits refresh.
    fn activate(&mut self, id: ScreenId) {
        let Some(view) = self.views.get(&id) else {
            return;
        };
        if self.mounted.insert(id) {
            debug!(view = %id, "mounting on first visit");
            let bridge = data_bridge::spawn_data_bridge(
                view.clone(),
                self.action_tx.clone(),
                self.data_cancel.clone(),
            );
            self.bridges.push(tokio::spawn(bridge));
        }
        view.set_active(true);
    }

    /// Stop the bridges and wait for their views to shut down.
    async fn shutdown(&mut self) {
        self.data_cancel.cancel();
        for bridge in self.bridges.drain(..) {
            if let Err(e) = bridge.await {
                warn!(error = %e, "data bridge task failed");
            }
        }
    }

    /// Run the main event loop. Frames are drawn only when something
    /// changed: input, a snapshot, or a spinner step on the visible tab.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::start()?;
        self.init_screens()?;
        self.activate(self.active_screen);

        let mut events = EventReader::new(THROBBER_INTERVAL);
        let mut dirty = true;

        info!("TUI event loop started");

        while self.running {
            if dirty {
                tui.set_title(self.active_screen, self.counts.get(&self.active_screen).copied())?;
                tui.draw(|frame| self.render(frame))?;
                dirty = false;
            }

            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                    dirty = true;
                }
                Event::Redraw => dirty = true,
                Event::Tick => self.action_tx.send(Action::Tick)?,
            }

            // Drain everything queued, including bridge snapshots
            while let Ok(action) = self.action_rx.try_recv() {
                dirty |= self.process_action(&action)?;
            }
        }

        drop(events);
        self.shutdown().await;
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys first; everything else goes to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(match (key.modifiers, key.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
                (_, KeyCode::Esc | KeyCode::Char('?')) => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (KeyModifiers::NONE, KeyCode::Char('q')) => {
                return Ok(Some(Action::Quit));
            }
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let target = c
                    .to_digit(10)
                    .and_then(|d| u8::try_from(d).ok())
                    .and_then(ScreenId::from_number);
                if let Some(screen) = target {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (_, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    fn view(&self, id: ScreenId) -> Option<&UnifiedView> {
        self.views.get(&id)
    }

    fn switch_screen(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        if let Some(view) = self.view(self.active_screen) {
            view.set_active(false);
        }

        self.active_screen = target;

        if let Some(screen) = self.screens.get_mut(&target) {
            screen.set_focused(true);
        }
        self.activate(target);
    }

    fn forward(&mut self, id: ScreenId, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&id) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Apply one action. Returns whether the visible frame changed.
    fn process_action(&mut self, action: &Action) -> Result<bool> {
        match action {
            Action::Quit => self.running = false,

            Action::SwitchScreen(target) => self.switch_screen(*target),

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Refresh(id) => {
                if let Some(view) = self.view(*id) {
                    view.refresh();
                }
            }
            Action::Retry(id, provider) => {
                if let Some(view) = self.view(*id) {
                    debug!(view = %id, provider = %provider, "retrying provider");
                    view.retry(*provider);
                }
            }
            Action::RecheckAuth(id) => {
                if let Some(view) = self.view(*id) {
                    view.recheck_all();
                }
            }

            Action::SnapshotUpdated(id, snap) => {
                self.counts.insert(*id, snap.items.len());
                self.forward(*id, action)?;
            }

            // Hidden tabs keep their spinner phase; only the visible one
            // costs a frame.
            Action::Tick => {
                let mut animating = false;
                for id in ScreenId::ALL {
                    if let Some(screen) = self.screens.get(&id) {
                        animating |= id == self.active_screen && screen.is_animating();
                    }
                    self.forward(id, action)?;
                }
                return Ok(animating);
            }
        }
        Ok(true)
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let [content_area, tab_area, status_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content_area);
        }

        self.render_tab_bar(frame, tab_area);
        Self::render_status_bar(frame, status_area);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                let count = self
                    .counts
                    .get(&id)
                    .map_or_else(String::new, |n| format!(" ({n})"));
                Line::from(Span::styled(
                    format!(" {} {}{count} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect) {
        let hint = |key: &'static str, label: &'static str| {
            [
                Span::styled(key, theme::key_hint_key()),
                Span::styled(format!(" {label}  "), theme::key_hint()),
            ]
        };
        let mut spans = vec![Span::raw(" ")];
        for (key, label) in [
            ("r", "refresh"),
            ("R", "retry"),
            ("a", "re-auth"),
            ("Enter", "detail"),
            ("?", "help"),
            ("q", "quit"),
        ] {
            spans.extend(hint(key, label));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 56u16.min(area.width.saturating_sub(4));
        let help_height = 21u16.min(area.height.saturating_sub(4));

        let x = area.width.saturating_sub(help_width) / 2;
        let y = area.height.saturating_sub(help_height) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            Line::from(Span::styled(
                format!("  {title}"),
                Style::default().fg(theme::NEON_CYAN),
            ))
        };
        let entry = |key: &'static str, label: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(label, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            section("Navigation"),
            entry("1-2 Tab", "Switch between Issues and Pull Requests"),
            entry("j/k ↑/↓", "Move up/down"),
            entry("g/G", "Top / bottom"),
            entry("Ctrl+d/u", "Page down / up"),
            entry("Enter", "Show / hide details"),
            entry("Esc", "Close details"),
            Line::from(""),
            section("Sync"),
            entry("r", "Refresh every connected provider"),
            entry("R", "Retry the highlighted error"),
            entry("b", "Highlight the next error"),
            entry("a", "Check sign-in again"),
            Line::from(""),
            section("Global"),
            entry("?", "This help"),
            entry("q", "Quit"),
            Line::from(""),
            Line::from(Span::styled(
                "                    Esc or ? to close",
                theme::key_hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use aura_core::{
        AuthStatus, CredentialStore, FetchError, ItemKind, MemoryCredentialStore,
        ProviderAdapter, ProviderConfig, ProviderKind, RawItem, SyncConfig, ViewModel,
        ViewSnapshot,
    };

    use super::*;

    /// Signed-in GitHub that counts fetches per view.
    #[derive(Default)]
    struct CountingGitHub {
        issues: AtomicUsize,
        pulls: AtomicUsize,
    }

    impl CountingGitHub {
        fn fetches(&self) -> (usize, usize) {
            (
                self.issues.load(Ordering::SeqCst),
                self.pulls.load(Ordering::SeqCst),
            )
        }
    }

    #[async_trait]
    impl ProviderAdapter for CountingGitHub {
        fn kind(&self) -> ProviderKind {
            ProviderKind::GitHub
        }

        async fn check_auth(&self, _config: Option<&ProviderConfig>) -> Option<AuthStatus> {
            Some(AuthStatus::Cli {
                reachable: true,
                authenticated: true,
                identity: Some("octocat".into()),
            })
        }

        async fn fetch_items(
            &self,
            kind: ItemKind,
            _config: Option<&ProviderConfig>,
        ) -> Result<Vec<RawItem>, FetchError> {
            match kind {
                ItemKind::Issues => self.issues.fetch_add(1, Ordering::SeqCst),
                ItemKind::PullRequests => self.pulls.fetch_add(1, Ordering::SeqCst),
            };
            Ok(Vec::new())
        }
    }

    fn app_with(adapters: &[Arc<dyn ProviderAdapter>]) -> App {
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
        let views = [ItemKind::Issues, ItemKind::PullRequests]
            .into_iter()
            .map(|kind| {
                UnifiedView::new(
                    kind,
                    adapters.iter().cloned(),
                    Arc::clone(&store),
                    SyncConfig::default(),
                )
            })
            .collect();
        App::new(views)
    }

    fn app() -> App {
        app_with(&[])
    }

    async fn wait_for_fetches(github: &CountingGitHub, expected: (usize, usize)) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while github.fetches() != expected {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn hidden_tab_mounts_on_first_visit_and_refreshes_on_return() {
        let github = Arc::new(CountingGitHub::default());
        let mut app = app_with(&[Arc::clone(&github) as Arc<dyn ProviderAdapter>]);

        app.activate(app.active_screen);
        wait_for_fetches(&github, (1, 0)).await;
        assert!(!app.mounted.contains(&ScreenId::PullRequests));

        // First visit mounts: one fetch, not two
        app.process_action(&Action::SwitchScreen(ScreenId::PullRequests))
            .unwrap();
        wait_for_fetches(&github, (1, 1)).await;

        app.process_action(&Action::SwitchScreen(ScreenId::Issues))
            .unwrap();
        wait_for_fetches(&github, (2, 1)).await;

        app.process_action(&Action::SwitchScreen(ScreenId::PullRequests))
            .unwrap();
        wait_for_fetches(&github, (2, 2)).await;

        app.shutdown().await;
        assert_eq!(github.fetches(), (2, 2));
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn number_keys_switch_tabs() {
        let mut app = app();
        let action = app.handle_key_event(key(KeyCode::Char('2'))).unwrap();
        assert!(matches!(
            action,
            Some(Action::SwitchScreen(ScreenId::PullRequests))
        ));
        assert!(app.handle_key_event(key(KeyCode::Char('7'))).unwrap().is_none());
    }

    #[tokio::test]
    async fn switching_changes_active_tab() {
        let mut app = app();
        app.process_action(&Action::SwitchScreen(ScreenId::PullRequests))
            .unwrap();
        assert_eq!(app.active_screen, ScreenId::PullRequests);

        let back = app.handle_key_event(key(KeyCode::Tab)).unwrap();
        assert!(matches!(back, Some(Action::SwitchScreen(ScreenId::Issues))));
    }

    #[tokio::test]
    async fn help_swallows_keys() {
        let mut app = app();
        app.process_action(&Action::ToggleHelp).unwrap();
        assert!(app.handle_key_event(key(KeyCode::Char('q'))).unwrap().is_none());
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::ToggleHelp)
        ));
    }

    #[tokio::test]
    async fn snapshots_update_tab_counts() {
        let mut app = app();
        let snap = Arc::new(ViewSnapshot {
            kind: ItemKind::PullRequests,
            items: Vec::new(),
            banners: Vec::new(),
            model: ViewModel::default(),
            providers: Vec::new(),
        });
        app.process_action(&Action::SnapshotUpdated(ScreenId::PullRequests, snap))
            .unwrap();
        assert_eq!(app.counts.get(&ScreenId::PullRequests), Some(&0));
        assert_eq!(app.counts.get(&ScreenId::Issues), None);
    }

    #[tokio::test]
    async fn ticks_redraw_only_while_the_visible_tab_syncs() {
        let mut app = app();
        assert!(app.process_action(&Action::Tick).unwrap());

        let settled = Arc::new(ViewSnapshot {
            kind: ItemKind::Issues,
            items: Vec::new(),
            banners: Vec::new(),
            model: ViewModel::default(),
            providers: Vec::new(),
        });
        app.process_action(&Action::SnapshotUpdated(ScreenId::Issues, settled))
            .unwrap();
        assert!(!app.process_action(&Action::Tick).unwrap());

        // Pull Requests has no snapshot yet
        app.process_action(&Action::SwitchScreen(ScreenId::PullRequests))
            .unwrap();
        assert!(app.process_action(&Action::Tick).unwrap());
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let mut app = app();
        let quit = app.handle_key_event(key(KeyCode::Char('q'))).unwrap().unwrap();
        app.process_action(&quit).unwrap();
        assert!(!app.running);
    }
}
