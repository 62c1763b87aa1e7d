//! Terminal input plus the throbber clock, merged into one channel.
//!
//! The app redraws on demand: a key press, a resize or a new snapshot marks
//! the frame dirty. [`Event::Tick`] only drives the "syncing" spinners and
//! is ignored by a screen with nothing in flight.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Spinner frame interval.
pub const THROBBER_INTERVAL: Duration = Duration::from_millis(120);

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// The terminal changed size; ratatui picks up the new area on draw.
    Redraw,
    /// Advance spinners by one frame.
    Tick,
}

/// Background reader for crossterm input and the spinner clock.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut input = EventStream::new();
            let mut ticks = tokio::time::interval(tick_rate);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let event = tokio::select! {
                    () = task_cancel.cancelled() => break,
                    _ = ticks.tick() => Event::Tick,
                    next = input.next() => match next {
                        Some(Ok(raw)) => match translate(raw) {
                            Some(event) => event,
                            None => continue,
                        },
                        Some(Err(_)) => continue,
                        // stdin closed
                        None => break,
                    },
                };

                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, cancel }
    }

    /// Next event, or `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Key presses and resizes; releases, repeats, focus and paste are dropped.
fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(..) => Some(Event::Redraw),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    use super::*;

    #[test]
    fn only_presses_and_resizes_get_through() {
        let press = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert!(matches!(translate(CrosstermEvent::Key(press)), Some(Event::Key(_))));

        let release = KeyEvent {
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
            ..press
        };
        assert!(translate(CrosstermEvent::Key(release)).is_none());

        assert!(matches!(translate(CrosstermEvent::Resize(80, 24)), Some(Event::Redraw)));
        assert!(translate(CrosstermEvent::FocusGained).is_none());
    }
}
