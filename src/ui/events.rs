use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

/// Keyboard input reduced to what the app cares about. Printable keys are
/// passed through as `Char` because their meaning depends on whether the
/// app is browsing or editing an input field - that decision belongs to
/// the app, not the event pump.
#[derive(Debug, Clone)]
pub enum AppEvent {
    // UI housekeeping
    Tick,
    Render,

    // Raw-ish keyboard input
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Backspace,
}

pub struct EventHandler {
    event_sender: mpsc::UnboundedSender<AppEvent>,
    event_receiver: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (event_sender, event_receiver) = mpsc::unbounded_channel();

        Self {
            event_sender,
            event_receiver,
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.event_sender.clone()
    }

    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.event_receiver.recv().await
    }

    /// Pump crossterm events into the channel. Runs until the receiver side
    /// goes away.
    pub async fn handle_terminal_events(sender: mpsc::UnboundedSender<AppEvent>) -> Result<()> {
        loop {
            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) => {
                        if key.kind == KeyEventKind::Press {
                            if let Some(app_event) = key_to_app_event(key) {
                                if sender.send(app_event).is_err() {
                                    return Ok(());
                                }
                            }
                        }
                    }
                    Event::Resize(_, _) => {
                        let _ = sender.send(AppEvent::Render);
                    }
                    _ => {}
                }
            }

            if sender.send(AppEvent::Tick).is_err() {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

fn key_to_app_event(key: KeyEvent) -> Option<AppEvent> {
    match key.code {
        KeyCode::Char(c) => Some(AppEvent::Char(c)),
        KeyCode::Up => Some(AppEvent::Up),
        KeyCode::Down => Some(AppEvent::Down),
        KeyCode::Left => Some(AppEvent::Left),
        KeyCode::Right => Some(AppEvent::Right),
        KeyCode::Enter => Some(AppEvent::Enter),
        KeyCode::Esc => Some(AppEvent::Escape),
        KeyCode::Backspace => Some(AppEvent::Backspace),
        _ => None,
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_printable_keys_pass_through_as_chars() {
        assert!(matches!(
            key_to_app_event(press(KeyCode::Char('q'))),
            Some(AppEvent::Char('q'))
        ));
        assert!(matches!(
            key_to_app_event(press(KeyCode::Char(' '))),
            Some(AppEvent::Char(' '))
        ));
    }

    #[test]
    fn test_unmapped_keys_are_dropped() {
        assert!(key_to_app_event(press(KeyCode::F(5))).is_none());
        assert!(key_to_app_event(press(KeyCode::Home)).is_none());
    }
}
