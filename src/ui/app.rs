use super::{AppEvent, EventHandler, TerminalManager};
use crate::audio::{AudioConfig, AudioPlayer, PlaybackState, Playlist};
use crate::config::Config;
use anyhow::Result;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::error;

/// What keyboard input currently means. Browse is the normal state; the
/// two edit modes capture printable characters into the add-entry form.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Browse,
    EditTitle,
    EditPath,
}

/// Whether a status message reports a failure or just narrates progress.
/// Failures render red; everything else stays calm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusKind {
    Info,
    Error,
}

struct StatusMessage {
    text: String,
    kind: StatusKind,
    shown_at: Instant,
}

pub struct App {
    config: Config,
    terminal: TerminalManager,
    event_handler: EventHandler,
    player: AudioPlayer,
    playlist: Playlist,

    // UI state
    mode: Mode,
    list_state: ListState,
    title_input: String,
    path_input: String,
    status: Option<StatusMessage>,
    show_history: bool,
    should_quit: bool,
}

impl App {
    pub async fn new(config: Config) -> Result<Self> {
        let terminal = TerminalManager::new()?;
        let event_handler = EventHandler::new();
        let player = AudioPlayer::new(AudioConfig::from(&config))?;

        Ok(Self {
            config,
            terminal,
            event_handler,
            player,
            playlist: Playlist::new(),
            mode: Mode::Browse,
            list_state: ListState::default(),
            title_input: String::new(),
            path_input: String::new(),
            status: None,
            show_history: false,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let sender = self.event_handler.sender();
        tokio::spawn(async move {
            let _ = EventHandler::handle_terminal_events(sender).await;
        });

        while !self.should_quit {
            let mode = self.mode.clone();
            let playlist = &self.playlist;
            let title_input = &self.title_input;
            let path_input = &self.path_input;
            let status = self.status.as_ref().map(|s| (s.text.clone(), s.kind));
            let show_history = self.show_history;
            let volume = self.player.volume();
            let playback_state = self.player.state();
            let mut list_state = self.list_state.clone();

            self.terminal.draw(|f| {
                Self::render_ui(
                    f,
                    &mode,
                    playlist,
                    title_input,
                    path_input,
                    status.as_ref().map(|(text, kind)| (text.as_str(), *kind)),
                    show_history,
                    volume,
                    playback_state,
                    &mut list_state,
                );
            })?;

            self.list_state = list_state;

            if let Some(event) = self.event_handler.next_event().await {
                self.handle_event(event)?;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => self.expire_status(),
            AppEvent::Render => {}
            _ => match self.mode {
                Mode::Browse => self.handle_browse_event(event)?,
                Mode::EditTitle | Mode::EditPath => self.handle_edit_event(event),
            },
        }

        Ok(())
    }

    fn handle_browse_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Char('q') => {
                self.player.stop();
                self.should_quit = true;
            }
            AppEvent::Escape => {
                if self.show_history {
                    self.show_history = false;
                } else {
                    self.player.stop();
                    self.should_quit = true;
                }
            }
            AppEvent::Char('a') => self.begin_add(),
            AppEvent::Char('d') => self.delete_selected(),
            AppEvent::Char('p') => self.play_current(),
            AppEvent::Char('s') => self.player.stop(),
            AppEvent::Char('n') | AppEvent::Right => self.next_entry(),
            AppEvent::Char('b') | AppEvent::Left => self.previous_entry(),
            AppEvent::Char('h') => self.show_history = !self.show_history,
            AppEvent::Char('+') | AppEvent::Char('=') => {
                let volume = (self.player.volume() + 0.1).min(1.0);
                self.player.set_volume(volume);
            }
            AppEvent::Char('-') => {
                let volume = (self.player.volume() - 0.1).max(0.0);
                self.player.set_volume(volume);
            }
            AppEvent::Up => self.move_selection(-1),
            AppEvent::Down => self.move_selection(1),
            _ => {}
        }

        Ok(())
    }

    fn handle_edit_event(&mut self, event: AppEvent) {
        let buffer = match self.mode {
            Mode::EditTitle => &mut self.title_input,
            _ => &mut self.path_input,
        };

        match event {
            AppEvent::Char(c) => buffer.push(c),
            AppEvent::Backspace => {
                buffer.pop();
            }
            AppEvent::Escape => {
                self.mode = Mode::Browse;
                self.title_input.clear();
                self.path_input.clear();
            }
            AppEvent::Enter => match self.mode {
                Mode::EditTitle => {
                    if self.title_input.trim().is_empty() {
                        self.set_status("Title cannot be empty", StatusKind::Error);
                    } else {
                        self.mode = Mode::EditPath;
                    }
                }
                _ => self.submit_add(),
            },
            _ => {}
        }
    }

    /// Open the add-entry form with the path field seeded from the
    /// configured music directory.
    fn begin_add(&mut self) {
        self.title_input.clear();
        self.path_input = format!("{}/", self.config.music_directory.display());
        self.mode = Mode::EditTitle;
    }

    fn submit_add(&mut self) {
        let title = self.title_input.trim().to_string();
        let path = PathBuf::from(self.path_input.trim());

        if self.playlist.add(title.clone(), path) {
            self.set_status(format!("Added '{}'", title), StatusKind::Info);
            self.title_input.clear();
            self.path_input.clear();
            self.mode = Mode::Browse;
            if self.list_state.selected().is_none() {
                self.list_state.select(Some(0));
            }
        } else {
            // Stay in the form so the path can be corrected
            self.set_status("File not found. Check the path.", StatusKind::Error);
        }
    }

    fn delete_selected(&mut self) {
        let Some(selected) = self.list_state.selected() else {
            self.set_status("No song selected", StatusKind::Error);
            return;
        };

        let titles = self.playlist.titles();
        let Some(title) = titles.get(selected) else {
            self.set_status("No song selected", StatusKind::Error);
            return;
        };

        if self.playlist.remove(title) {
            self.set_status(format!("Removed '{}'", title), StatusKind::Info);
            if self.playlist.is_empty() {
                self.list_state.select(None);
            } else if selected >= self.playlist.len() {
                self.list_state.select(Some(self.playlist.len() - 1));
            }
        }
    }

    fn play_current(&mut self) {
        let Some(location) = self.playlist.current_location().map(Path::to_path_buf) else {
            self.set_status("Playlist is empty", StatusKind::Error);
            return;
        };
        self.play_location(&location);
    }

    fn next_entry(&mut self) {
        if let Some(location) = self.playlist.advance_forward().map(Path::to_path_buf) {
            self.play_location(&location);
        }
    }

    fn previous_entry(&mut self) {
        if let Some(location) = self.playlist.advance_backward().map(Path::to_path_buf) {
            self.play_location(&location);
        }
    }

    /// Stop-load-play around whatever the playlist handed us. Playback
    /// failures only ever reach the status line; the playlist has already
    /// moved on and stays where it is.
    fn play_location(&mut self, location: &Path) {
        match self.player.play(location) {
            Ok(()) => {
                let title = self.playlist.current_title().unwrap_or("?").to_string();
                self.set_status(format!("Now playing: {}", title), StatusKind::Info);
            }
            Err(e) => {
                error!("playback failed: {}", e);
                self.set_status("Cannot play this file.", StatusKind::Error);
            }
        }
    }

    fn move_selection(&mut self, delta: i32) {
        if self.playlist.is_empty() {
            return;
        }

        let current = self.list_state.selected().unwrap_or(0);
        let new_index = if delta < 0 {
            current.saturating_sub((-delta) as usize)
        } else {
            (current + delta as usize).min(self.playlist.len() - 1)
        };

        self.list_state.select(Some(new_index));
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        });
    }

    fn expire_status(&mut self) {
        let ttl = Duration::from_millis(self.config.ui.status_message_ttl_ms);
        if self
            .status
            .as_ref()
            .map_or(false, |s| s.shown_at.elapsed() > ttl)
        {
            self.status = None;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render_ui(
        f: &mut Frame,
        mode: &Mode,
        playlist: &Playlist,
        title_input: &str,
        path_input: &str,
        status: Option<(&str, StatusKind)>,
        show_history: bool,
        volume: f32,
        playback_state: PlaybackState,
        list_state: &mut ListState,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Playlist
                Constraint::Length(1), // Status line
                Constraint::Length(3), // Player bar
            ])
            .split(f.area());

        Self::render_header(f, chunks[0]);
        Self::render_playlist(f, chunks[1], playlist, list_state);
        Self::render_status_line(f, chunks[2], status);
        Self::render_player_bar(f, chunks[3], playlist, volume, playback_state);

        if show_history {
            Self::render_history_popup(f, playlist);
        }

        if *mode != Mode::Browse {
            Self::render_add_popup(f, mode, title_input, path_input);
        }
    }

    fn render_header(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("mixtape - playlist manager")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));

        f.render_widget(title, area);
    }

    fn render_playlist(f: &mut Frame, area: Rect, playlist: &Playlist, list_state: &mut ListState) {
        let current_index = playlist.current_index();
        let items: Vec<ListItem> = playlist
            .titles()
            .into_iter()
            .enumerate()
            .map(|(i, title)| {
                let is_current = current_index == Some(i);
                let prefix = if is_current { "♪ " } else { "  " };

                let style = if is_current {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                ListItem::new(format!("{}{}", prefix, title)).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Playlist"))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▶ ");

        f.render_stateful_widget(list, area, list_state);
    }

    fn render_status_line(f: &mut Frame, area: Rect, status: Option<(&str, StatusKind)>) {
        let (text, style) = match status {
            Some((text, kind)) => (text, status_style(kind)),
            None => (
                "a add  d delete  p play  s stop  n/→ next  b/← prev  h history  q quit",
                Style::default().fg(Color::DarkGray),
            ),
        };

        f.render_widget(Paragraph::new(text).style(style), area);
    }

    fn render_player_bar(
        f: &mut Frame,
        area: Rect,
        playlist: &Playlist,
        volume: f32,
        playback_state: PlaybackState,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(60), // Current entry
                Constraint::Percentage(20), // Volume
                Constraint::Percentage(20), // Playback state
            ])
            .split(area);

        let info = match playlist.current_title() {
            Some(title) => format!("♪ {}", title),
            None => "Playlist is empty".to_string(),
        };
        let info_widget = Paragraph::new(info)
            .block(Block::default().borders(Borders::ALL).title("Current"));
        f.render_widget(info_widget, chunks[0]);

        let volume_widget = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Volume"))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(volume as f64);
        f.render_widget(volume_widget, chunks[1]);

        let state_text = match playback_state {
            PlaybackState::Playing => "▶ Playing",
            PlaybackState::Stopped => "⏹ Stopped",
        };
        let state_widget = Paragraph::new(state_text)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(state_widget, chunks[2]);
    }

    fn render_history_popup(f: &mut Frame, playlist: &Playlist) {
        let area = centered_rect(60, 60, f.area());
        f.render_widget(Clear, area);

        let history = playlist.history_log();
        let block = Block::default()
            .borders(Borders::ALL)
            .title("History (Esc to close)");

        if history.is_empty() {
            let empty = Paragraph::new("No songs have been played yet.")
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(empty, area);
        } else {
            let items: Vec<ListItem> = history
                .iter()
                .map(|title| ListItem::new(title.as_str()))
                .collect();
            f.render_widget(List::new(items).block(block), area);
        }
    }

    fn render_add_popup(f: &mut Frame, mode: &Mode, title_input: &str, path_input: &str) {
        let area = centered_rect(70, 30, f.area());
        f.render_widget(Clear, area);

        let outer = Block::default()
            .borders(Borders::ALL)
            .title("Add song (Enter to confirm, Esc to cancel)");
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let fields = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3)])
            .split(inner);

        let active = Style::default().fg(Color::Yellow);
        let inactive = Style::default().fg(Color::DarkGray);

        let title_field = Paragraph::new(title_input)
            .style(if *mode == Mode::EditTitle { active } else { inactive })
            .block(Block::default().borders(Borders::ALL).title("Title"));
        f.render_widget(title_field, fields[0]);

        let path_field = Paragraph::new(path_input)
            .style(if *mode == Mode::EditPath { active } else { inactive })
            .block(Block::default().borders(Borders::ALL).title("File path"));
        f.render_widget(path_field, fields[1]);
    }
}

fn status_style(kind: StatusKind) -> Style {
    match kind {
        StatusKind::Error => Style::default().fg(Color::Red),
        StatusKind::Info => Style::default().fg(Color::Green),
    }
}

/// Centered sub-rectangle, sized as a percentage of the full frame.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_failures_render_red() {
        assert_eq!(status_style(StatusKind::Error).fg, Some(Color::Red));
        assert_ne!(status_style(StatusKind::Info).fg, Some(Color::Red));
    }
}
