//! Frame rendering.
//!
//! [`draw`] picks exactly one drawer for the current [`DisplayState`] and
//! adds the footer. Drawers write into the frame buffer and never touch
//! anything outside it.
//!
//! [`DisplayState`]: crate::state::DisplayState

mod board;
mod overlay;
mod screens;

use crate::config::Config;
use crate::protocol::{Command, Snapshot};
use crate::state::{Link, State};
use crate::theme::Palette;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

/// Settings the drawers need, resolved once from [`Config`].
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    /// Playfield columns.
    pub grid_width: u16,
    /// Playfield rows.
    pub grid_height: u16,
    /// Colours.
    pub palette: Palette,
}

impl RenderSettings {
    /// Resolves display settings and colours from the configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            grid_width: config.display.grid_width,
            grid_height: config.display.grid_height,
            palette: config.theme.palette(),
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Main draw function
pub fn draw(f: &mut Frame, state: &State, settings: &RenderSettings) {
    let area = f.area();
    let palette = &settings.palette;

    f.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.foreground)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let body = chunks[0];

    match state.display.current() {
        None => screens::draw_waiting(f, body, &state.link, state.frame, palette),
        Some(Snapshot::Menu) => screens::draw_menu(f, body, palette),
        Some(Snapshot::Playing(board)) => board::draw_board(f, body, board, state.frame, settings),
        Some(Snapshot::Paused(board)) => {
            board::draw_board(f, body, board, state.frame, settings);
            overlay::draw_paused(f, body, palette);
        }
        Some(Snapshot::GameOver(board)) => {
            board::draw_board(f, body, board, state.frame, settings);
            overlay::draw_game_over(f, body, &board.hud, palette);
        }
        Some(Snapshot::HighScoreScreen(scores)) => {
            screens::draw_high_scores(f, body, scores, palette);
        }
    }

    draw_footer(f, chunks[1], &state.link, palette);
}

fn draw_footer(f: &mut Frame, area: Rect, link: &Link, palette: &Palette) {
    let key = Style::default().fg(palette.highlight);
    let text = Style::default().fg(palette.foreground);

    let mut spans = Vec::new();
    for command in Command::ALL {
        spans.push(Span::styled(format!(" {}", char::from(command.as_byte())), key));
        spans.push(Span::styled(format!(" {} ", command.label()), text));
    }
    spans.push(Span::styled(" q", key));
    spans.push(Span::styled(" quit ", text));

    let status = match link {
        Link::Connected(port) => Span::styled(format!(" ● {port}"), Style::default().fg(palette.snake_head)),
        Link::Offline { .. } => Span::styled(" ○ offline", Style::default().fg(palette.alert)),
    };
    spans.push(status);

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// A `width` x `height` rectangle centred in `area`, shrunk to fit.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use ratatui::buffer::Buffer;

    /// Buffer rows as strings, trailing whitespace trimmed.
    pub(crate) fn buffer_lines(buffer: &Buffer) -> Vec<String> {
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                let mut line = String::with_capacity(area.width as usize);
                for x in 0..area.width {
                    if let Some(cell) = buffer.cell((x, y)) {
                        line.push_str(cell.symbol());
                    }
                }
                line.trim_end().to_string()
            })
            .collect()
    }

    /// Whole buffer as one newline-joined string.
    pub(crate) fn buffer_text(buffer: &Buffer) -> String {
        buffer_lines(buffer).join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::buffer_text;
    use super::*;
    use crate::protocol::{Board, Direction as Heading, HighScores, Hud, Point};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(state: &State, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        let settings = RenderSettings::default();
        terminal.draw(|f| draw(f, state, &settings)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn board(score: i64, high_score: i64) -> Board {
        Board {
            snake: vec![Point::new(5, 5), Point::new(4, 5)],
            food: Point::new(10, 10),
            hud: Hud { score, high_score, level: 2, lives: 3, direction: Heading::Right },
        }
    }

    fn connected() -> State {
        State::new(Link::Connected("/dev/ttyACM0".to_string()))
    }

    #[test]
    fn test_no_data_shows_waiting_screen() {
        let text = render(&connected(), 90, 30);
        assert!(text.contains("Waiting for Arduino..."));
        assert!(text.contains("Connected to: /dev/ttyACM0"));
    }

    #[test]
    fn test_offline_waiting_screen_lists_ports() {
        let state = State::new(Link::Offline {
            requested: "COM3".to_string(),
            available: vec!["COM4".to_string(), "COM5".to_string()],
        });
        let text = render(&state, 90, 30);
        assert!(text.contains("No serial connection"));
        assert!(text.contains("COM4, COM5"));
        assert!(text.contains("offline"));
    }

    #[test]
    fn test_menu_screen() {
        let mut state = connected();
        state.ingest(vec![Snapshot::Menu]);
        let text = render(&state, 90, 30);
        assert!(text.contains("ENHANCED SNAKE GAME"));
        assert!(text.contains("Press START to begin!"));
    }

    #[test]
    fn test_playing_screen_has_hud() {
        let mut state = connected();
        state.ingest(vec![Snapshot::Playing(board(3, 10))]);
        let text = render(&state, 90, 30);
        assert!(text.contains("Score: 3"));
        assert!(text.contains("High: 10"));
        assert!(text.contains("Level: 2"));
        assert!(text.contains("Lives: 3"));
        assert!(text.contains('→'));
        assert!(!text.contains("PAUSED"));
    }

    #[test]
    fn test_paused_screen_has_overlay() {
        let mut state = connected();
        state.ingest(vec![Snapshot::Paused(board(3, 10))]);
        let text = render(&state, 90, 30);
        assert!(text.contains("PAUSED"));
        assert!(text.contains("Press START or P to resume"));
    }

    #[test]
    fn test_game_over_new_high_score() {
        let mut state = connected();
        state.ingest(vec![Snapshot::GameOver(board(50, 50))]);
        let text = render(&state, 90, 30);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("Final Score: 50"));
        assert!(text.contains("NEW HIGH SCORE!"));
        assert!(!text.contains("High Score:"));
    }

    #[test]
    fn test_game_over_below_high_score() {
        let mut state = connected();
        state.ingest(vec![Snapshot::GameOver(board(49, 50))]);
        let text = render(&state, 90, 30);
        assert!(text.contains("High Score: 50"));
        assert!(!text.contains("NEW HIGH SCORE!"));
        assert!(text.contains("Press START or R to restart"));
    }

    #[test]
    fn test_high_score_screen() {
        let mut state = connected();
        state.ingest(vec![Snapshot::HighScoreScreen(HighScores {
            score: None,
            high_score: Some(120),
            level: Some(4),
        })]);
        let text = render(&state, 90, 30);
        assert!(text.contains("HIGH SCORE"));
        assert!(text.contains("120"));
        assert!(!text.contains("Last Score"));
    }

    #[test]
    fn test_footer_key_hints() {
        let text = render(&connected(), 90, 30);
        let footer = text.lines().last().unwrap_or_default().to_string();
        assert!(footer.contains("s sound"));
        assert!(footer.contains("r reset"));
        assert!(footer.contains("p pause"));
        assert!(footer.contains("q quit"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut state = connected();
        state.ingest(vec![Snapshot::GameOver(board(50, 50))]);
        let _ = render(&state, 8, 3);
        let _ = render(&state, 1, 1);
    }

    #[test]
    fn test_non_ascii_theme_colour_does_not_panic() {
        let config = Config::parse("theme:\n  food: '#1é234'\n").unwrap();
        let settings = RenderSettings::from_config(&config);
        assert_eq!(settings.palette.food, ratatui::style::Color::White);
    }

    #[test]
    fn test_centered() {
        let area = Rect::new(10, 5, 40, 20);
        assert_eq!(centered(area, 20, 10), Rect::new(20, 10, 20, 10));
        assert_eq!(centered(area, 100, 100), area);
    }
}
