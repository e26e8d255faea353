//! Full-screen drawers that do not show the playfield.

use super::centered;
use crate::protocol::HighScores;
use crate::state::Link;
use crate::theme::Palette;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const MENU_INSTRUCTIONS: [&str; 5] = [
    "Joystick: Move Snake",
    "Start Button: Begin Game",
    "Reset Button: Restart",
    "S: Toggle Sound",
    "P: Pause/Resume",
];

pub(super) fn draw_waiting(f: &mut Frame, area: Rect, link: &Link, frame: u64, palette: &Palette) {
    let mut lines = vec![
        Line::from(Span::styled("Waiting for Arduino...", Style::default().fg(palette.foreground))),
        Line::from(""),
    ];

    match link {
        Link::Connected(port) => {
            lines.push(Line::from(Span::styled(
                format!("Connected to: {port}"),
                Style::default().fg(palette.snake_head),
            )));
            // Activity spinner.
            let spinner = ["|", "/", "-", "\\"][((frame / 10) % 4) as usize];
            lines.push(Line::from(Span::styled(spinner, Style::default().fg(palette.grid))));
        }
        Link::Offline { requested, available } => {
            lines.push(Line::from(Span::styled(
                "No serial connection",
                Style::default().fg(palette.alert).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!("Could not open {requested}")));
            let ports = if available.is_empty() {
                "No serial ports found".to_string()
            } else {
                format!("Available ports: {}", available.join(", "))
            };
            lines.push(Line::from(Span::styled(ports, Style::default().fg(palette.grid))));
        }
    }

    draw_centered(f, area, lines);
}

pub(super) fn draw_menu(f: &mut Frame, area: Rect, palette: &Palette) {
    let mut lines = vec![
        Line::from(Span::styled(
            "ENHANCED SNAKE GAME",
            Style::default().fg(palette.snake_head).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(
        MENU_INSTRUCTIONS
            .iter()
            .map(|text| Line::from(Span::styled(*text, Style::default().fg(palette.foreground)))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press START to begin!",
        Style::default().fg(palette.highlight),
    )));

    draw_centered(f, area, lines);
}

pub(super) fn draw_high_scores(f: &mut Frame, area: Rect, scores: &HighScores, palette: &Palette) {
    let mut lines = vec![
        Line::from(Span::styled(
            "HIGH SCORE",
            Style::default().fg(palette.highlight).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let value = Style::default().fg(palette.foreground);
    if let Some(high) = scores.high_score {
        lines.push(Line::from(Span::styled(
            format!("{high}"),
            Style::default().fg(palette.highlight).add_modifier(Modifier::BOLD),
        )));
    }
    if let Some(score) = scores.score {
        lines.push(Line::from(Span::styled(format!("Last Score: {score}"), value)));
    }
    if let Some(level) = scores.level {
        lines.push(Line::from(Span::styled(format!("Level Reached: {level}"), value)));
    }
    if scores.is_empty() {
        lines.push(Line::from(Span::styled("No scores yet", Style::default().fg(palette.grid))));
    }

    draw_centered(f, area, lines);
}

fn draw_centered(f: &mut Frame, area: Rect, lines: Vec<Line<'_>>) {
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let target = centered(area, area.width, height);
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_util::buffer_text;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(draw: impl FnOnce(&mut Frame, Rect)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                draw(f, area);
            })
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_waiting_connected() {
        let palette = Palette::default();
        let link = Link::Connected("COM3".to_string());
        let text = render(|f, area| draw_waiting(f, area, &link, 0, &palette));

        assert!(text.contains("Waiting for Arduino..."));
        assert!(text.contains("Connected to: COM3"));
        assert!(!text.contains("No serial connection"));
    }

    #[test]
    fn test_waiting_offline_without_ports() {
        let palette = Palette::default();
        let link = Link::Offline { requested: "/dev/ttyACM0".to_string(), available: vec![] };
        let text = render(|f, area| draw_waiting(f, area, &link, 0, &palette));

        assert!(text.contains("No serial connection"));
        assert!(text.contains("Could not open /dev/ttyACM0"));
        assert!(text.contains("No serial ports found"));
    }

    #[test]
    fn test_menu_lists_instructions() {
        let palette = Palette::default();
        let text = render(|f, area| draw_menu(f, area, &palette));

        assert!(text.contains("ENHANCED SNAKE GAME"));
        for instruction in MENU_INSTRUCTIONS {
            assert!(text.contains(instruction), "missing {instruction}");
        }
    }

    #[test]
    fn test_high_scores_show_present_fields_only() {
        let palette = Palette::default();
        let scores = HighScores { score: Some(30), high_score: None, level: Some(3) };
        let text = render(|f, area| draw_high_scores(f, area, &scores, &palette));

        assert!(text.contains("Last Score: 30"));
        assert!(text.contains("Level Reached: 3"));
        assert!(!text.contains("No scores yet"));
    }

    #[test]
    fn test_high_scores_empty() {
        let palette = Palette::default();
        let text = render(|f, area| draw_high_scores(f, area, &HighScores::default(), &palette));
        assert!(text.contains("No scores yet"));
    }
}
