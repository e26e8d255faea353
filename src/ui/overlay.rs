//! Pause and game-over overlays drawn over the playfield.

use super::centered;
use crate::protocol::Hud;
use crate::theme::Palette;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const POPUP_WIDTH: u16 = 36;

pub(super) fn draw_paused(f: &mut Frame, area: Rect, palette: &Palette) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "PAUSED",
            Style::default().fg(palette.highlight).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Press START or P to resume", Style::default().fg(palette.foreground))),
    ];
    draw_popup(f, area, lines, palette.highlight, palette);
}

pub(super) fn draw_game_over(f: &mut Frame, area: Rect, hud: &Hud, palette: &Palette) {
    let high_score = if hud.is_new_high_score() {
        Span::styled(
            "NEW HIGH SCORE!",
            Style::default().fg(palette.highlight).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!("High Score: {}", hud.high_score), Style::default().fg(palette.foreground))
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "GAME OVER",
            Style::default().fg(palette.alert).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(format!("Final Score: {}", hud.score), Style::default().fg(palette.foreground))),
        Line::from(high_score),
        Line::from(""),
        Line::from(Span::styled("Press START or R to restart", Style::default().fg(palette.foreground))),
    ];
    draw_popup(f, area, lines, palette.alert, palette);
}

/// Dims `area`, then draws a bordered box with centred lines.
fn draw_popup(
    f: &mut Frame,
    area: Rect,
    lines: Vec<Line<'_>>,
    border: ratatui::style::Color,
    palette: &Palette,
) {
    f.buffer_mut().set_style(area, Style::default().add_modifier(Modifier::DIM));

    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(3);
    let popup_area = centered(area, POPUP_WIDTH, height);
    f.render_widget(Clear, popup_area);

    let popup = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(palette.background)),
    );
    f.render_widget(popup, popup_area);
}
