//! Playfield and score line.

use super::RenderSettings;
use crate::protocol::{Board, Direction as Heading, Hud, Point};
use crate::theme::Palette;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Terminal columns per grid cell.
const CELL_WIDTH: u16 = 2;

const GRID_DOT: &str = " ·";
const BODY: &str = "▓▓";
const FOOD: [&str; 2] = ["()", "<>"];
/// Frames per food glyph.
const FOOD_PULSE_FRAMES: u64 = 15;

pub(super) fn draw_board(f: &mut Frame, area: Rect, board: &Board, frame: u64, settings: &RenderSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    draw_hud(f, chunks[0], &board.hud, &settings.palette);

    let field = playfield_area(chunks[1], settings);
    let palette = &settings.palette;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.grid))
        .title(Span::styled(" SNAKE ", Style::default().fg(palette.snake_head)));
    let inner = block.inner(field);
    f.render_widget(block, field);

    let grid = Grid { inner, width: settings.grid_width, height: settings.grid_height };
    let buf = f.buffer_mut();

    let dot = Style::default().fg(palette.grid);
    for gy in 0..settings.grid_height {
        for gx in 0..settings.grid_width {
            grid.put(buf, Point::new(i32::from(gx), i32::from(gy)), GRID_DOT, dot);
        }
    }

    let pulse = FOOD[((frame / FOOD_PULSE_FRAMES) % 2) as usize];
    grid.put(buf, board.food, pulse, Style::default().fg(palette.food).add_modifier(Modifier::BOLD));

    // Draw tail first so the head wins if segments overlap.
    for (i, segment) in board.snake.iter().enumerate().rev() {
        if i == 0 {
            let head = head_glyph(board.hud.direction);
            grid.put(buf, *segment, head, Style::default().fg(palette.snake_head));
        } else {
            grid.put(buf, *segment, BODY, Style::default().fg(palette.body_segment(i)));
        }
    }
}

/// Head cell facing the direction of travel.
fn head_glyph(direction: Heading) -> &'static str {
    match direction {
        Heading::Right => "█▶",
        Heading::Up => "▲▲",
        Heading::Left => "◀█",
        Heading::Down => "▼▼",
    }
}

/// Heading first so it survives clipping on narrow terminals.
fn draw_hud(f: &mut Frame, area: Rect, hud: &Hud, palette: &Palette) {
    let text = Style::default().fg(palette.foreground);
    let line = Line::from(vec![
        Span::styled(format!(" {}", hud.direction.glyph()), text.add_modifier(Modifier::BOLD)),
        Span::styled(format!("  Score: {}", hud.score), text),
        Span::styled(format!("   High: {}", hud.high_score), Style::default().fg(palette.highlight)),
        Span::styled(format!("   Level: {}", hud.level), Style::default().fg(palette.level)),
        Span::styled(format!("   Lives: {}", hud.lives), Style::default().fg(palette.alert)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Bordered playfield rectangle, centred horizontally in `area`.
fn playfield_area(area: Rect, settings: &RenderSettings) -> Rect {
    let width = settings.grid_width.saturating_mul(CELL_WIDTH).saturating_add(2);
    let height = settings.grid_height.saturating_add(2);
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: height.min(area.height),
    }
}

/// Maps grid cells into a buffer region, clipping anything outside.
struct Grid {
    inner: Rect,
    width: u16,
    height: u16,
}

impl Grid {
    /// Top-left terminal position of a cell, if the whole cell is visible.
    fn position(&self, point: Point) -> Option<(u16, u16)> {
        let gx = u16::try_from(point.x).ok().filter(|&x| x < self.width)?;
        let gy = u16::try_from(point.y).ok().filter(|&y| y < self.height)?;
        let x = self.inner.x.checked_add(gx.checked_mul(CELL_WIDTH)?)?;
        let y = self.inner.y.checked_add(gy)?;
        let fits = x.checked_add(CELL_WIDTH)? <= self.inner.right() && y < self.inner.bottom();
        fits.then_some((x, y))
    }

    fn put(&self, buf: &mut Buffer, point: Point, symbol: &str, style: Style) {
        if let Some((x, y)) = self.position(point) {
            buf.set_string(x, y, symbol, style);
        }
    }
}
