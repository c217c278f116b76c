use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::store::Persist;
use crate::tui::app::{App, RowHit};
use crate::util::unicode::{display_width, truncate_to_width};

const TOGGLE_GLYPH: &str = "\u{2713}";
const UNDO_GLYPH: &str = "\u{21BA}";
const DELETE_GLYPH: &str = "\u{2715}";
/// Cells reserved on the right for " ✓ ✕ "
const GLYPH_CELLS: usize = 5;

/// Keep `selected` inside the visible window of `height` rows
fn adjust_scroll(scroll: usize, selected: Option<usize>, height: usize, len: usize) -> usize {
    let max_scroll = len.saturating_sub(height);
    let mut scroll = scroll.min(max_scroll);
    if let Some(idx) = selected {
        if idx < scroll {
            scroll = idx;
        } else if height > 0 && idx >= scroll + height {
            scroll = idx + 1 - height;
        }
    }
    scroll
}

pub fn render_task_list<P: Persist>(frame: &mut Frame, app: &mut App<P>, area: Rect) {
    let height = area.height as usize;
    let width = area.width as usize;
    let tasks = app.store.tasks();

    if tasks.is_empty() {
        let line = Line::from(Span::styled(
            "   Nothing to do",
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        ));
        frame.render_widget(Paragraph::new(line), area);
        app.hit_map.rows.clear();
        app.list_scroll = 0;
        return;
    }

    let selected_idx = app
        .selection
        .and_then(|id| tasks.iter().position(|t| t.id == id));
    let scroll = adjust_scroll(app.list_scroll, selected_idx, height, tasks.len());
    let dragging = app.drag.map(|d| d.task_id);

    let theme = &app.theme;
    let mut lines: Vec<Line> = Vec::new();
    let mut hits: Vec<RowHit> = Vec::new();

    for (row, task) in tasks.iter().skip(scroll).take(height).enumerate() {
        let is_selected = app.selection == Some(task.id);
        let show_glyphs = is_selected || app.hover == Some(task.id);
        let bg = if is_selected || dragging == Some(task.id) {
            theme.selection_bg
        } else {
            theme.background
        };
        let bg_style = Style::default().bg(bg);

        let marker = if dragging == Some(task.id) {
            "\u{2261}"
        } else if is_selected {
            "\u{203A}"
        } else {
            " "
        };
        let mut spans = vec![
            Span::styled(" ", bg_style),
            Span::styled(marker, Style::default().fg(theme.accent).bg(bg)),
            Span::styled(" ", bg_style),
        ];

        let title_room = width.saturating_sub(3 + GLYPH_CELLS);
        let title = truncate_to_width(&task.title, title_room);
        let title_style = if task.is_done {
            Style::default()
                .fg(theme.done)
                .bg(bg)
                .add_modifier(Modifier::CROSSED_OUT)
        } else if is_selected {
            Style::default().fg(theme.text_bright).bg(bg)
        } else {
            Style::default().fg(theme.text).bg(bg)
        };
        let title_w = display_width(&title);
        spans.push(Span::styled(title, title_style));

        let y = area.y + row as u16;
        let mut hit = RowHit {
            area: Rect::new(area.x, y, area.width, 1),
            task_id: task.id,
            toggle_col: None,
            delete_col: None,
        };

        // Pad to the glyph column
        let pad = width.saturating_sub(3 + title_w + GLYPH_CELLS);
        spans.push(Span::styled(" ".repeat(pad), bg_style));
        if show_glyphs && width >= 3 + GLYPH_CELLS {
            let glyph_x = area.x + (3 + title_w + pad) as u16;
            let toggle = if task.is_done { UNDO_GLYPH } else { TOGGLE_GLYPH };
            spans.push(Span::styled(" ", bg_style));
            spans.push(Span::styled(toggle, Style::default().fg(theme.accent).bg(bg)));
            spans.push(Span::styled(" ", bg_style));
            spans.push(Span::styled(DELETE_GLYPH, Style::default().fg(theme.dim).bg(bg)));
            spans.push(Span::styled(" ", bg_style));
            hit.toggle_col = Some(glyph_x + 1);
            hit.delete_col = Some(glyph_x + 3);
        } else {
            spans.push(Span::styled(" ".repeat(GLYPH_CELLS), bg_style));
        }

        lines.push(Line::from(spans));
        hits.push(hit);
    }

    let list = Paragraph::new(lines).style(Style::default().bg(theme.background));
    frame.render_widget(list, area);
    app.list_scroll = scroll;
    app.hit_map.rows = hits;
}
