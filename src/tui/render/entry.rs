use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::store::Persist;
use crate::tui::app::App;
use crate::util::unicode::display_width;

const PROMPT: &str = " + ";
const PLACEHOLDER: &str = "New task";

/// Render the new-task field on the first row of `area`
pub fn render_entry<P: Persist>(frame: &mut Frame, app: &mut App<P>, area: Rect) {
    if area.height == 0 {
        return;
    }
    let row = Rect { height: 1, ..area };
    let theme = &app.theme;
    let bg = theme.background;

    let prompt_color = if app.input_focused { theme.accent } else { theme.dim };
    let mut spans = vec![Span::styled(PROMPT, Style::default().fg(prompt_color).bg(bg))];

    let prompt_w = display_width(PROMPT);
    let avail = (row.width as usize).saturating_sub(prompt_w + 1);
    // Scroll horizontally so the cursor stays visible
    let cursor_col = app.draft.cursor_col();
    let h_scroll = cursor_col.saturating_sub(avail);

    if app.draft.text.is_empty() {
        spans.push(Span::styled(PLACEHOLDER, Style::default().fg(theme.dim).bg(bg)));
    } else {
        let visible: String = skip_cells(&app.draft.text, h_scroll);
        spans.push(Span::styled(visible, Style::default().fg(theme.text).bg(bg)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)), row);

    if app.input_focused {
        let x = row.x + (prompt_w + cursor_col - h_scroll) as u16;
        frame.set_cursor_position(Position::new(x.min(row.right().saturating_sub(1)), row.y));
    }
    app.hit_map.entry = Some(row);
}

/// Drop the first `cells` display columns of `s`
fn skip_cells(s: &str, cells: usize) -> String {
    let mut skipped = 0;
    s.chars()
        .skip_while(|c| {
            let w = unicode_width::UnicodeWidthChar::width(*c).unwrap_or(0);
            if skipped + w <= cells && skipped < cells {
                skipped += w;
                true
            } else {
                false
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn placeholder_when_empty() {
        let mut app = app_with_tasks(&[]);
        let out = render_to_string(TERM_W, 1, |frame, area| render_entry(frame, &mut app, area));
        assert_eq!(out, " + New task");
    }

    #[test]
    fn shows_draft() {
        let mut app = app_with_tasks(&[]);
        app.draft.insert_str("call mom");
        let out = render_to_string(TERM_W, 1, |frame, area| render_entry(frame, &mut app, area));
        assert_eq!(out, " + call mom");
    }

    #[test]
    fn long_draft_scrolls_to_cursor() {
        let mut app = app_with_tasks(&[]);
        app.draft.insert_str("abcdefghijklmnopqrstuvwxyz");
        let out = render_to_string(16, 1, |frame, area| render_entry(frame, &mut app, area));
        assert!(out.ends_with("xyz"));
        assert!(!out.contains("abc"));
    }

    #[test]
    fn skip_cells_counts_wide_chars() {
        assert_eq!(skip_cells("日本語", 2), "本語");
        assert_eq!(skip_cells("abc", 0), "abc");
        assert_eq!(skip_cells("abc", 5), "");
    }
}
