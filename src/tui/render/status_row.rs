use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::store::Persist;
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

const HINTS: &str = "^N new  ^T tab  ^W close  ^Q quit";

/// Render the bottom status row: close banner, or counts + key hints
pub fn render_status_row<P: Persist>(frame: &mut Frame, app: &App<P>, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let width = area.width as usize;

    if let Some(confirm) = app.close_confirm {
        let name = app
            .collection()
            .index_of(confirm.tab_id)
            .map(|i| app.collection().tabs()[i].name.as_str())
            .unwrap_or_default();
        let msg = format!(" Press ^W again to close \u{201C}{name}\u{201D}");
        let banner = Paragraph::new(Line::from(Span::styled(
            truncate_to_width(&msg, width),
            Style::default()
                .fg(theme.banner)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )))
        .style(Style::default().bg(bg));
        frame.render_widget(banner, area);
        return;
    }

    let tasks = app.tasks();
    let done = tasks.iter().filter(|t| t.is_done).count();
    let counts = format!(" {} open \u{00B7} {} done", tasks.len() - done, done);
    let counts_w = display_width(&counts);

    let mut spans = vec![Span::styled(counts, Style::default().fg(theme.text).bg(bg))];
    let hint_room = width.saturating_sub(counts_w + 3);
    if hint_room >= 8 {
        let hints = truncate_to_width(HINTS, hint_room);
        let pad = width.saturating_sub(counts_w + display_width(&hints) + 1);
        spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
        spans.push(Span::styled(hints, Style::default().fg(theme.dim).bg(bg)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}
