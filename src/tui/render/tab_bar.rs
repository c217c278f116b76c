use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::store::Persist;
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

/// Longest tab label before it gets an ellipsis
const MAX_TAB_CELLS: usize = 18;

/// Render the tab bar: one tab per name, with separator line below
pub fn render_tab_bar<P: Persist>(frame: &mut Frame, app: &mut App<P>, area: Rect) {
    // Split into tab row and separator row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs, record their hit regions, and return the column of each
/// separator character.
fn render_tabs<P: Persist>(frame: &mut Frame, app: &mut App<P>, area: Rect) -> Vec<usize> {
    let theme = &app.theme;
    let bg_style = Style::default().bg(theme.background);
    let sep = Span::styled("\u{2502}", Style::default().fg(theme.dim).bg(theme.background));

    let mut spans: Vec<Span> = vec![Span::styled(" ", bg_style)];
    let mut sep_cols: Vec<usize> = Vec::new();
    let mut hits = Vec::new();
    let mut col = 1usize;
    let width = area.width as usize;

    let collection = app.store.collection();
    let selected = collection.selected_tab_id();
    for tab in collection.tabs() {
        let label = format!(" {} ", truncate_to_width(&tab.name, MAX_TAB_CELLS));
        let label_w = display_width(&label);
        if col + label_w > width {
            // Overflow marker
            if col < width {
                spans.push(Span::styled("\u{2026}", Style::default().fg(theme.dim).bg(theme.background)));
            }
            break;
        }
        hits.push((
            Rect::new(area.x + col as u16, area.y, label_w as u16, 1),
            tab.id,
        ));
        spans.push(Span::styled(label, tab_style(app, tab.id == selected)));
        col += label_w;
        sep_cols.push(col);
        spans.push(sep.clone());
        col += 1;
    }

    let tabs = Paragraph::new(Line::from(spans)).style(bg_style);
    frame.render_widget(tabs, area);
    app.hit_map.tabs = hits;
    sep_cols
}

fn render_separator<P: Persist>(frame: &mut Frame, app: &App<P>, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let line: String = (0..width)
        .map(|i| if sep_cols.contains(&i) { '\u{2534}' } else { '\u{2500}' })
        .collect();
    let sep = Paragraph::new(line).style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(sep, area);
}

fn tab_style<P: Persist>(app: &App<P>, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    }
}
