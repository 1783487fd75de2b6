use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use stories_core::sort::SortKey;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus, Target};
use crate::strings::{
    build_status_line, fit, header_label, help_lines_ascii, recall_label, LABEL_ACTIONS,
    LABEL_DISMISS, LABEL_LINK, LABEL_LAST_SEARCHES, LABEL_MORE, LABEL_SUBMIT, MSG_EMPTY, MSG_ERROR,
    MSG_LOADING, TITLE_APP, TITLE_HELP, TITLE_SEARCH, TITLE_STORIES,
};
use crate::theme::THEME;

const AUTHOR_W: u16 = 14;
const COMMENTS_W: u16 = 10;
const POINTS_W: u16 = 8;
const ACTION_W: u16 = 4;
// Below this much free width the link column is left out.
const LINK_MIN_FLEX: u16 = 40;

pub fn draw(f: &mut Frame, app: &mut App) {
    app.targets.clear();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());
    draw_search(f, chunks[0], app);
    draw_last_searches(f, chunks[1], app);
    draw_stories(f, chunks[2], app);
    draw_more(f, chunks[3], app);
    draw_status(f, chunks[4], app);
    if app.show_help {
        draw_help(f, f.area());
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(THEME.border_focus)
    } else {
        Style::default().fg(THEME.border_inactive)
    }
}

fn button_style() -> Style {
    Style::default()
        .fg(THEME.button_fg)
        .bg(THEME.button_bg)
        .add_modifier(Modifier::BOLD)
}

fn draw_search(f: &mut Frame, area: Rect, app: &mut App) {
    let focused = matches!(app.focus, Focus::Search);
    let mut block = Block::default()
        .title(Span::styled(
            TITLE_APP,
            Style::default()
                .fg(THEME.header_fg)
                .add_modifier(Modifier::BOLD),
        ))
        .title(TITLE_SEARCH)
        .borders(Borders::ALL)
        .border_style(border_style(focused));
    if let Some(n) = &app.notice {
        block = block.title_bottom(Span::styled(
            format!(" {} ", n),
            Style::default().fg(THEME.error_fg),
        ));
    }
    let inner = block.inner(area);
    f.render_widget(block, area);

    let submit = format!(" {} ", LABEL_SUBMIT);
    let submit_w = UnicodeWidthStr::width(submit.as_str()) as u16;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(4), Constraint::Length(submit_w + 1)])
        .split(inner);
    let input_area = cols[0];

    let before: String = app
        .input
        .graphemes(true)
        .take(app.input_cursor)
        .collect();
    let cursor_col = UnicodeWidthStr::width(before.as_str()) as u16;
    let offset = cursor_col.saturating_sub(input_area.width.saturating_sub(1));
    let para = Paragraph::new(app.input.as_str()).scroll((0, offset));
    f.render_widget(para, input_area);
    app.targets.push((input_area, Target::SearchBox));
    if focused && !app.show_help {
        f.set_cursor_position(Position::new(
            input_area.x + cursor_col - offset,
            input_area.y,
        ));
    }

    let button = Rect {
        x: cols[1].x + 1,
        width: submit_w.min(cols[1].width.saturating_sub(1)),
        ..cols[1]
    };
    f.render_widget(Paragraph::new(Span::styled(submit, button_style())), button);
    app.targets.push((button, Target::Submit));
}

fn draw_last_searches(f: &mut Frame, area: Rect, app: &mut App) {
    let mut spans = vec![Span::styled(
        LABEL_LAST_SEARCHES,
        Style::default().fg(THEME.muted_fg),
    )];
    let mut x = area.x + UnicodeWidthStr::width(LABEL_LAST_SEARCHES) as u16;
    let right = area.x + area.width;
    let terms: Vec<String> = app
        .controller
        .last_searches()
        .into_iter()
        .map(str::to_string)
        .collect();
    for (i, term) in terms.into_iter().enumerate() {
        let label = format!(" {} ", recall_label(i, &term));
        let w = UnicodeWidthStr::width(label.as_str()) as u16;
        if x + w > right {
            break;
        }
        app.targets.push((
            Rect::new(x, area.y, w, 1),
            Target::Recall(term),
        ));
        spans.push(Span::styled(label, button_style()));
        spans.push(Span::raw(" "));
        x += w + 1;
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Splits the width left over by the fixed columns into (title, link).
fn flex_widths(total: u16) -> (u16, u16) {
    let flex = total.saturating_sub(AUTHOR_W + COMMENTS_W + POINTS_W + ACTION_W);
    if flex >= LINK_MIN_FLEX {
        let link_w = flex * 2 / 5;
        (flex - link_w, link_w)
    } else {
        (flex.max(8), 0)
    }
}

fn draw_stories(f: &mut Frame, area: Rect, app: &mut App) {
    let focused = matches!(app.focus, Focus::List);
    let block = Block::default()
        .title(Span::styled(
            TITLE_STORIES,
            Style::default()
                .fg(THEME.header_fg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(border_style(focused));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let (title_w, link_w) = flex_widths(inner.width);
    let mut columns = vec![(Some(SortKey::Title), title_w)];
    if link_w > 0 {
        columns.push((None, link_w));
    }
    columns.extend([
        (Some(SortKey::Author), AUTHOR_W),
        (Some(SortKey::Comments), COMMENTS_W),
        (Some(SortKey::Points), POINTS_W),
    ]);

    let mut lines: Vec<Line> = Vec::new();
    let header_style = Style::default()
        .fg(THEME.header_fg)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let sort = app.controller.sort();
    let mut header = Vec::new();
    let mut x = inner.x;
    for (key, w) in columns {
        let cell = w.saturating_sub(1);
        match key {
            Some(key) => {
                app.targets.push((Rect::new(x, inner.y, cell, 1), Target::Sort(key)));
                header.push(Span::styled(fit(&header_label(key, sort), cell as usize), header_style));
            }
            None => header.push(Span::styled(
                fit(LABEL_LINK, cell as usize),
                Style::default().fg(THEME.muted_fg).add_modifier(Modifier::BOLD),
            )),
        }
        header.push(Span::raw(" "));
        x += w;
    }
    header.push(Span::styled(LABEL_ACTIONS, header_style));
    lines.push(Line::from(header));

    if app.controller.is_error() {
        lines.push(Line::from(Span::styled(
            MSG_ERROR,
            Style::default()
                .fg(THEME.error_fg)
                .add_modifier(Modifier::BOLD),
        )));
    }
    let total = app.controller.stories().len();
    if total == 0 {
        let msg = if app.controller.is_loading() {
            MSG_LOADING
        } else if app.controller.is_error() {
            ""
        } else {
            MSG_EMPTY
        };
        lines.push(Line::from(Span::styled(msg, Style::default().fg(THEME.muted_fg))));
    }

    let body_top = inner.y + lines.len() as u16;
    let viewport = inner.height.saturating_sub(lines.len() as u16) as usize;
    app.list_viewport = viewport;
    app.ensure_list_visible(viewport);
    let start = app.list_offset;

    let mut row_targets = Vec::new();
    for (row, (idx, s)) in app
        .controller
        .stories()
        .iter()
        .enumerate()
        .skip(start)
        .take(viewport)
        .enumerate()
    {
        let y = body_top + row as u16;
        let selected = idx == app.selected;
        let style = if selected && focused {
            Style::default()
                .fg(THEME.selected_fg)
                .bg(THEME.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let comments = format!("{:>w$}", s.num_comments, w = (COMMENTS_W - 2) as usize);
        let points = format!("{:>w$}", s.points, w = (POINTS_W - 2) as usize);
        let mut row = vec![
            Span::styled(fit(&s.title, title_w.saturating_sub(1) as usize), style),
            Span::styled(" ", style),
        ];
        if link_w > 0 {
            let url = s.url.as_deref().unwrap_or("-");
            let link_style = if selected { style } else { style.fg(THEME.muted_fg) };
            row.push(Span::styled(fit(url, (link_w - 1) as usize), link_style));
            row.push(Span::styled(" ", style));
        }
        row.extend([
            Span::styled(fit(&s.author, (AUTHOR_W - 1) as usize), style),
            Span::styled(" ", style),
            Span::styled(fit(&comments, (COMMENTS_W - 1) as usize), style),
            Span::styled(" ", style),
            Span::styled(fit(&points, (POINTS_W - 1) as usize), style),
            Span::styled(" ", style),
            Span::styled(LABEL_DISMISS, Style::default().fg(THEME.error_fg)),
        ]);
        lines.push(Line::from(row));
        let action_x = inner.x + title_w + link_w + AUTHOR_W + COMMENTS_W + POINTS_W;
        row_targets.push((
            Rect::new(action_x, y, LABEL_DISMISS.len() as u16, 1),
            Target::Dismiss(s.object_id.clone()),
        ));
        row_targets.push((Rect::new(inner.x, y, inner.width, 1), Target::Select(idx)));
    }
    app.targets.extend(row_targets);

    f.render_widget(Paragraph::new(lines), inner);

    if total > viewport && viewport > 0 {
        let mut sb_state = ScrollbarState::new(total).position(app.list_offset);
        let sb = Scrollbar::default().orientation(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(sb, inner, &mut sb_state);
    }
}

fn draw_more(f: &mut Frame, area: Rect, app: &mut App) {
    let mut spans = Vec::new();
    let mut x = area.x;
    if app.controller.has_more() && !app.controller.is_loading() {
        let label = format!(" {} ", LABEL_MORE);
        let w = UnicodeWidthStr::width(label.as_str()) as u16;
        app.targets.push((Rect::new(x, area.y, w, 1), Target::More));
        spans.push(Span::styled(label, button_style()));
        spans.push(Span::raw("  "));
        x += w + 2;
    } else if app.controller.is_loading() && !app.controller.stories().is_empty() {
        spans.push(Span::styled(MSG_LOADING, Style::default().fg(THEME.muted_fg)));
        spans.push(Span::raw("  "));
    }
    if let Some(s) = app.selected_story() {
        let url = s.url.as_deref().unwrap_or("-");
        let room = (area.x + area.width).saturating_sub(x) as usize;
        spans.push(Span::styled(
            fit(url, room),
            Style::default()
                .fg(THEME.border_focus)
                .add_modifier(Modifier::UNDERLINED),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let text = build_status_line(
        app.controller.active_term(),
        app.controller.stories().len(),
        app.controller.loaded_page(),
        app.status_label(),
        area.width,
    );
    f.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(THEME.muted_fg))),
        area,
    );
}

fn centered(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help = help_lines_ascii();
    let width = help
        .iter()
        .map(|l| UnicodeWidthStr::width(*l) as u16)
        .max()
        .unwrap_or(0)
        + 4;
    let popup = centered(area, width, help.len() as u16 + 2);
    let lines: Vec<Line> = help
        .iter()
        .map(|l| {
            if l.starts_with(' ') {
                Line::from(*l)
            } else {
                Line::from(Span::styled(
                    *l,
                    Style::default()
                        .fg(THEME.header_fg)
                        .add_modifier(Modifier::BOLD),
                ))
            }
        })
        .collect();
    let block = Block::default()
        .title(TITLE_HELP)
        .borders(Borders::ALL)
        .border_style(border_style(true));
    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}
