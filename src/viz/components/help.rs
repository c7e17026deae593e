use ratatui::{prelude::*, widgets::*};

use super::log::BINDINGS;

fn key<'a>(key: &'a str, action: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::from(format!("{key:^7}")).light_cyan().bold(),
        Span::raw(" : "),
        Span::raw(action),
    ])
}

/// Draw the key bindings for `selected_tab` in a popup over `area`
pub fn render_help(area: Rect, buf: &mut Buffer, selected_tab: usize) {
    let mut lines = vec![
        key("q", "Stop training and exit"),
        key("h", "Toggle this help"),
        key("Tab", "Switch tabs"),
    ];

    match selected_tab {
        0 => lines.push(key("⬅ / ➡", "Show the policy of another agent")),
        1 => lines.push(key("⬅ / ➡", "Switch plots")),
        2 => lines.extend(BINDINGS.iter().map(|&(k, action)| key(k, action))),
        _ => {}
    }

    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(lines.len() as u16 + 4),
        Constraint::Fill(1),
    ])
    .areas(area);

    let [_, popup, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(60),
        Constraint::Fill(1),
    ])
    .areas(middle);

    Clear.render(popup, buf);

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .padding(Padding::horizontal(1))
                .title("Help"),
        )
        .render(popup, buf);
}
