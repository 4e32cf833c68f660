use ratatui::{prelude::*, widgets::*};

fn key_line(key: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::from(key).light_cyan().bold(),
        Span::raw(" : "),
        Span::raw(action),
    ])
}

/// Key bindings popup for the selected tab, centered over `area`
pub fn render_help(area: Rect, buf: &mut Buffer, selected_tab: usize) {
    let mut lines = vec![
        key_line("  q  ", "Exit the dashboard"),
        key_line("  h  ", "Toggle this help"),
        key_line(" Tab ", "Switch tabs"),
    ];

    match selected_tab {
        0 => lines.push(key_line("⬅ / ➡", "Switch plots")),
        2 => lines.extend([
            key_line("  s  ", "Show or hide the target selector"),
            key_line("  f  ", "Focus on the selected target only"),
            key_line("⬆ / ⬇", "Select log target"),
            key_line("⬅ / ➡", "Show one level less or more"),
            key_line("- / +", "Capture one level less or more"),
            key_line("PgUp ", "Page mode, scroll up"),
            key_line("PgDn ", "Page mode, scroll down"),
            key_line(" Esc ", "Leave page mode"),
            key_line("Space", "Hide targets whose filter is off"),
        ]),
        _ => {}
    }

    let [_, center_vert, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(lines.len() as u16 + 4),
        Constraint::Fill(1),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(60),
        Constraint::Fill(1),
    ])
    .areas(center_vert);

    Clear.render(center, buf);

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .padding(Padding::proportional(1))
                .title("Help"),
        )
        .wrap(Wrap { trim: false })
        .render(center, buf);
}
