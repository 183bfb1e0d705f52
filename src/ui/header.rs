//! Header: client identity and the active mailbox line.

use super::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

pub fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "DRIFTMAIL",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" v{}", env!("CARGO_PKG_VERSION"))),
        Span::styled(
            format!("  [{}]", app.environment()),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    f.render_widget(title, rows[0]);

    let t = app.translator();
    let mailbox_line = match app.session().current() {
        Some(mailbox) => {
            let remaining = mailbox.remaining_secs(app.session().now());
            Line::from(vec![
                Span::styled(
                    format!("{}@{}", mailbox.address, app.mail_domain()),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        "  {} {}",
                        t.t("mailbox.expiresIn", "expires in"),
                        format_remaining(remaining)
                    ),
                    Style::default().fg(Color::Yellow),
                ),
            ])
        }
        None => Line::from(Span::styled(
            t.t("mailbox.provisioning", "Requesting a new address..."),
            Style::default().fg(Color::Yellow),
        )),
    };
    f.render_widget(Paragraph::new(mailbox_line), rows[1]);
}

/// Short countdown such as "1h 05m" or "9m 30s".
fn format_remaining(secs: i64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_picks_the_right_scale() {
        assert_eq!(format_remaining(0), "0s");
        assert_eq!(format_remaining(59), "59s");
        assert_eq!(format_remaining(570), "9m 30s");
        assert_eq!(format_remaining(3_900), "1h 05m");
    }
}
