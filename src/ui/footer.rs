//! Footer: copyright line and the navigation links shown on every view.

use crate::i18n::Translator;
use crate::route::Route;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};

#[derive(Debug, Default)]
pub struct Footer {
    /// Where each link was last drawn, for mapping clicks to routes.
    link_areas: Vec<(Rect, Route)>,
}

impl Footer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The route under the given screen position, if a link is there.
    pub fn route_at(&self, column: u16, row: u16) -> Option<Route> {
        let position = Position::new(column, row);
        self.link_areas
            .iter()
            .find(|(area, _)| area.contains(position))
            .map(|(_, route)| route.clone())
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, t: &Translator, year: i32) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_type(BorderType::Thick);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(2),
                Constraint::Fill(1),
                Constraint::Fill(1),
                Constraint::Fill(1),
                Constraint::Fill(1),
                Constraint::Length(12),
            ])
            .split(inner);

        let copyright = Paragraph::new(format!("© {} Driftmail", year))
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(copyright, columns[0]);

        self.link_areas.clear();
        for (index, route) in Route::navigable().into_iter().enumerate() {
            let label = match route {
                Route::Home => t.t("common.home", "Inbox"),
                Route::PrivacyPolicy => t.t("common.privacyPolicy", "Privacy Policy"),
                Route::Terms => t.t("common.terms", "Terms of Use"),
                Route::About => t.t("common.about", "About"),
                Route::NotFound(_) => continue,
            };
            let area = columns[index + 1];
            let link = Paragraph::new(format!("[{}] {}", index + 1, label))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(link, area);
            self.link_areas.push((area, route));
        }

        let quit = Paragraph::new(format!("[Q] {}", t.t("common.quit", "Quit")))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(quit, columns[5]);
    }
}
