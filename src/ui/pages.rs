//! Static views: about, privacy policy, terms, and the not-found page.

use crate::i18n::Translator;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

const ABOUT_FALLBACK: &str = "Driftmail hands out throwaway email addresses that quietly disappear.\n\nEvery address lives for a limited time. When it expires, the mailbox and everything in it are gone for good.";
const PRIVACY_FALLBACK: &str = "Mailboxes are temporary by design. Messages are retained only until the mailbox expires, then deleted along with the address itself.";
const TERMS_FALLBACK: &str = "The service is provided as-is, with no availability or delivery guarantees. Mailboxes expire and their contents are unrecoverable.";

pub fn render_about(f: &mut Frame, area: Rect, t: &Translator) {
    let body = format!(
        "{}\n\n{}\n  https://driftmail.app\n  https://github.com/driftmail/driftmail",
        t.t("pages.about.body", ABOUT_FALLBACK),
        t.t("pages.about.links", "Find us at:"),
    );
    render_page(f, area, t.t("pages.about.title", "About"), &body);
}

pub fn render_privacy_policy(f: &mut Frame, area: Rect, t: &Translator) {
    render_page(
        f,
        area,
        t.t("pages.privacy.title", "Privacy Policy"),
        t.t("pages.privacy.body", PRIVACY_FALLBACK),
    );
}

pub fn render_terms(f: &mut Frame, area: Rect, t: &Translator) {
    render_page(
        f,
        area,
        t.t("pages.terms.title", "Terms of Use"),
        t.t("pages.terms.body", TERMS_FALLBACK),
    );
}

/// The catch-all view for routes nothing else claims.
pub fn render_not_found(f: &mut Frame, area: Rect, path: &str, t: &Translator) {
    let body = format!(
        "{}\n\n  {}\n\n[1] {}",
        t.t("pages.notFound.body", "There is nothing at this address."),
        path,
        t.t("common.home", "Inbox"),
    );
    let paragraph = Paragraph::new(body)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: false })
        .block(page_block(t.t("pages.notFound.title", "404")));
    f.render_widget(paragraph, area);
}

fn render_page(f: &mut Frame, area: Rect, title: &str, body: &str) {
    let paragraph = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .block(page_block(title));
    f.render_widget(paragraph, area);
}

fn page_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
}
