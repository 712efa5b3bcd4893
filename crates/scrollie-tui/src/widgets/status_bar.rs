use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use scrollie_core::ScrollElement;

use crate::app::{App, Outcome};
use crate::theme::GruvboxMaterial;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let state_str = if app.is_animating() {
            "SCROLLING"
        } else {
            "IDLE"
        };

        let (outcome_str, outcome_color) = match app.last_outcome {
            Some(Outcome::Completed) => ("completed", GruvboxMaterial::SUCCESS),
            Some(Outcome::Cancelled) => ("cancelled", GruvboxMaterial::WARNING),
            None => ("-", GruvboxMaterial::GREY2),
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {} ", msg)
        } else {
            format!(
                " {} | {:.1}/{:.0} | {} | done:{} cancelled:{} | last: ",
                state_str,
                app.pane.scroll_top(),
                app.target,
                app.backend_label(),
                app.completed,
                app.cancelled,
            )
        };
        let outcome_text = if app.status_message.is_some() {
            String::new()
        } else {
            outcome_str.to_string()
        };

        let help_hint = " q:quit j/k:step g/G:ends s:stop t:frames ";
        let used = status_text.len() + outcome_text.len() + help_hint.len();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(
                status_text,
                Style::default()
                    .fg(GruvboxMaterial::FG0)
                    .bg(GruvboxMaterial::BG2),
            ),
            Span::styled(
                outcome_text,
                Style::default().fg(outcome_color).bg(GruvboxMaterial::BG2),
            ),
            Span::styled(
                " ".repeat(padding_len),
                Style::default().bg(GruvboxMaterial::BG2),
            ),
            Span::styled(
                help_hint,
                Style::default()
                    .fg(GruvboxMaterial::GREY2)
                    .bg(GruvboxMaterial::BG2),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
