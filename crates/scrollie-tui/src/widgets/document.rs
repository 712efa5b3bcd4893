use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::theme::GruvboxMaterial;

pub struct DocumentWidget;

impl DocumentWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let border_style = if app.is_animating() {
            Style::default().fg(GruvboxMaterial::ACCENT)
        } else {
            Style::default().fg(GruvboxMaterial::GREY0)
        };

        let block = Block::default()
            .title(" Document ")
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(GruvboxMaterial::BG0));

        let inner_area = block.inner(area);
        frame.render_widget(block, area);

        // The pane clamps against the rows actually visible
        app.pane.set_viewport(inner_area.height);

        let lines: Vec<Line> = app
            .lines
            .iter()
            .map(|line| {
                Line::from(Span::styled(
                    line.as_str(),
                    Style::default().fg(GruvboxMaterial::FG0),
                ))
            })
            .collect();

        let paragraph = Paragraph::new(Text::from(lines)).scroll((app.pane.row(), 0));
        frame.render_widget(paragraph, inner_area);
    }
}
