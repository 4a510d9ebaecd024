use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

/// Title, screen tabs, and a right-aligned status string.
pub struct TabBar<'a> {
    titles: &'a [&'a str],
    selected: usize,
    status: String,
    theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    pub fn new(titles: &'a [&'a str], selected: usize, theme: &'a Theme) -> Self {
        Self {
            titles,
            selected,
            status: String::new(),
            theme,
        }
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.header_bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let status_w = self.status.chars().count() as u16 + 1;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(status_w)])
            .split(inner);

        let mut spans = vec![Span::styled(
            " mathdrill ",
            Style::default()
                .fg(colors.header_fg())
                .add_modifier(Modifier::BOLD),
        )];
        for (i, title) in self.titles.iter().enumerate() {
            let style = if i == self.selected {
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.muted())
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!(" {title} "), style));
        }
        Paragraph::new(Line::from(spans)).render(columns[0], buf);

        Paragraph::new(Line::from(Span::styled(
            self.status,
            Style::default().fg(colors.header_fg()),
        )))
        .render(columns[1], buf);
    }
}
