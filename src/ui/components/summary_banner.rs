use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::config::format_duration;
use crate::session::result::SessionSummary;
use crate::ui::theme::Theme;

/// Collapsed: the headline only. Expanded: time and pace as well.
pub struct SummaryBanner<'a> {
    summary: &'a SessionSummary,
    expanded: bool,
    theme: &'a Theme,
}

impl<'a> SummaryBanner<'a> {
    pub fn new(summary: &'a SessionSummary, expanded: bool, theme: &'a Theme) -> Self {
        Self {
            summary,
            expanded,
            theme,
        }
    }

    pub fn height(expanded: bool) -> u16 {
        if expanded { 6 } else { 3 }
    }

    fn detail_lines(&self) -> Vec<String> {
        let average = match self.summary.average_secs_per_problem() {
            Some(avg) => format!("{avg:.1} s per problem"),
            None => "no problems solved".to_string(),
        };
        vec![
            format!("Total time: {}", format_duration(self.summary.total_time_secs)),
            format!("Average: {average}"),
        ]
    }
}

impl Widget for SummaryBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let hint = if self.expanded {
            " [e] collapse  [x] dismiss "
        } else {
            " [e] details  [x] dismiss "
        };

        let block = Block::bordered()
            .title_bottom(Line::from(hint).right_aligned())
            .border_style(Style::default().fg(colors.warning()))
            .style(Style::default().bg(colors.header_bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![Line::from(Span::styled(
            self.summary.headline(),
            Style::default()
                .fg(colors.warning())
                .add_modifier(Modifier::BOLD),
        ))];
        if self.expanded {
            lines.push(Line::from(""));
            lines.extend(
                self.detail_lines()
                    .into_iter()
                    .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.fg())))),
            );
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_lines() {
        let theme = Theme::default();
        let summary = SessionSummary::new(8, 60);
        let banner = SummaryBanner::new(&summary, true, &theme);
        assert_eq!(
            banner.detail_lines(),
            vec!["Total time: 1 minute", "Average: 7.5 s per problem"]
        );

        let empty = SessionSummary::new(0, 30);
        let banner = SummaryBanner::new(&empty, true, &theme);
        assert_eq!(banner.detail_lines()[1], "Average: no problems solved");
    }
}
