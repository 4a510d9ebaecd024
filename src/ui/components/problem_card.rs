use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::evaluator::{Feedback, Outcome};
use crate::engine::problem::Problem;
use crate::ui::theme::Theme;

pub struct ProblemCard<'a> {
    problem: &'a Problem,
    input: &'a str,
    feedback: Option<Outcome>,
    celebrating: bool,
    theme: &'a Theme,
}

impl<'a> ProblemCard<'a> {
    pub fn new(problem: &'a Problem, input: &'a str, theme: &'a Theme) -> Self {
        Self {
            problem,
            input,
            feedback: None,
            celebrating: false,
            theme,
        }
    }

    pub fn feedback(mut self, feedback: Option<Outcome>, celebrating: bool) -> Self {
        self.feedback = feedback;
        self.celebrating = celebrating;
        self
    }

    fn input_style(&self) -> Style {
        let colors = &self.theme.colors;
        if self.celebrating {
            return Style::default()
                .fg(colors.celebrate())
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK);
        }
        match self.feedback.and_then(Outcome::feedback) {
            Some(Feedback::Success) => Style::default()
                .fg(colors.success())
                .add_modifier(Modifier::BOLD),
            Some(Feedback::Warning) => Style::default()
                .fg(colors.warning())
                .add_modifier(Modifier::BOLD),
            Some(Feedback::Error) => Style::default()
                .fg(colors.error())
                .add_modifier(Modifier::BOLD),
            None => Style::default().fg(colors.fg()),
        }
    }

    fn verdict(&self) -> &'static str {
        if self.celebrating {
            return "Perfect!";
        }
        match self.feedback {
            Some(Outcome::Perfect) | Some(Outcome::CorrectWithRetry) => "Correct",
            Some(Outcome::Incorrect) => "Try again",
            _ => "",
        }
    }
}

impl Widget for ProblemCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.accent_dim()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let answer = if self.input.is_empty() {
            Span::styled("?", Style::default().fg(colors.muted()))
        } else {
            Span::styled(self.input, self.input_style())
        };

        let pad = inner.height.saturating_sub(5) / 2;
        let mut lines: Vec<Line> = (0..pad).map(|_| Line::from("")).collect();
        lines.push(Line::from(Span::styled(
            format!("{} =", self.problem),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(answer));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(self.verdict(), self.input_style())));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
