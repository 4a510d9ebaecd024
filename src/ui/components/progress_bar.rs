use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use crate::ui::theme::Theme;

/// One-line bar: `Level 3 [██████░░░░] 12 to go`.
pub struct ProgressBar<'a> {
    label: String,
    ratio: f64,
    caption: Option<String>,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: impl Into<String>, ratio: f64, theme: &'a Theme) -> Self {
        Self {
            label: label.into(),
            ratio: if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 },
            caption: None,
            theme,
        }
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn filled_cells(&self, width: u16) -> u16 {
        (self.ratio * width as f64) as u16
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let colors = &self.theme.colors;
        let y = area.y + area.height / 2;

        let label = format!("{} ", self.label);
        let caption = self
            .caption
            .as_deref()
            .map(|c| format!(" {c}"))
            .unwrap_or_default();
        let label_w = label.chars().count() as u16;
        let caption_w = caption.chars().count() as u16;

        buf.set_string(
            area.x,
            y,
            &label,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        );

        let bar_x = area.x + label_w.min(area.width);
        let bar_w = area.width.saturating_sub(label_w + caption_w);
        let filled = self.filled_cells(bar_w);
        for x in bar_x..bar_x + bar_w {
            let style = if x < bar_x + filled {
                Style::default().bg(colors.bar_filled())
            } else {
                Style::default().bg(colors.bar_empty())
            };
            buf[(x, y)].set_symbol(" ").set_style(style);
        }

        if caption_w > 0 && bar_x + bar_w < area.x + area.width {
            buf.set_string(
                bar_x + bar_w,
                y,
                &caption,
                Style::default().fg(colors.muted()),
            );
        }
    }
}
