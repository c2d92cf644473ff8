// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Match list widget.
//!
//! One row per scale family: its label, how many transpositions contain
//! the held notes, and the matching transpositions by note name.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::music::{MatchResult, Note, ScaleCatalog};

use super::family_color;

/// Widget listing matching transpositions per family
pub struct MatchListWidget<'a> {
    matches: &'a MatchResult,
    catalog: &'a ScaleCatalog,
    show_empty: bool,
    block: Option<Block<'a>>,
}

impl<'a> MatchListWidget<'a> {
    /// Create a new match list widget
    pub fn new(matches: &'a MatchResult, catalog: &'a ScaleCatalog) -> Self {
        Self {
            matches,
            catalog,
            show_empty: true,
            block: None,
        }
    }

    /// Whether families with no matches are listed
    pub fn show_empty(mut self, show: bool) -> Self {
        self.show_empty = show;
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for MatchListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        let mut lines: Vec<Line> = Vec::new();
        for (id, family) in self.catalog.iter().enumerate() {
            let transpositions = self.matches.for_family(id);
            if transpositions.is_empty() && !self.show_empty {
                continue;
            }

            let count_style = if transpositions.is_empty() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };

            let names = transpositions
                .iter()
                .map(|&t| Note::from_pitch_class(t).to_string())
                .collect::<Vec<_>>()
                .join(" ");

            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<15}", family.label()),
                    Style::default()
                        .fg(family_color(id))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{:>2}  ", transpositions.len()), count_style),
                Span::styled(names, Style::default().fg(Color::Gray)),
            ]));
        }

        Paragraph::new(lines).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::{ChordLocator, PitchClassSet};

    fn render_to_rows(widget: MatchListWidget, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..height)
            .map(|y| (0..width).map(|x| buf.get(x, y).symbol()).collect())
            .collect()
    }

    #[test]
    fn test_lists_all_families() {
        let catalog = ScaleCatalog::standard();
        let locator = ChordLocator::new(catalog.clone());
        let result = locator.locate(PitchClassSet::from_pitch_classes(&[0, 4, 7]));

        let rows = render_to_rows(MatchListWidget::new(&result, &catalog), 40, 8);
        assert!(rows[0].contains("Major"));
        assert!(rows[0].contains("3"));
        assert!(rows[0].contains("C F G"));
        assert!(rows[4].contains("Whole Tone"));
    }

    #[test]
    fn test_hides_empty_families() {
        let catalog = ScaleCatalog::standard();
        let locator = ChordLocator::new(catalog.clone());
        // A chromatic cluster matches nothing, so every row is empty
        let result = locator.locate(PitchClassSet::from_pitch_classes(&[0, 1, 2, 3, 4, 5, 6]));

        let rows = render_to_rows(
            MatchListWidget::new(&result, &catalog).show_empty(false),
            40,
            8,
        );
        let text = rows.join("\n");
        assert!(!text.contains("Major"));
    }
}
