// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Harmonic graph widget.
//!
//! Draws the adjacency graph on a braille canvas. Each family sits on
//! its own ring, nodes lit by the current match result in the family
//! color; edges connect harmonically adjacent scales.

use std::collections::HashSet;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Widget,
    },
};

use crate::music::{HarmonicGraph, NodeId, Note, ScaleCatalog, ScaleFamily, Transposition};

use super::family_color;

/// Canvas bounds, leaving margin around the unit layout circle
const VIEW_BOUND: f64 = 1.3;

/// Widget drawing the harmonic graph with highlighted nodes
pub struct GraphWidget<'a> {
    graph: &'a HarmonicGraph,
    catalog: &'a ScaleCatalog,
    highlighted: &'a HashSet<NodeId>,
    show_edges: bool,
    block: Option<Block<'a>>,
}

impl<'a> GraphWidget<'a> {
    /// Create a new graph widget
    pub fn new(
        graph: &'a HarmonicGraph,
        catalog: &'a ScaleCatalog,
        highlighted: &'a HashSet<NodeId>,
    ) -> Self {
        Self {
            graph,
            catalog,
            highlighted,
            show_edges: true,
            block: None,
        }
    }

    /// Whether edges are drawn
    pub fn show_edges(mut self, show: bool) -> Self {
        self.show_edges = show;
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for GraphWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let GraphWidget {
            graph,
            catalog,
            highlighted,
            show_edges,
            block,
        } = self;

        let position = |node: NodeId| {
            catalog
                .family(node.family)
                .map(|family| node_position(family, node.transposition))
        };

        let mut canvas = Canvas::default()
            .x_bounds([-VIEW_BOUND, VIEW_BOUND])
            .y_bounds([-VIEW_BOUND, VIEW_BOUND])
            .paint(move |ctx| {
                if show_edges {
                    for edge in graph.edges() {
                        let (a, b) = edge.endpoints();
                        let (Some((x1, y1)), Some((x2, y2))) = (position(a), position(b)) else {
                            continue;
                        };
                        let lit = highlighted.contains(&a) && highlighted.contains(&b);
                        let color = if lit { Color::White } else { Color::DarkGray };
                        ctx.draw(&CanvasLine {
                            x1,
                            y1,
                            x2,
                            y2,
                            color,
                        });
                    }
                }

                for &node in graph.nodes() {
                    let Some((x, y)) = position(node) else {
                        continue;
                    };
                    if highlighted.contains(&node) {
                        let label = Note::from_pitch_class(node.transposition).to_string();
                        let style = Style::default()
                            .fg(family_color(node.family))
                            .add_modifier(Modifier::BOLD);
                        ctx.print(x, y, Span::styled(label, style));
                    } else {
                        ctx.print(x, y, Span::styled("·", Style::default().fg(Color::DarkGray)));
                    }
                }
            });

        if let Some(block) = block {
            canvas = canvas.block(block);
        }
        canvas.render(area, buf);
    }
}

/// Position of a node in the layout circle.
///
/// Twelve-step families advance by fifths around their ring so that
/// fifth-related scales sit next to each other; shorter families place
/// their transpositions at equal angles. Angle zero is 12 o'clock,
/// increasing clockwise.
fn node_position(family: &ScaleFamily, t: Transposition) -> (f64, f64) {
    let n = family.n_steps();
    let slot = if n == 12 {
        (t as usize * 7) % 12
    } else {
        t as usize
    };
    let angle = std::f64::consts::TAU * slot as f64 / n as f64;
    let r = family.radius();
    (r * angle.sin(), r * angle.cos())
}
