//! # Evidence Flow Layout
//!
//! Sankey-style board with three fixed columns: argument → ancient_source →
//! modern_reception. Vertical space within a column is distributed
//! proportionally to node value (sum of incident link weights, minimum 1).
//!
//! Conservation law: node heights plus inter-node gaps in a column equal the
//! available height, up to the rounding introduced by the minimum-height
//! clamp. Links are cubic Beziers between the vertical midpoints of their
//! endpoint rectangles, with stroke width `ln(value + 1)` scaled so thin
//! flows remain visible next to dominant ones.

use crate::layout::Point;
use crate::overview::{EvidenceLink, EvidenceNode, EvidenceStage};
use crate::primitives::{
    FLOW_CURVATURE, FLOW_GAP, FLOW_MIN_NODE_HEIGHT, FLOW_NODE_WIDTH, FLOW_STROKE_SCALE,
};
use crate::types::NodeId;
use serde::Serialize;
use std::collections::BTreeMap;

// =============================================================================
// OPTIONS & OUTPUT
// =============================================================================

/// Tuning knobs for [`evidence_flow_layout`].
#[derive(Debug, Clone, Copy)]
pub struct FlowLayoutOptions {
    pub width: f64,
    pub height: f64,
    pub node_width: f64,
    /// Vertical gap between stacked nodes in a column.
    pub gap: f64,
    /// Floor height so low-value nodes remain visible and clickable.
    pub min_node_height: f64,
}

impl Default for FlowLayoutOptions {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 600.0,
            node_width: FLOW_NODE_WIDTH,
            gap: FLOW_GAP,
            min_node_height: FLOW_MIN_NODE_HEIGHT,
        }
    }
}

/// A positioned node rectangle on the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowNode {
    pub id: NodeId,
    pub label: String,
    pub stage: EvidenceStage,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Sum of incident link values, floored at 1.
    pub value: f64,
}

impl FlowNode {
    /// Vertical midpoint, where links attach.
    #[must_use]
    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// A positioned link curve between two node rectangles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowLink {
    pub source: NodeId,
    pub target: NodeId,
    pub value: f64,
    /// Curve start: right edge midpoint of the source rectangle.
    pub start: Point,
    /// Curve end: left edge midpoint of the target rectangle.
    pub end: Point,
    /// First cubic Bezier control point.
    pub control_start: Point,
    /// Second cubic Bezier control point.
    pub control_end: Point,
    /// `ln(value + 1)` scaled; compresses large-value dominance.
    pub stroke_width: f64,
}

/// The complete board geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowLayout {
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
}

impl FlowLayout {
    /// True when nothing was laid out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

/// Lay out the evidence board for the given nodes and links.
///
/// Links referencing ids absent from `nodes` are dropped silently. Zero
/// nodes yield an empty layout.
#[must_use]
pub fn evidence_flow_layout(
    nodes: &[EvidenceNode],
    links: &[EvidenceLink],
    options: &FlowLayoutOptions,
) -> FlowLayout {
    if nodes.is_empty() {
        return FlowLayout::default();
    }

    // Node value = sum of incident link weights, minimum 1.
    let mut values: BTreeMap<&NodeId, f64> = nodes.iter().map(|n| (&n.id, 0.0)).collect();
    for link in links {
        if let Some(v) = values.get_mut(&link.source) {
            *v += link.value;
        }
        if let Some(v) = values.get_mut(&link.target) {
            *v += link.value;
        }
    }
    for v in values.values_mut() {
        *v = v.max(1.0);
    }

    // Columns at fixed x positions across the canvas.
    let column_x = |column: usize| -> f64 {
        let span = (options.width - options.node_width).max(0.0);
        span * column as f64 / 2.0
    };

    let mut placed: Vec<FlowNode> = Vec::with_capacity(nodes.len());
    for stage in EvidenceStage::COLUMNS {
        let mut column: Vec<&EvidenceNode> = nodes.iter().filter(|n| n.stage == stage).collect();
        if column.is_empty() {
            continue;
        }
        // Descending value; ties by label then id for a total order.
        column.sort_by(|a, b| {
            let va = values.get(&a.id).copied().unwrap_or(1.0);
            let vb = values.get(&b.id).copied().unwrap_or(1.0);
            vb.total_cmp(&va)
                .then_with(|| a.label.to_lowercase().cmp(&b.label.to_lowercase()))
                .then_with(|| a.id.cmp(&b.id))
        });

        let total_gaps = options.gap * (column.len() as f64 - 1.0);
        let usable = (options.height - total_gaps).max(0.0);
        let column_total: f64 = column
            .iter()
            .map(|n| values.get(&n.id).copied().unwrap_or(1.0))
            .sum();

        let x = column_x(stage.column());
        let mut cursor = 0.0;
        for node in column {
            let value = values.get(&node.id).copied().unwrap_or(1.0);
            let height = (value / column_total * usable).max(options.min_node_height);
            placed.push(FlowNode {
                id: node.id.clone(),
                label: node.label.clone(),
                stage,
                x,
                y: cursor,
                width: options.node_width,
                height,
                value,
            });
            cursor += height + options.gap;
        }
    }

    let rects: BTreeMap<&NodeId, &FlowNode> = placed.iter().map(|n| (&n.id, n)).collect();
    let mut curves: Vec<FlowLink> = links
        .iter()
        .filter_map(|link| {
            let source = rects.get(&link.source)?;
            let target = rects.get(&link.target)?;
            let start = Point::new(source.x + source.width, source.mid_y());
            let end = Point::new(target.x, target.mid_y());
            // Curvature proportional to the horizontal span between columns.
            let bend = (end.x - start.x) * FLOW_CURVATURE;
            Some(FlowLink {
                source: link.source.clone(),
                target: link.target.clone(),
                value: link.value,
                start,
                end,
                control_start: Point::new(start.x + bend, start.y),
                control_end: Point::new(end.x - bend, end.y),
                stroke_width: (link.value + 1.0).ln() * FLOW_STROKE_SCALE,
            })
        })
        .collect();
    curves.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));

    FlowLayout {
        nodes: placed,
        links: curves,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, stage: EvidenceStage) -> EvidenceNode {
        EvidenceNode {
            id: NodeId::new(id),
            label: id.to_string(),
            stage,
        }
    }

    fn link(source: &str, target: &str, value: f64) -> EvidenceLink {
        EvidenceLink {
            source: NodeId::new(source),
            target: NodeId::new(target),
            value,
        }
    }

    #[test]
    fn empty_input_yields_empty_layout() {
        let layout = evidence_flow_layout(&[], &[], &FlowLayoutOptions::default());
        assert!(layout.is_empty());
    }

    #[test]
    fn two_node_column_splits_proportionally() {
        // One argument (value 3) and one source (value 1) — but in the SAME
        // column the proportional split is what matters, so model two
        // arguments sharing a 100px column with a 12px gap.
        let nodes = vec![
            node("arg1", EvidenceStage::Argument),
            node("arg2", EvidenceStage::Argument),
            node("src1", EvidenceStage::AncientSource),
        ];
        let links = vec![link("arg1", "src1", 3.0), link("arg2", "src1", 1.0)];
        let options = FlowLayoutOptions {
            height: 100.0,
            gap: 12.0,
            min_node_height: 0.0,
            ..FlowLayoutOptions::default()
        };
        let layout = evidence_flow_layout(&nodes, &links, &options);

        let arg1 = layout.nodes.iter().find(|n| n.id.as_str() == "arg1");
        let arg2 = layout.nodes.iter().find(|n| n.id.as_str() == "arg2");
        let (arg1, arg2) = (arg1.expect("arg1 placed"), arg2.expect("arg2 placed"));

        // 3:1 split of the 88px usable height (100 − one 12px gap).
        assert!((arg1.height - 66.0).abs() < 1e-9);
        assert!((arg2.height - 22.0).abs() < 1e-9);
        assert!((arg1.height + arg2.height + 12.0 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn column_heights_plus_gaps_conserve_available_height() {
        let nodes: Vec<EvidenceNode> = (0..5)
            .map(|i| node(&format!("a{i}"), EvidenceStage::Argument))
            .collect();
        let links: Vec<EvidenceLink> = (0..5)
            .map(|i| link(&format!("a{i}"), "ghost", (i + 1) as f64))
            .collect();
        let options = FlowLayoutOptions {
            height: 400.0,
            gap: 12.0,
            min_node_height: 0.0,
            ..FlowLayoutOptions::default()
        };
        let layout = evidence_flow_layout(&nodes, &links, &options);

        let total_height: f64 = layout.nodes.iter().map(|n| n.height).sum();
        let total_gaps = 12.0 * 4.0;
        assert!((total_height + total_gaps - 400.0).abs() < 1e-9);
    }

    #[test]
    fn low_value_nodes_get_the_floor_height() {
        // "big" carries all the link weight; "tiny" falls back to the value
        // floor and its proportional share would be a fraction of a pixel.
        let nodes = vec![
            node("big", EvidenceStage::Argument),
            node("tiny", EvidenceStage::Argument),
        ];
        let links = vec![link("big", "ghost", 1000.0)];
        let options = FlowLayoutOptions {
            height: 100.0,
            min_node_height: 6.0,
            ..FlowLayoutOptions::default()
        };
        let layout = evidence_flow_layout(&nodes, &links, &options);
        let tiny = layout
            .nodes
            .iter()
            .find(|n| n.id.as_str() == "tiny")
            .expect("tiny placed");
        assert!((tiny.height - 6.0).abs() < 1e-9);
        for placed in &layout.nodes {
            assert!(placed.height >= 6.0);
        }
    }

    #[test]
    fn linkless_nodes_carry_the_value_floor() {
        let nodes = vec![node("orphan", EvidenceStage::ModernReception)];
        let layout = evidence_flow_layout(&nodes, &[], &FlowLayoutOptions::default());
        assert_eq!(layout.nodes[0].value, 1.0);
        // A single node fills its whole column.
        assert!((layout.nodes[0].height - 600.0).abs() < 1e-9);
    }

    #[test]
    fn columns_sort_by_descending_value() {
        let nodes = vec![
            node("minor", EvidenceStage::Argument),
            node("major", EvidenceStage::Argument),
        ];
        let links = vec![
            link("major", "x", 9.0),
            link("minor", "x", 2.0),
        ];
        let layout = evidence_flow_layout(&nodes, &links, &FlowLayoutOptions::default());
        assert_eq!(layout.nodes[0].id.as_str(), "major");
        assert!(layout.nodes[0].y < layout.nodes[1].y);
    }

    #[test]
    fn links_attach_to_vertical_midpoints() {
        let nodes = vec![
            node("arg", EvidenceStage::Argument),
            node("src", EvidenceStage::AncientSource),
        ];
        let links = vec![link("arg", "src", 2.0)];
        let layout = evidence_flow_layout(&nodes, &links, &FlowLayoutOptions::default());
        let curve = &layout.links[0];
        let arg = &layout.nodes[0];
        let src = &layout.nodes[1];
        assert!((curve.start.y - arg.mid_y()).abs() < 1e-9);
        assert!((curve.end.y - src.mid_y()).abs() < 1e-9);
        assert!((curve.start.x - (arg.x + arg.width)).abs() < 1e-9);
    }

    #[test]
    fn link_stroke_compresses_logarithmically() {
        let nodes = vec![
            node("arg", EvidenceStage::Argument),
            node("src", EvidenceStage::AncientSource),
        ];
        let thin = evidence_flow_layout(
            &nodes,
            &[link("arg", "src", 1.0)],
            &FlowLayoutOptions::default(),
        );
        let thick = evidence_flow_layout(
            &nodes,
            &[link("arg", "src", 100.0)],
            &FlowLayoutOptions::default(),
        );
        let ratio = thick.links[0].stroke_width / thin.links[0].stroke_width;
        // 100x the value yields well under 100x the stroke.
        assert!(ratio > 1.0 && ratio < 10.0);
    }

    #[test]
    fn links_to_unknown_nodes_are_dropped() {
        let nodes = vec![node("arg", EvidenceStage::Argument)];
        let layout = evidence_flow_layout(
            &nodes,
            &[link("arg", "ghost", 5.0)],
            &FlowLayoutOptions::default(),
        );
        assert!(layout.links.is_empty());
    }
}
