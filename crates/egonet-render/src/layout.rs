//! Ego-network layout: one person, their parents above, siblings and spouse beside them and
//! children below, joined by orthogonal family-tree connectors.
//!
//! Coordinates are canvas pixels with `y` growing downwards. The center person always sits at
//! the canvas midpoint; everything else is placed relative to it with fixed spacing, so the
//! output is a pure function of the inputs.

use crate::model::{Bounds, Canvas, EdgeKind, EgoEdge, EgoLayout, EgoNode, LayoutPoint, Role};
use crate::text::LabelOptions;
use egonet_core::{EgoConfig, PersonSummary, Surroundings};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub node_radius: f64,
    pub center_node_radius: f64,
    /// Vertical distance between generation levels, before `level_buffer`.
    pub level_spacing: f64,
    pub level_buffer: f64,
    pub parent_spacing: f64,
    pub sibling_spacing: f64,
    /// Distance from center to the nearest sibling.
    pub sibling_gap: f64,
    pub child_spacing: f64,
    pub spouse_offset: f64,
    /// Height of a generation bar above the row it feeds.
    pub bar_offset: f64,
    pub label: LabelOptions,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            node_radius: 35.0,
            center_node_radius: 40.0,
            level_spacing: 120.0,
            level_buffer: 30.0,
            parent_spacing: 100.0,
            sibling_spacing: 80.0,
            sibling_gap: 150.0,
            child_spacing: 80.0,
            spouse_offset: 80.0,
            bar_offset: 50.0,
            label: LabelOptions::default(),
        }
    }
}

fn positive_or(v: Option<f64>, fallback: f64) -> f64 {
    match v {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => fallback,
    }
}

impl LayoutOptions {
    /// Reads `layout.*` and `label.*`; missing or non-positive values keep their defaults.
    pub fn from_config(config: &EgoConfig) -> Self {
        let d = Self::default();
        let f = |key: &str, fallback: f64| positive_or(config.get_f64(key), fallback);
        Self {
            node_radius: f("layout.nodeRadius", d.node_radius),
            center_node_radius: f("layout.centerNodeRadius", d.center_node_radius),
            level_spacing: f("layout.levelSpacing", d.level_spacing),
            level_buffer: f("layout.levelBuffer", d.level_buffer),
            parent_spacing: f("layout.parentSpacing", d.parent_spacing),
            sibling_spacing: f("layout.siblingSpacing", d.sibling_spacing),
            sibling_gap: f("layout.siblingGap", d.sibling_gap),
            child_spacing: f("layout.childSpacing", d.child_spacing),
            spouse_offset: f("layout.spouseOffset", d.spouse_offset),
            bar_offset: f("layout.barOffset", d.bar_offset),
            label: LabelOptions::from_config(config),
        }
    }

    fn level_step(&self) -> f64 {
        self.level_spacing + self.level_buffer
    }
}

/// x of the first item in a row of `count` items centered on `anchor`.
///
/// A single item lands exactly on `anchor`; an empty row has no items but still returns `anchor`.
fn row_start(anchor: f64, count: usize, spacing: f64) -> f64 {
    if count <= 1 {
        return anchor;
    }
    anchor - ((count - 1) as f64 * spacing) / 2.0
}

/// Drops repeated waypoints and interior waypoints that do not turn a corner.
fn simplify_orthogonal(points: &[LayoutPoint]) -> Vec<LayoutPoint> {
    let mut out: Vec<LayoutPoint> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last() == Some(&p) {
            continue;
        }
        if out.len() >= 2 {
            let a = out[out.len() - 2];
            let b = out[out.len() - 1];
            let collinear = (a.x == b.x && b.x == p.x) || (a.y == b.y && b.y == p.y);
            if collinear {
                out.pop();
            }
        }
        out.push(p);
    }
    out
}

/// Vertical drop from the anchor, along the bar, then down into the child.
fn lineage_edge(anchor_x: f64, top_y: f64, bar_y: f64, x: f64, bottom_y: f64) -> EgoEdge {
    EgoEdge {
        kind: EdgeKind::Lineage,
        points: simplify_orthogonal(&[
            LayoutPoint::new(anchor_x, top_y),
            LayoutPoint::new(anchor_x, bar_y),
            LayoutPoint::new(x, bar_y),
            LayoutPoint::new(x, bottom_y),
        ]),
    }
}

fn partner_edge(y: f64, left_x: f64, right_x: f64) -> EgoEdge {
    EgoEdge {
        kind: EdgeKind::Partner,
        points: vec![LayoutPoint::new(left_x, y), LayoutPoint::new(right_x, y)],
    }
}

/// Where a vertical line at `x` leaves a circle's lower half, if it crosses the circle.
fn circle_bottom_at(cx: f64, cy: f64, radius: f64, x: f64) -> Option<f64> {
    let dx = (x - cx).abs();
    (dx < radius).then(|| cy + (radius * radius - dx * dx).sqrt())
}

fn make_node(
    person: &PersonSummary,
    role: Role,
    x: f64,
    y: f64,
    radius: f64,
    label: &LabelOptions,
) -> EgoNode {
    let name = person.display_name().to_string();
    EgoNode {
        id: person.id.clone(),
        lines: label.wrap(&name),
        name,
        x,
        y,
        radius,
        role,
    }
}

/// Computes node positions and connectors for `center` and its surroundings.
///
/// Only the first spouse is placed. Never fails: every list may be empty.
pub fn layout_ego(
    canvas: Canvas,
    center: &PersonSummary,
    surroundings: &Surroundings,
    options: &LayoutOptions,
) -> EgoLayout {
    let c = canvas.center();
    let (cx, cy) = (c.x, c.y);
    let r = options.node_radius;
    let cr = options.center_node_radius;
    let label = &options.label;

    let mut nodes: Vec<EgoNode> = Vec::with_capacity(1 + surroundings.displayed_len());
    let mut edges: Vec<EgoEdge> = Vec::new();

    let parents = &surroundings.parents;
    let parent_y = cy - options.level_step();
    let parent_start = row_start(cx, parents.len(), options.parent_spacing);
    let parent_xs: Vec<f64> = (0..parents.len())
        .map(|i| parent_start + i as f64 * options.parent_spacing)
        .collect();

    let siblings = &surroundings.siblings;
    let sibling_start = cx
        - options.sibling_gap
        - siblings.len().saturating_sub(1) as f64 * options.sibling_spacing;
    let sibling_xs: Vec<f64> = (0..siblings.len())
        .map(|i| sibling_start + i as f64 * options.sibling_spacing)
        .collect();

    let spouse = surroundings.displayed_spouse();
    let spouse_x = cx + options.spouse_offset;

    let children = &surroundings.children;
    let marriage_x = if spouse.is_some() {
        (cx + spouse_x) / 2.0
    } else {
        cx
    };
    let child_y = cy + options.level_step();
    let child_start = row_start(marriage_x, children.len(), options.child_spacing);
    let child_xs: Vec<f64> = (0..children.len())
        .map(|i| child_start + i as f64 * options.child_spacing)
        .collect();

    if !parents.is_empty() {
        // The parent group is centered on cx, so the trunk hangs from cx. It starts on the middle
        // parent's circle (odd count), otherwise on the connector between the two middle parents.
        let mid = parent_xs.len() / 2;
        let anchor_x = (parent_xs[0] + parent_xs[parent_xs.len() - 1]) / 2.0;
        let top_y = if parents.len() % 2 == 1 {
            parent_y + r
        } else {
            edges.push(partner_edge(parent_y, parent_xs[mid - 1] + r, parent_xs[mid] - r));
            parent_y
        };
        let bar_y = cy - options.bar_offset;
        for &x in &sibling_xs {
            edges.push(lineage_edge(anchor_x, top_y, bar_y, x, cy - r));
        }
        edges.push(lineage_edge(anchor_x, top_y, bar_y, cx, cy - cr));
    }

    if spouse.is_some() {
        edges.push(partner_edge(cy, cx + cr, spouse_x - r));
    }

    if !children.is_empty() {
        let top_y = if spouse.is_some() {
            circle_bottom_at(cx, cy, cr, marriage_x)
                .or_else(|| circle_bottom_at(spouse_x, cy, r, marriage_x))
                .unwrap_or(cy)
        } else {
            cy + cr
        };
        let bar_y = child_y - options.bar_offset;
        for &x in &child_xs {
            edges.push(lineage_edge(marriage_x, top_y, bar_y, x, child_y - r));
        }
    }

    for (p, &x) in parents.iter().zip(&parent_xs) {
        nodes.push(make_node(p, Role::Parent, x, parent_y, r, label));
    }
    for (p, &x) in siblings.iter().zip(&sibling_xs) {
        nodes.push(make_node(p, Role::Sibling, x, cy, r, label));
    }
    nodes.push(make_node(center, Role::Center, cx, cy, cr, label));
    if let Some(p) = spouse {
        nodes.push(make_node(p, Role::Spouse, spouse_x, cy, r, label));
    }
    for (p, &x) in children.iter().zip(&child_xs) {
        nodes.push(make_node(p, Role::Child, x, child_y, r, label));
    }

    let bounds = Bounds::from_points(nodes.iter().flat_map(|n| {
        [
            (n.x - n.radius, n.y - n.radius),
            (n.x + n.radius, n.y + n.radius),
        ]
    }));

    tracing::debug!(
        center = %center.id,
        nodes = nodes.len(),
        edges = edges.len(),
        "computed ego layout"
    );

    EgoLayout {
        canvas,
        nodes,
        edges,
        marriage_x,
        bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_start_centers_rows_on_anchor() {
        assert_eq!(row_start(500.0, 0, 80.0), 500.0);
        assert_eq!(row_start(500.0, 1, 80.0), 500.0);
        assert_eq!(row_start(500.0, 2, 100.0), 450.0);
        assert_eq!(row_start(500.0, 3, 80.0), 420.0);
    }

    #[test]
    fn simplify_removes_straight_runs() {
        let p = |x, y| LayoutPoint::new(x, y);
        assert_eq!(
            simplify_orthogonal(&[p(0.0, 0.0), p(0.0, 5.0), p(0.0, 5.0), p(0.0, 9.0)]),
            vec![p(0.0, 0.0), p(0.0, 9.0)]
        );
        assert_eq!(
            simplify_orthogonal(&[p(0.0, 0.0), p(0.0, 5.0), p(4.0, 5.0), p(4.0, 9.0)]),
            vec![p(0.0, 0.0), p(0.0, 5.0), p(4.0, 5.0), p(4.0, 9.0)]
        );
    }

    #[test]
    fn circle_bottom_only_inside_the_circle() {
        assert_eq!(circle_bottom_at(0.0, 0.0, 5.0, 0.0), Some(5.0));
        assert_eq!(circle_bottom_at(0.0, 0.0, 5.0, 3.0), Some(4.0));
        assert_eq!(circle_bottom_at(0.0, 0.0, 5.0, 5.0), None);
    }

    #[test]
    fn options_ignore_non_positive_overrides() {
        let cfg = EgoConfig::from_json_str(
            r#"{"layout":{"nodeRadius":-3,"childSpacing":64,"spouseOffset":"wide"}}"#,
        )
        .unwrap();
        let opts = LayoutOptions::from_config(&cfg);
        assert_eq!(opts.node_radius, 35.0);
        assert_eq!(opts.child_spacing, 64.0);
        assert_eq!(opts.spouse_offset, 80.0);
    }
}
