use crate::model::{Canvas, EdgeKind, EgoLayout, LayoutPoint, Role};
use egonet_core::geom::{circle_contains, point};
use serde::Serialize;

/// Baseline shift for a single centered label line.
const SINGLE_LINE_DY: f64 = 5.0;
/// Baseline of the first of two lines, relative to the node center.
const FIRST_OF_TWO_DY: f64 = -5.0;
const LINE_HEIGHT: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub kind: EdgeKind,
    pub points: Vec<LayoutPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub person_id: String,
    pub role: Role,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub texts: Vec<TextRun>,
    pub clickable: bool,
}

/// A click region that selects `person_id` when activated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitTarget {
    pub person_id: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Drawable primitives for one layout frame.
///
/// Every node gets a circle and its label lines, every edge one connector, and every node but the
/// center a [`HitTarget`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    canvas: Canvas,
    connectors: Vec<Connector>,
    nodes: Vec<SceneNode>,
    hit_targets: Vec<HitTarget>,
    revision: u64,
}

fn label_runs(x: f64, y: f64, lines: &[String]) -> Vec<TextRun> {
    let single = lines.len() == 1;
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| TextRun {
            x,
            y: if single {
                y + SINGLE_LINE_DY
            } else {
                y + FIRST_OF_TWO_DY + i as f64 * LINE_HEIGHT
            },
            text: line.clone(),
        })
        .collect()
}

impl Scene {
    pub fn empty(canvas: Canvas) -> Self {
        Self {
            canvas,
            connectors: Vec::new(),
            nodes: Vec::new(),
            hit_targets: Vec::new(),
            revision: 0,
        }
    }

    pub fn build(layout: &EgoLayout) -> Self {
        let mut scene = Self::empty(layout.canvas);
        scene.redraw(layout);
        scene
    }

    /// Clears everything and draws `layout` from scratch.
    pub fn redraw(&mut self, layout: &EgoLayout) {
        self.clear();
        self.canvas = layout.canvas;

        self.connectors.extend(layout.edges.iter().map(|e| Connector {
            kind: e.kind,
            points: e.points.clone(),
        }));

        for n in &layout.nodes {
            let clickable = !n.is_center();
            self.nodes.push(SceneNode {
                person_id: n.id.clone(),
                role: n.role,
                x: n.x,
                y: n.y,
                radius: n.radius,
                texts: label_runs(n.x, n.y, &n.lines),
                clickable,
            });
            if clickable {
                self.hit_targets.push(HitTarget {
                    person_id: n.id.clone(),
                    x: n.x,
                    y: n.y,
                    radius: n.radius,
                });
            }
        }
        self.revision += 1;
    }

    pub fn clear(&mut self) {
        self.connectors.clear();
        self.nodes.clear();
        self.hit_targets.clear();
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn hit_targets(&self) -> &[HitTarget] {
        &self.hit_targets
    }

    /// Number of completed redraws.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The person whose node contains `(x, y)`. Later nodes win where circles overlap.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&str> {
        let p = point(x, y);
        self.hit_targets
            .iter()
            .rev()
            .find(|t| circle_contains(point(t.x, t.y), t.radius, p))
            .map(|t| t.person_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_runs_follow_line_count() {
        let one = label_runs(10.0, 100.0, &["Jack Doe".to_string()]);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].y, 105.0);

        let two = label_runs(10.0, 100.0, &["Mary".to_string(), "Elizabeth".to_string()]);
        assert_eq!(two.iter().map(|t| t.y).collect::<Vec<_>>(), vec![95.0, 107.0]);

        assert!(label_runs(10.0, 100.0, &[String::new()]).is_empty());
    }
}
