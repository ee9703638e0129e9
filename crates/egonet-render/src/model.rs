use crate::{Error, Result};
use egonet_core::EgoConfig;
use egonet_core::geom::{Point, point};
use serde::{Deserialize, Serialize};

/// Drawing surface size. Both sides are finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    width: f64,
    height: f64,
}

impl Canvas {
    pub const DEFAULT_WIDTH: f64 = 1000.0;
    pub const DEFAULT_HEIGHT: f64 = 500.0;

    pub fn new(width: f64, height: f64) -> Result<Self> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !ok(width) || !ok(height) {
            return Err(Error::InvalidCanvas { width, height });
        }
        Ok(Self { width, height })
    }

    /// Reads `canvas.width` / `canvas.height`, defaulting to 1000x500.
    pub fn from_config(config: &EgoConfig) -> Result<Self> {
        Self::new(
            config
                .get_f64("canvas.width")
                .unwrap_or(Self::DEFAULT_WIDTH),
            config
                .get_f64("canvas.height")
                .unwrap_or(Self::DEFAULT_HEIGHT),
        )
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center(&self) -> Point {
        point(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl LayoutPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Center,
    Parent,
    Sibling,
    Spouse,
    Child,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Center => "center",
            Role::Parent => "parent",
            Role::Sibling => "sibling",
            Role::Spouse => "spouse",
            Role::Child => "child",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EgoNode {
    pub id: String,
    /// Display name (`"Unknown"` for empty names) the `lines` were wrapped from.
    pub name: String,
    /// One or two label lines.
    pub lines: Vec<String>,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub role: Role,
}

impl EgoNode {
    pub fn is_center(&self) -> bool {
        self.role == Role::Center
    }

    pub fn center(&self) -> Point {
        point(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Horizontal connector between two partners (parents, or center and spouse).
    Partner,
    /// Orthogonal descent from a couple (or single parent) to one child.
    Lineage,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Partner => "partner",
            EdgeKind::Lineage => "lineage",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EgoEdge {
    pub kind: EdgeKind,
    pub points: Vec<LayoutPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EgoLayout {
    pub canvas: Canvas,
    /// Parents, siblings, center, spouse, children; each group in input order.
    pub nodes: Vec<EgoNode>,
    pub edges: Vec<EgoEdge>,
    /// x of the point the children row hangs from.
    pub marriage_x: f64,
    /// Extent of all node circles.
    pub bounds: Option<Bounds>,
}

impl EgoLayout {
    pub fn node(&self, id: &str) -> Option<&EgoNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes_with_role(&self, role: Role) -> impl Iterator<Item = &EgoNode> {
        self.nodes.iter().filter(move |n| n.role == role)
    }
}
