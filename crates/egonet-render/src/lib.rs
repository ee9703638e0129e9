#![forbid(unsafe_code)]

//! Ego-network layout and rendering.
//!
//! The pipeline is `layout_ego` (pure geometry) -> [`scene::Scene`] (drawable primitives and
//! click targets) -> [`svg::render_scene_svg`] (one possible drawing backend).

pub mod layout;
pub mod model;
pub mod scene;
pub mod svg;
pub mod text;

pub use layout::{LayoutOptions, layout_ego};
pub use model::{Bounds, Canvas, EdgeKind, EgoEdge, EgoLayout, EgoNode, LayoutPoint, Role};
pub use scene::Scene;
pub use svg::{SvgRenderOptions, render_scene_svg};
pub use text::{LabelOptions, wrap_label};

use egonet_core::{PersonSummary, Surroundings};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid canvas size: {width}x{height} (both sides must be finite and positive)")]
    InvalidCanvas { width: f64, height: f64 },
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Layout + scene + SVG in one call.
pub fn render_ego_svg(
    canvas: Canvas,
    center: &PersonSummary,
    surroundings: &Surroundings,
    layout_options: &LayoutOptions,
    svg_options: &SvgRenderOptions,
) -> String {
    let layout = layout_ego(canvas, center, surroundings, layout_options);
    let scene = Scene::build(&layout);
    render_scene_svg(&scene, svg_options)
}

/// Serializes a layout for inspection (`egonet-cli layout`).
pub fn layout_to_json(layout: &EgoLayout, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(layout)?
    } else {
        serde_json::to_string(layout)?
    })
}
