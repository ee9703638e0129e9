#![forbid(unsafe_code)]

//! `egonet` is a headless ego-network explorer for GEDCOM family trees.
//!
//! A [`source::DataSource`] parses uploaded files and resolves people; the
//! [`navigator::Navigator`] owns the session and decides which person is centered; rendering goes
//! through `egonet-render`.
//!
//! # Features
//!
//! - `raster`: PNG output via pure-Rust SVG rasterization (`egonet::raster`)

pub use egonet_core::*;

pub mod error;
pub mod explorer;
pub mod navigator;
pub mod source;

#[cfg(feature = "raster")]
pub mod raster;

pub use error::{NavigationError, SourceError};
pub use explorer::Explorer;
pub use navigator::{
    FetchOutcome, FetchTicket, Navigator, Notice, PersonCard, Resolution, Session, View, fetch,
};
pub use source::{DataSource, LocalSource, RecordFile};

pub mod render {
    pub use egonet_render::layout::{LayoutOptions, layout_ego};
    pub use egonet_render::model::{Canvas, EdgeKind, EgoEdge, EgoLayout, EgoNode, Role};
    pub use egonet_render::scene::{HitTarget, Scene};
    pub use egonet_render::svg::{SvgRenderOptions, render_scene_svg};
    pub use egonet_render::text::{LabelOptions, wrap_label};
    pub use egonet_render::{Error, Result, layout_to_json, render_ego_svg};
}

/// Builds a navigator whose canvas and layout come from `config`.
pub fn navigator_from_config(config: &EgoConfig) -> render::Result<Navigator> {
    Ok(Navigator::new(
        render::Canvas::from_config(config)?,
        render::LayoutOptions::from_config(config),
    ))
}
