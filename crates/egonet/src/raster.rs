#![forbid(unsafe_code)]

use egonet_render::{Scene, SvgRenderOptions, render_scene_svg};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    pub background: Option<String>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: Some("white".to_string()),
        }
    }
}

pub fn render_scene_png(
    scene: &Scene,
    svg_options: &SvgRenderOptions,
    raster: &RasterOptions,
) -> Result<Vec<u8>> {
    svg_to_png(&render_scene_svg(scene, svg_options), raster)
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options.scale, options.background.as_deref())?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

fn svg_to_pixmap(svg: &str, scale: f32, background: Option<&str>) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    // The root `width`/`height` always match the viewBox size, and usvg already maps the viewBox
    // onto them.
    let size = tree.size();
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;
    if let Some(color) = background.and_then(parse_tiny_skia_color) {
        pixmap.fill(color);
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

fn parse_tiny_skia_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Some(tiny_skia::Color::from_rgba8(255, 255, 255, 255)),
        "black" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 255)),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    let nibble = |c: u8| (c as char).to_digit(16).map(|v| v as u8);
    let bytes = hex.as_bytes();
    let channel = |i: usize| -> Option<u8> {
        match bytes.len() {
            3 | 4 => nibble(bytes[i]).map(|v| (v << 4) | v),
            _ => Some((nibble(bytes[2 * i])? << 4) | nibble(bytes[2 * i + 1])?),
        }
    };
    match bytes.len() {
        3 | 6 => Some(tiny_skia::Color::from_rgba8(
            channel(0)?,
            channel(1)?,
            channel(2)?,
            255,
        )),
        4 | 8 => Some(tiny_skia::Color::from_rgba8(
            channel(0)?,
            channel(1)?,
            channel(2)?,
            channel(3)?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egonet_core::{PersonSummary, Surroundings};
    use egonet_render::{Canvas, LayoutOptions, layout_ego};

    #[test]
    fn svg_to_png_produces_png_signature() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10"><rect width="10" height="10" fill="black"/></svg>"#;
        let bytes = svg_to_png(svg, &RasterOptions::default()).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn scene_png_is_scaled() {
        let layout = layout_ego(
            Canvas::new(100.0, 60.0).unwrap(),
            &PersonSummary::new("@I1@", "Solo"),
            &Surroundings::default(),
            &LayoutOptions::default(),
        );
        let raster = RasterOptions {
            scale: 2.0,
            ..Default::default()
        };
        let bytes =
            render_scene_png(&Scene::build(&layout), &SvgRenderOptions::default(), &raster)
                .unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
        // IHDR width/height are the big-endian u32s at offsets 16 and 20.
        assert_eq!(u32::from_be_bytes(bytes[16..20].try_into().unwrap()), 200);
        assert_eq!(u32::from_be_bytes(bytes[20..24].try_into().unwrap()), 120);
    }

    #[test]
    fn colors_parse_short_and_long_hex() {
        assert_eq!(
            parse_tiny_skia_color("#fff"),
            Some(tiny_skia::Color::from_rgba8(255, 255, 255, 255))
        );
        assert_eq!(
            parse_tiny_skia_color("#11223344"),
            Some(tiny_skia::Color::from_rgba8(0x11, 0x22, 0x33, 0x44))
        );
        assert_eq!(parse_tiny_skia_color("#12345"), None);
        assert_eq!(parse_tiny_skia_color("teal"), None);
    }
}
