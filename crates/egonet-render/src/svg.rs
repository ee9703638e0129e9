use crate::model::Bounds;
use crate::scene::{Connector, Scene, SceneNode};
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root `<svg id="...">`, also used to scope the embedded CSS.
    pub diagram_id: Option<String>,
    /// When true, the viewBox hugs the drawn nodes (plus `viewbox_padding`) instead of the canvas.
    pub fit_to_content: bool,
    pub viewbox_padding: f64,
    /// When false, no `<style>` block is emitted (for hosts that ship their own CSS).
    pub include_styles: bool,
    pub font_size: f64,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            fit_to_content: false,
            viewbox_padding: 8.0,
            include_styles: true,
            font_size: 11.0,
        }
    }
}

/// Numbers as SVG attributes: at most three decimals, no trailing zeros, no `-0`.
pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let rounded = (v * 1000.0).round() / 1000.0;
    let mut out = format!("{rounded:.3}");
    while out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
    if out == "-0" {
        out = "0".to_string();
    }
    out
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn ego_css(diagram_id: &str, font_size: f64) -> String {
    let id = escape_xml(diagram_id);
    format!(
        "#{id} .connection-line{{fill:none;stroke:#555;stroke-width:2;}}\
#{id} .person-node circle{{fill:#e8f0fe;stroke:#4a6fa5;stroke-width:2;}}\
#{id} .person-node.center circle{{fill:#4a6fa5;stroke:#2c4a75;stroke-width:3;}}\
#{id} .person-node text{{fill:#1f2937;font-family:ui-sans-serif, system-ui, sans-serif;font-size:{fs}px;text-anchor:middle;}}\
#{id} .person-node.center text{{fill:#fff;font-weight:bold;}}\
#{id} .person-node[data-person-id]:hover circle{{fill:#c9dbfb;}}",
        fs = fmt(font_size),
    )
}

fn path_data(connector: &Connector) -> String {
    let mut d = String::new();
    for (i, p) in connector.points.iter().enumerate() {
        let cmd = if i == 0 { "M" } else { " L" };
        let _ = write!(&mut d, "{cmd} {} {}", fmt(p.x), fmt(p.y));
    }
    d
}

fn render_node(out: &mut String, node: &SceneNode) {
    let role_class = node.role.as_str();
    if node.clickable {
        let _ = write!(
            out,
            r#"<g class="person-node {role_class}" data-person-id="{id}" style="cursor: pointer;">"#,
            id = escape_xml(&node.person_id),
        );
    } else {
        let _ = write!(out, r#"<g class="person-node {role_class}">"#);
    }
    let _ = write!(
        out,
        r#"<circle cx="{}" cy="{}" r="{}"/>"#,
        fmt(node.x),
        fmt(node.y),
        fmt(node.radius)
    );
    for t in &node.texts {
        let _ = write!(
            out,
            r#"<text x="{}" y="{}">{}</text>"#,
            fmt(t.x),
            fmt(t.y),
            escape_xml(&t.text)
        );
    }
    out.push_str("</g>");
}

fn viewbox(scene: &Scene, options: &SvgRenderOptions) -> Bounds {
    let canvas = scene.canvas();
    let canvas_bounds = Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: canvas.width(),
        max_y: canvas.height(),
    };
    if !options.fit_to_content {
        return canvas_bounds;
    }
    let pad = options.viewbox_padding.max(0.0);
    Bounds::from_points(scene.nodes().iter().flat_map(|n| {
        [
            (n.x - n.radius - pad, n.y - n.radius - pad),
            (n.x + n.radius + pad, n.y + n.radius + pad),
        ]
    }))
    .unwrap_or(canvas_bounds)
}

/// Renders a scene as a standalone SVG document.
///
/// Connectors are drawn first so node circles cover their ends. Clickable nodes carry their
/// person id in `data-person-id`.
pub fn render_scene_svg(scene: &Scene, options: &SvgRenderOptions) -> String {
    let diagram_id = options.diagram_id.as_deref().unwrap_or("egonet");
    let vb = viewbox(scene, options);
    let vb_w = vb.width().max(1.0);
    let vb_h = vb.height().max(1.0);

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg" viewBox="{x} {y} {w} {h}" role="graphics-document document" aria-roledescription="ego-network">"#,
        id = escape_xml(diagram_id),
        x = fmt(vb.min_x),
        y = fmt(vb.min_y),
        w = fmt(vb_w),
        h = fmt(vb_h),
    );
    if options.include_styles {
        let _ = write!(
            &mut out,
            "<style>{}</style>",
            ego_css(diagram_id, options.font_size)
        );
    }

    out.push_str(r#"<g class="connections">"#);
    for c in scene.connectors() {
        if c.points.len() < 2 {
            continue;
        }
        let _ = write!(
            &mut out,
            r#"<path class="connection-line {kind}" d="{d}"/>"#,
            kind = c.kind.as_str(),
            d = path_data(c),
        );
    }
    out.push_str("</g>");

    for n in scene.nodes() {
        render_node(&mut out, n);
    }

    out.push_str("</svg>\n");
    out
}
