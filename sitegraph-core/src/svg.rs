use crate::color::ColorScale;
use crate::document::{DocumentError, GraphDocument};
use crate::layout::Point;
use thiserror::Error;

const LINK_STROKE: &str = "#c9d1dc";
const LINK_OPACITY: &str = "0.8";
const LINK_WIDTH: &str = "1";
const DOT_RADIUS: f64 = 4.0;
const VALUE_RADIUS_SCALE: f64 = 20.0;
const CIRCLE_OPACITY: &str = "0.6";
const HOVER_SCALE: &str = "1.3";
const HOVER_MILLIS: &str = "250ms";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("expected {expected} positions but got {actual}")]
    PositionCount { expected: usize, actual: usize },
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 960,
            height: 600,
        }
    }
}

/// Render a laid-out document as an SVG string. One `<line class="link">` per
/// link, one `<g class="node">` per node; hovering a node grows its main
/// circle and the `<title>` child doubles as the tooltip.
pub fn render_svg(
    doc: &GraphDocument,
    positions: &[Point],
    opts: &RenderOptions,
) -> Result<String, RenderError> {
    if positions.len() != doc.nodes.len() {
        return Err(RenderError::PositionCount {
            expected: doc.nodes.len(),
            actual: positions.len(),
        });
    }

    let links = doc.resolved_links()?;
    let mut color = ColorScale::new(&doc.colors);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         viewBox=\"0 0 {} {}\" preserveAspectRatio=\"xMidYMid meet\" class=\"viewport\">\n",
        opts.width, opts.height
    ));

    svg.push_str("  <style>\n");
    svg.push_str(&format!(
        "    .node-circle {{ transform-box: fill-box; transform-origin: center; \
         transition: transform {}, opacity {}; }}\n",
        HOVER_MILLIS, HOVER_MILLIS
    ));
    svg.push_str(&format!(
        "    .node:hover .node-circle {{ transform: scale({}); opacity: 1; }}\n",
        HOVER_SCALE
    ));
    svg.push_str("    .node text { font: 10px sans-serif; fill: #333; }\n");
    svg.push_str("  </style>\n");

    for &(source, target) in &links {
        let a = positions[source];
        let b = positions[target];
        svg.push_str(&format!(
            "  <line class=\"link\" x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" \
             stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"{}\"/>\n",
            a.x, a.y, b.x, b.y, LINK_STROKE, LINK_OPACITY, LINK_WIDTH
        ));
    }

    for (node, pos) in doc.nodes.iter().zip(positions) {
        let fill = escape_xml(&color.color_for(&node.kind));
        svg.push_str(&format!(
            "  <g class=\"node\" data-name=\"{}\" transform=\"translate({:.1},{:.1})\">\n",
            escape_xml(&node.name),
            pos.x,
            pos.y
        ));
        svg.push_str(&format!(
            "    <circle r=\"{}\" fill=\"{}\"/>\n",
            DOT_RADIUS, fill
        ));
        svg.push_str(&format!(
            "    <a xlink:href=\"{}\">\n",
            escape_xml(&node.path)
        ));
        svg.push_str(&format!(
            "      <circle r=\"{}\" fill=\"{}\" class=\"node-circle\" opacity=\"{}\">\n",
            format_radius(node.value * VALUE_RADIUS_SCALE),
            fill,
            CIRCLE_OPACITY
        ));
        svg.push_str(&format!(
            "        <title>{}</title>\n",
            escape_xml(&node.path)
        ));
        svg.push_str("      </circle>\n");
        svg.push_str("    </a>\n");
        svg.push_str(&format!(
            "    <text dx=\"8\" dy=\"0.25em\">{}</text>\n",
            escape_xml(&node.name)
        ));
        svg.push_str("  </g>\n");
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

// Radii print without a trailing ".0" so `value: 1.5` renders as r="30".
fn format_radius(radius: f64) -> String {
    if (radius - radius.round()).abs() < 1e-9 {
        format!("{}", radius.round() as i64)
    } else {
        format!("{:.2}", radius)
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
