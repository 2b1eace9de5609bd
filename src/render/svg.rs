//! Static SVG serialization of a sampled [`Frame`].
//!
//! Produces the same element structure a DOM host would maintain: a links
//! layer under a nodes layer, one `<g>` per node holding its marker and label.

use std::fmt::Write;

use super::scene::Frame;
use super::style::Shape;
use crate::config::Orientation;

const LINK_STROKE: &str = "#f00";
const LINK_STROKE_WIDTH: f32 = 4.5;
const FONT: &str = "font: 10px sans-serif; user-select: none;";

/// Render `frame` as a standalone `<svg>` document.
///
/// `transform` is applied to the content group (pan/zoom); pass `""` to skip it.
pub fn render(frame: &Frame, orientation: Orientation, transform: &str) -> String {
    let mut out = String::with_capacity(256 + frame.nodes.len() * 160);
    let view = frame.view_box;

    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{}" style="max-width: 100%; height: auto; {FONT}">"#,
        view.width,
        view.height,
        view.to_attribute()
    );
    if transform.is_empty() {
        out.push_str("<g>");
    } else {
        let _ = write!(out, r#"<g transform="{}">"#, escape(transform));
    }

    let _ = write!(
        out,
        r#"<g fill="none" stroke="{LINK_STROKE}" stroke-opacity="1" stroke-width="{LINK_STROKE_WIDTH}">"#
    );
    for link in &frame.links {
        let _ = write!(
            out,
            r#"<path data-target="{}" d="{}"/>"#,
            link.target.raw(),
            link.path.to_svg(orientation)
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g cursor="pointer" pointer-events="all">"#);
    for node in &frame.nodes {
        let Shape::Circle { radius } = node.style.shape;
        let _ = write!(
            out,
            r#"<g data-id="{}" transform="translate({},{})" fill-opacity="{}" stroke-opacity="{}">"#,
            node.id.raw(),
            node.position.x,
            node.position.y,
            node.opacity,
            node.opacity
        );
        let _ = write!(out, r#"<circle r="{radius}" fill="{}"/>"#, node.style.fill);
        let _ = write!(
            out,
            r#"<text dy="0.31em" y="{}" text-anchor="{}" stroke-linejoin="round" stroke-width="3" stroke="white" paint-order="stroke">{}</text>"#,
            node.style.label_offset,
            node.style.label_anchor.as_str(),
            escape(&node.label)
        );
        out.push_str("</g>");
    }
    out.push_str("</g></g></svg>");
    out
}

/// Escape text for use in XML content and attribute values.
fn escape(text: &str) -> String {
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
