//! Inline-style resolution for the handful of properties detectors read.
//!
//! A rendering engine would supply computed style; here the host encodes the
//! rendered presentation in `style` attributes. Lengths resolve against the
//! document viewport for `vw`/`vh`/`%` units, and `font-size` inherits from
//! the nearest ancestor that sets it, matching how the computed value would
//! cascade.

use crate::dom::{Document, NodeId, Viewport};

/// CSS positioning scheme, as far as the overlay detector cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

/// Axis a length resolves against when viewport-relative.
#[derive(Debug, Clone, Copy)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Look up one declaration from the node's `style` attribute.
///
/// Returns the trimmed, lowercased value of the last declaration for the
/// property, or `None` when the node has no such declaration (or is stale).
pub fn property(doc: &Document, id: NodeId, name: &str) -> Option<String> {
    let style = doc.attr(id, "style")?;
    let mut found = None;
    for decl in style.split(';') {
        let mut parts = decl.splitn(2, ':');
        let prop = parts.next()?.trim().to_lowercase();
        if prop == name {
            if let Some(value) = parts.next() {
                found = Some(value.trim().to_lowercase());
            }
        }
    }
    found
}

pub fn position(doc: &Document, id: NodeId) -> Position {
    match property(doc, id, "position").as_deref() {
        Some("fixed") => Position::Fixed,
        Some("absolute") => Position::Absolute,
        Some("relative") => Position::Relative,
        Some("sticky") => Position::Sticky,
        _ => Position::Static,
    }
}

pub fn z_index(doc: &Document, id: NodeId) -> Option<i32> {
    property(doc, id, "z-index")?.parse::<i32>().ok()
}

/// Resolve a CSS length to pixels. Supports `px`, `vw`, `vh`, `%` (viewport
/// relative), and bare numbers.
pub fn resolve_length(value: &str, axis: Axis, viewport: Viewport) -> Option<f32> {
    let value = value.trim();
    let axis_px = match axis {
        Axis::Horizontal => viewport.width,
        Axis::Vertical => viewport.height,
    };
    if let Some(px) = value.strip_suffix("px") {
        return px.trim().parse::<f32>().ok();
    }
    if let Some(vw) = value.strip_suffix("vw") {
        return Some(vw.trim().parse::<f32>().ok()? / 100.0 * viewport.width);
    }
    if let Some(vh) = value.strip_suffix("vh") {
        return Some(vh.trim().parse::<f32>().ok()? / 100.0 * viewport.height);
    }
    if let Some(pct) = value.strip_suffix('%') {
        return Some(pct.trim().parse::<f32>().ok()? / 100.0 * axis_px);
    }
    value.parse::<f32>().ok()
}

pub fn width(doc: &Document, id: NodeId) -> Option<f32> {
    let value = property(doc, id, "width")?;
    resolve_length(&value, Axis::Horizontal, doc.viewport())
}

pub fn height(doc: &Document, id: NodeId) -> Option<f32> {
    let value = property(doc, id, "height")?;
    resolve_length(&value, Axis::Vertical, doc.viewport())
}

/// Font size in pixels, inherited from the nearest ancestor that declares it.
pub fn font_size(doc: &Document, id: NodeId) -> Option<f32> {
    let mut current = Some(id);
    while let Some(node) = current {
        if let Some(value) = property(doc, node, "font-size") {
            if let Some(px) = value.strip_suffix("px") {
                return px.trim().parse::<f32>().ok();
            }
            return value.parse::<f32>().ok();
        }
        current = doc.parent(node);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn doc(html: &str) -> Document {
        Document::parse(html, "https://example.com/", Viewport::default())
    }

    #[test]
    fn test_property_last_declaration_wins() {
        let d = doc("<body><div id=\"x\" style=\"color: red; color: blue\"></div></body>");
        let x = d.element_by_id("x").unwrap();
        assert_eq!(property(&d, x, "color").as_deref(), Some("blue"));
        assert_eq!(property(&d, x, "position"), None);
    }

    #[test]
    fn test_position_and_z_index() {
        let d = doc("<body><div id=\"x\" style=\"position: FIXED; z-index: 2000\"></div></body>");
        let x = d.element_by_id("x").unwrap();
        assert_eq!(position(&d, x), Position::Fixed);
        assert_eq!(z_index(&d, x), Some(2000));
    }

    #[test]
    fn test_resolve_length_units() {
        let vp = Viewport {
            width: 1000.0,
            height: 500.0,
        };
        assert_eq!(resolve_length("250px", Axis::Horizontal, vp), Some(250.0));
        assert_eq!(resolve_length("90vw", Axis::Horizontal, vp), Some(900.0));
        assert_eq!(resolve_length("90vh", Axis::Vertical, vp), Some(450.0));
        assert_eq!(resolve_length("50%", Axis::Vertical, vp), Some(250.0));
        assert_eq!(resolve_length("oops", Axis::Vertical, vp), None);
    }

    #[test]
    fn test_font_size_inherits() {
        let d = doc(
            "<body><div id=\"outer\" style=\"font-size: 9px\"><span id=\"inner\">Sponsored</span></div></body>",
        );
        let inner = d.element_by_id("inner").unwrap();
        assert_eq!(font_size(&d, inner), Some(9.0));
        let d2 = doc("<body><span id=\"plain\">text</span></body>");
        assert_eq!(font_size(&d2, d2.element_by_id("plain").unwrap()), None);
    }
}
