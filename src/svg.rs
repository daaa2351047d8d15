//! SVG visualization of a resolved layout.
//!
//! Draws two panels stacked vertically: the physical arrangement (millimeters)
//! as resolved, and the pixel arrangement as reported by the display server.
//! Each display is a labelled box; the primary display is highlighted.
//!
//! # Example
//!
//! ```
//! use spanwall::{DisplayRecord, LayoutHints, resolve, svg::render_layout_svg};
//!
//! let layout = resolve(
//!     &[
//!         DisplayRecord::new("DP-1", 0, 0, 1920, 1080).primary(),
//!         DisplayRecord::new("HDMI-1", 1920, 0, 1280, 1024),
//!     ],
//!     &LayoutHints::new(),
//! );
//!
//! let svg = render_layout_svg(&layout);
//! assert!(svg.contains("DP-1"));
//! ```

use crate::geometry::{MmRect, PixelRect};
use crate::resolve::ResolvedLayout;

/// Maximum width for any panel in the SVG output.
const MAX_PANEL_W: f64 = 480.0;
/// Maximum height for any panel in the SVG output.
const MAX_PANEL_H: f64 = 240.0;
/// Vertical gap between panels.
const PANEL_GAP: f64 = 40.0;
/// Horizontal margin.
const MARGIN_X: f64 = 30.0;
/// Top margin for first panel.
const MARGIN_TOP: f64 = 30.0;
/// Height of label text area above each panel.
const LABEL_H: f64 = 22.0;

/// One panel: a bounding box and the display boxes inside it.
struct Panel {
    label: String,
    bounds: MmRect,
    boxes: Vec<DisplayBox>,
}

struct DisplayBox {
    rect: MmRect,
    name: String,
    annotation: String,
    primary: bool,
}

/// Render a complete SVG document showing the physical and pixel layouts.
pub fn render_layout_svg(layout: &ResolvedLayout) -> String {
    let panels = build_panels(layout);
    render_panels(&panels)
}

fn build_panels(layout: &ResolvedLayout) -> Vec<Panel> {
    let (Some(mm), Some(px)) = (layout.mm_bounds(), layout.pixel_bounds()) else {
        return Vec::new();
    };

    let physical = Panel {
        label: format!("Physical  {:.0}×{:.0} mm", mm.width, mm.height),
        bounds: mm,
        boxes: layout
            .iter()
            .map(|d| DisplayBox {
                rect: d.mm_rect,
                name: String::from(d.name()),
                annotation: format!(
                    "{:.0}×{:.0} mm, {} {}",
                    d.mm_rect.width,
                    d.mm_rect.height,
                    d.x.mode,
                    d.y.mode
                ),
                primary: d.is_primary(),
            })
            .collect(),
    };

    let pixel = Panel {
        label: format!("Pixels  {}×{}", px.width, px.height),
        bounds: px.to_f64(),
        boxes: layout
            .iter()
            .map(|d| {
                let r: PixelRect = d.rect();
                DisplayBox {
                    rect: r.to_f64(),
                    name: String::from(d.name()),
                    annotation: format!("{}×{}+{}+{}", r.width, r.height, r.x, r.y),
                    primary: d.is_primary(),
                }
            })
            .collect(),
    };

    vec![physical, pixel]
}

/// Scale factor fitting `bounds` within MAX_PANEL_W × MAX_PANEL_H.
fn scale_to_fit(bounds: &MmRect) -> f64 {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return 1.0;
    }
    (MAX_PANEL_W / bounds.width).min(MAX_PANEL_H / bounds.height)
}

fn render_panels(panels: &[Panel]) -> String {
    if panels.is_empty() {
        return String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#);
    }

    let n = panels.len() as f64;
    let total_h = 2.0 * MARGIN_TOP + n * (LABEL_H + MAX_PANEL_H) + (n - 1.0) * PANEL_GAP;
    let total_w = MAX_PANEL_W + 2.0 * MARGIN_X;

    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        total_w as u32, total_h as u32, total_w, total_h
    ));
    svg.push('\n');

    svg.push_str(r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .name { font-size: 12px; fill: #fff; }
  .annotation { font-size: 10px; fill: #dde; }
  .outer { fill: #e8e8e8; stroke: #999; stroke-width: 1; stroke-dasharray: 4,2; }
  .display { fill: #6ba3d6; stroke: #2c6faa; stroke-width: 1.5; }
  .primary { fill: #d6a36b; stroke: #aa6f2c; stroke-width: 1.5; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .outer { fill: #2d2d2d; stroke: #555; }
    .display { fill: #3a72a4; stroke: #5a9fd4; }
    .primary { fill: #a4723a; stroke: #d49f5a; }
  }
</style>
"##);

    let center_x = total_w / 2.0;
    let mut y = MARGIN_TOP;

    for panel in panels {
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
            center_x,
            y + 14.0,
            escape_xml(&panel.label)
        ));
        svg.push('\n');
        y += LABEL_H;

        let scale = scale_to_fit(&panel.bounds);
        let panel_x = center_x - panel.bounds.width * scale / 2.0;
        let panel_y = y;

        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="outer"/>"#,
            panel_x,
            panel_y,
            panel.bounds.width * scale,
            panel.bounds.height * scale
        ));
        svg.push('\n');

        for b in &panel.boxes {
            let bx = panel_x + (b.rect.x - panel.bounds.x) * scale;
            let by = panel_y + (b.rect.y - panel.bounds.y) * scale;
            let bw = b.rect.width * scale;
            let bh = b.rect.height * scale;
            let class = if b.primary { "primary" } else { "display" };
            svg.push_str(&format!(
                r#"<rect x="{bx:.1}" y="{by:.1}" width="{bw:.1}" height="{bh:.1}" class="{class}" rx="2"/>"#
            ));
            svg.push('\n');
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" class="name" text-anchor="middle">{}</text>"#,
                bx + bw / 2.0,
                by + bh / 2.0,
                escape_xml(&b.name)
            ));
            svg.push('\n');
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" class="annotation" text-anchor="middle">{}</text>"#,
                bx + bw / 2.0,
                by + bh / 2.0 + 14.0,
                escape_xml(&b.annotation)
            ));
            svg.push('\n');
        }

        y += MAX_PANEL_H + PANEL_GAP;
    }

    svg.push_str("</svg>\n");
    svg
}

/// Escape special characters for XML text content.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutHints;
    use crate::display::DisplayRecord;
    use crate::resolve::resolve;

    fn layout() -> ResolvedLayout {
        resolve(
            &[
                DisplayRecord::new("DP-1", 0, 0, 1920, 1080)
                    .with_size_mm(600.0, 340.0)
                    .primary(),
                DisplayRecord::new("HDMI-1", 1920, 0, 1280, 1024).with_size_mm(380.0, 300.0),
            ],
            &LayoutHints::new(),
        )
    }

    #[test]
    fn svg_has_both_panels() {
        let svg = render_layout_svg(&layout());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
        assert!(svg.contains("Physical  980×340 mm"));
        assert!(svg.contains("Pixels  3200×1080"));
    }

    #[test]
    fn svg_labels_every_display() {
        let svg = render_layout_svg(&layout());
        assert_eq!(svg.matches(">DP-1<").count(), 2);
        assert_eq!(svg.matches(">HDMI-1<").count(), 2);
        assert!(svg.contains("1280×1024+1920+0"));
        assert_eq!(svg.matches(r#"class="primary""#).count(), 2);
    }

    #[test]
    fn svg_empty_layout() {
        let svg = render_layout_svg(&ResolvedLayout::default());
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn svg_escapes_names() {
        let layout = resolve(
            &[DisplayRecord::new("a<b>&c", 0, 0, 100, 100)],
            &LayoutHints::new(),
        );
        let svg = render_layout_svg(&layout);
        assert!(svg.contains("a&lt;b&gt;&amp;c"));
        assert!(!svg.contains("<<"));
    }

    #[test]
    #[ignore] // run with: cargo test --features svg -- --ignored write_sample_svg --nocapture
    fn write_sample_svg() {
        let path = std::env::temp_dir().join("spanwall-sample.svg");
        std::fs::write(&path, render_layout_svg(&layout())).unwrap();
        println!("wrote {}", path.display());
    }
}
