//! Export a rendered chart as SVG or PNG.
//!
//! The SVG is built directly from the surface elements (and the overlay when
//! it is visible). PNG output rasterizes that SVG with resvg.

use std::fmt::Write as _;
use std::path::Path;

use egui::Color32;
use image::{Rgba, RgbaImage};

use crate::chart::Streamgraph;
use crate::error::{Result, StreamgraphError};
use crate::events::{ChartEvent, EventKind};
use crate::overlay::Overlay;
use crate::surface::{AxisElement, AxisOrientation, Element};

const FONT_SIZE: f32 = 11.0;
const AXIS_COLOR: &str = "#333333";

fn hex(c: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r(), c.g(), c.b())
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serialize the chart as a standalone SVG document.
pub fn to_svg(chart: &Streamgraph) -> String {
    let size = chart.surface().size();
    let mut s = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(
        s,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="{FONT_SIZE}">"#,
        w = size.x,
        h = size.y
    );
    let _ = writeln!(s, r#"<rect width="100%" height="100%" fill="white"/>"#);

    for element in chart.surface().elements() {
        match element {
            Element::Layer(l) => {
                let _ = writeln!(
                    s,
                    r#"<path class="layer" data-series="{}" d="{}" fill="{}" fill-opacity="{:.2}"/>"#,
                    escape(l.series.as_str()),
                    l.shape.path.to_svg_data(),
                    hex(l.color),
                    l.opacity
                );
            }
            Element::Axis(a) => write_axis(&mut s, a),
            Element::Legend(legend) => {
                for e in &legend.entries {
                    let _ = writeln!(
                        s,
                        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
                        e.swatch.min.x,
                        e.swatch.min.y,
                        e.swatch.width(),
                        e.swatch.height(),
                        hex(e.color)
                    );
                    let _ = writeln!(
                        s,
                        r#"<text x="{:.2}" y="{:.2}" dominant-baseline="middle">{}</text>"#,
                        e.label_pos.x,
                        e.label_pos.y,
                        escape(e.series.as_str())
                    );
                }
            }
        }
    }

    if let Some(overlay) = chart.overlay().get().filter(|o| o.is_visible()) {
        write_overlay(&mut s, overlay);
    }
    s.push_str("</svg>\n");
    s
}

fn write_axis(s: &mut String, a: &AxisElement) {
    let _ = writeln!(
        s,
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{AXIS_COLOR}"/>"#,
        a.from.x, a.from.y, a.to.x, a.to.y
    );
    for t in &a.ticks {
        let end = a.tick_end(t.anchor);
        let _ = writeln!(
            s,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{AXIS_COLOR}"/>"#,
            t.anchor.x, t.anchor.y, end.x, end.y
        );
        let (anchor, baseline, x, y) = match a.orientation {
            AxisOrientation::Bottom => ("middle", "hanging", end.x, end.y + 2.0),
            AxisOrientation::Left => ("end", "middle", end.x - 2.0, end.y),
        };
        let _ = writeln!(
            s,
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="{anchor}" dominant-baseline="{baseline}">{}</text>"#,
            escape(&t.label)
        );
    }
}

fn write_overlay(s: &mut String, overlay: &Overlay) {
    let p = overlay.position();
    let size = overlay.size();
    let _ = writeln!(
        s,
        r#"<g class="overlay" transform="translate({:.2},{:.2})">"#,
        p.x, p.y
    );
    let _ = writeln!(
        s,
        r##"<rect width="{:.2}" height="{:.2}" fill="white" stroke="#999999" rx="4"/>"##,
        size.x, size.y
    );
    if let Some(chart) = overlay.content() {
        let _ = writeln!(
            s,
            r#"<text x="{:.2}" y="4" text-anchor="middle" dominant-baseline="hanging">{}</text>"#,
            size.x / 2.0,
            escape(chart.series().as_str())
        );
        for bar in &chart.bars {
            let _ = writeln!(
                s,
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
                bar.rect.min.x,
                bar.rect.min.y,
                bar.rect.width(),
                bar.rect.height(),
                hex(chart.color)
            );
            let _ = writeln!(
                s,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="hanging">{}</text>"#,
                bar.label_pos.x,
                bar.label_pos.y,
                escape(&bar.label)
            );
        }
        let [a, b] = chart.baseline;
        let _ = writeln!(
            s,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{AXIS_COLOR}"/>"#,
            a.x, a.y, b.x, b.y
        );
        for (y, label) in &chart.value_ticks {
            let _ = writeln!(
                s,
                r#"<text x="{:.2}" y="{y:.2}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
                a.x - 4.0,
                escape(label)
            );
        }
    }
    s.push_str("</g>\n");
}

/// Rasterize the chart into an RGBA image.
pub fn to_image(chart: &Streamgraph) -> Result<RgbaImage> {
    let svg = to_svg(chart);
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(&svg, &opt)?;
    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(StreamgraphError::Raster { width, height })?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let mut out = RgbaImage::new(width, height);
    for (i, px) in pixmap.pixels().iter().enumerate() {
        let c = px.demultiply();
        let (x, y) = (i as u32 % width, i as u32 / width);
        out.put_pixel(x, y, Rgba([c.red(), c.green(), c.blue(), c.alpha()]));
    }
    Ok(out)
}

pub fn save_svg(chart: &Streamgraph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, to_svg(chart))?;
    log::info!("exported SVG to {}", path.display());
    notify(chart, "svg", path);
    Ok(())
}

pub fn save_png(chart: &Streamgraph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    to_image(chart)?.save(path)?;
    log::info!("exported PNG to {}", path.display());
    notify(chart, "png", path);
    Ok(())
}

fn notify(chart: &Streamgraph, format: &str, path: &Path) {
    let mut event = ChartEvent::new(EventKind::EXPORT);
    event.export = Some((format.to_string(), path.display().to_string()));
    chart.emit(event);
}
