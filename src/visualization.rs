//! SVG rendering of solved walking tours.
//!
//! Draws one panel per floor, side by side: shops as labeled circles, the
//! walking path as solid lines within a floor and dashed connectors where
//! the path changes floors, with START and END markers.

use std::fs::File;
use std::io::Write;
use std::path::Path;
#[cfg(not(feature = "resvg"))]
use std::process::Command;

#[cfg(feature = "resvg")]
use resvg::render;
#[cfg(feature = "resvg")]
use resvg::tiny_skia::{Pixmap, Transform};
#[cfg(feature = "resvg")]
use resvg::usvg;
#[cfg(feature = "resvg")]
use resvg::usvg::TreeParsing;
#[cfg(feature = "resvg")]
use resvg::FitTo;

use crate::mall::Mall;
use crate::tour::Tour;

/// SVG visualization generator.
pub struct Visualizer {
    /// Width of one floor panel
    pub panel_width: f64,
    /// Height of one floor panel
    pub panel_height: f64,
    /// Margin inside each panel
    pub margin: f64,
    /// Shop marker radius
    pub node_radius: f64,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            panel_width: 400.0,
            panel_height: 400.0,
            margin: 40.0,
            node_radius: 6.0,
        }
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the SVG document for a solved tour.
    pub fn generate_svg(&self, mall: &Mall, tour: &Tour) -> String {
        let mut floors: Vec<u32> = mall.shops.iter().map(|s| s.floor).collect();
        floors.sort_unstable();
        floors.dedup();

        let total_width = self.panel_width * floors.len().max(1) as f64;
        let total_height = self.panel_height + 40.0;

        let mut svg = String::new();
        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .shop {{ fill: #3498db; stroke: #2c3e50; stroke-width: 1.5; }}
    .start {{ fill: #2ecc71; stroke: #27ae60; stroke-width: 2; }}
    .end {{ fill: #e74c3c; stroke: #c0392b; stroke-width: 2; }}
    .edge {{ stroke: #34495e; stroke-width: 2; fill: none; }}
    .transition {{ stroke: #8e44ad; stroke-width: 1.5; stroke-dasharray: 6 4; fill: none; }}
    .label {{ font-family: Arial; font-size: 9px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
    .panel {{ fill: #ecf0f1; stroke: #bdc3c7; }}
</style>
"##,
            total_width, total_height, total_width, total_height
        ));

        svg.push_str(&format!(
            r##"<text x="{}" y="22" class="title">{} | Shops: {} | Cost: {:.2}</text>
"##,
            self.margin, mall.name, mall.len(), tour.cost
        ));

        for (panel, &floor) in floors.iter().enumerate() {
            svg.push_str(&self.render_panel(mall, panel, floor));
        }

        // Path edges: solid within a floor, dashed when the floor changes
        for pair in tour.order.windows(2) {
            let (a, b) = (&mall.shops[pair[0]], &mall.shops[pair[1]]);
            let (x1, y1) = self.project(mall, &floors, a);
            let (x2, y2) = self.project(mall, &floors, b);
            let class = if a.floor == b.floor { "edge" } else { "transition" };
            svg.push_str(&format!(
                r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" class="{}"/>
"##,
                x1, y1, x2, y2, class
            ));
        }

        // Shops on top of the edges
        for (idx, shop) in mall.shops.iter().enumerate() {
            let (x, y) = self.project(mall, &floors, shop);
            let class = if Some(&idx) == tour.order.first() {
                "start"
            } else if Some(&idx) == tour.order.last() {
                "end"
            } else {
                "shop"
            };
            svg.push_str(&format!(
                r##"<circle cx="{:.1}" cy="{:.1}" r="{}" class="{}"/>
<text x="{:.1}" y="{:.1}" class="label">{}</text>
"##,
                x, y, self.node_radius, class,
                x + self.node_radius + 2.0, y + 3.0, shop.name
            ));
        }

        if let (Some(&first), Some(&last)) = (tour.order.first(), tour.order.last()) {
            let (sx, sy) = self.project(mall, &floors, &mall.shops[first]);
            let (ex, ey) = self.project(mall, &floors, &mall.shops[last]);
            svg.push_str(&format!(
                r##"<text x="{:.1}" y="{:.1}" class="title">START</text>
<text x="{:.1}" y="{:.1}" class="title">END</text>
"##,
                sx - 20.0, sy - 10.0, ex - 12.0, ey - 10.0
            ));
        }

        svg.push_str("</svg>");
        svg
    }

    /// Panel background and floor caption.
    fn render_panel(&self, _mall: &Mall, panel: usize, floor: u32) -> String {
        let x = panel as f64 * self.panel_width + 4.0;
        let y = 34.0;
        format!(
            r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" class="panel"/>
<text x="{:.1}" y="{:.1}" class="title">Floor {}</text>
"##,
            x, y,
            self.panel_width - 8.0, self.panel_height - 4.0,
            x + 8.0, y + 18.0, floor
        )
    }

    /// Map a shop's mall coordinates into its floor panel.
    fn project(&self, mall: &Mall, floors: &[u32], shop: &crate::mall::Shop) -> (f64, f64) {
        let panel = floors.iter().position(|&f| f == shop.floor).unwrap_or(0) as f64;
        let min_x = mall.shops.iter().map(|s| s.x).fold(f64::INFINITY, f64::min);
        let max_x = mall.shops.iter().map(|s| s.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = mall.shops.iter().map(|s| s.y).fold(f64::INFINITY, f64::min);
        let max_y = mall.shops.iter().map(|s| s.y).fold(f64::NEG_INFINITY, f64::max);

        let scale_x = (self.panel_width - 2.0 * self.margin) / (max_x - min_x).max(1.0);
        let scale_y = (self.panel_height - 2.0 * self.margin) / (max_y - min_y).max(1.0);
        let scale = scale_x.min(scale_y);

        let x = panel * self.panel_width + self.margin + (shop.x - min_x) * scale;
        let y = 34.0 + self.margin + (shop.y - min_y) * scale;
        (x, y)
    }

    /// Save SVG to file.
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(svg.as_bytes())?;
        Ok(())
    }

    /// Save SVG as PNG. Uses the native resvg renderer when the feature is
    /// enabled, otherwise tries `rsvg-convert`, `magick convert`, then
    /// `inkscape`.
    pub fn save_png<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        #[cfg(feature = "resvg")]
        {
            let opt = usvg::Options::default();
            let rtree = usvg::Tree::from_str(svg, &opt)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, format!("usvg parse error: {}", e)))?;
            let mut w = self.panel_width as u32;
            let mut h = (self.panel_height + 40.0) as u32;
            if let Some(cap) = svg.split_once("width=\"") {
                if let Some(rest) = cap.1.split_once('"') {
                    if let Ok(v) = rest.0.parse::<f64>() { w = v as u32; }
                }
            }
            if let Some(cap) = svg.split_once("height=\"") {
                if let Some(rest) = cap.1.split_once('"') {
                    if let Ok(v) = rest.0.parse::<f64>() { h = v as u32; }
                }
            }
            let mut pixmap = Pixmap::new(w.max(1), h.max(1))
                .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "Failed to create pixmap"))?;
            render(&rtree, FitTo::Original, Transform::default(), pixmap.as_mut())
                .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "resvg render failed"))?;
            pixmap.save_png(path)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, format!("save_png failed: {}", e)))?;
            return Ok(());
        }

        #[cfg(not(feature = "resvg"))]
        {
            let tmp_svg = path.with_extension("svg.tmp");
            {
                let mut f = File::create(&tmp_svg)?;
                f.write_all(svg.as_bytes())?;
            }

            for (cmd, args) in [
                ("rsvg-convert", vec!["-o".to_string(), path.to_string_lossy().into_owned(), tmp_svg.to_string_lossy().into_owned()]),
                ("magick", vec!["convert".to_string(), tmp_svg.to_string_lossy().into_owned(), path.to_string_lossy().into_owned()]),
                ("inkscape", vec![tmp_svg.to_string_lossy().into_owned(), "--export-type=png".to_string(), "--export-filename".to_string(), path.to_string_lossy().into_owned()]),
            ] {
                if let Ok(status) = Command::new(cmd).args(&args).status() {
                    if status.success() {
                        let _ = std::fs::remove_file(&tmp_svg);
                        return Ok(());
                    }
                }
            }

            let _ = std::fs::remove_file(&tmp_svg);
            Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "No SVG->PNG converter succeeded (tried rsvg-convert, magick, inkscape)",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mall::Shop;
    use crate::tour::Tour;

    #[test]
    fn test_visualizer_output() {
        let mall = Mall::new(
            "viz-test",
            vec![
                Shop::new("Shop_1_1", 1, 10.0, 10.0),
                Shop::new("Shop_1_2", 1, 90.0, 90.0),
                Shop::new("Shop_2_1", 2, 50.0, 50.0),
            ],
            50.0,
        );
        let tour = Tour::from_order(&mall, vec![0, 1, 2], "test");

        let viz = Visualizer::new();
        let svg = viz.generate_svg(&mall, &tour);

        assert!(svg.contains("<svg"));
        assert!(svg.contains("viz-test"));
        assert!(svg.contains("Floor 1"));
        assert!(svg.contains("Floor 2"));
        assert!(svg.contains("START"));
        assert!(svg.contains("END"));
        // One floor change in the path
        assert_eq!(svg.matches("class=\"transition\"").count(), 1);
    }

    #[cfg(feature = "resvg")]
    #[test]
    fn test_png_rendering() {
        let mall = Mall::new(
            "png-test",
            vec![
                Shop::new("Shop_1_1", 1, 10.0, 10.0),
                Shop::new("Shop_1_2", 1, 90.0, 90.0),
            ],
            50.0,
        );
        let tour = Tour::from_order(&mall, vec![0, 1], "test");

        let viz = Visualizer::new();
        let svg = viz.generate_svg(&mall, &tour);
        let path = std::env::temp_dir().join(format!("tour_png_{}.png", std::process::id()));
        viz.save_png(&svg, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        // PNG magic number
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
        std::fs::remove_file(&path).ok();
    }
}
