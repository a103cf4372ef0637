//! Visualization utilities for TSP tours.
//!
//! Generates SVG drawings of a closed tour, optionally over a background map
//! image, and plain-text exports for external plotting.

use crate::tour::{City, Tour};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Background image the tour is drawn on.
///
/// City coordinates are interpreted as pixel positions in this image.
#[derive(Debug, Clone, PartialEq)]
pub struct MapBackground {
    /// Image location as referenced from the SVG (path or URL)
    pub href: String,
    /// Image width in pixels
    pub width: f64,
    /// Image height in pixels
    pub height: f64,
}

impl MapBackground {
    pub fn new(href: impl Into<String>, width: f64, height: f64) -> Self {
        MapBackground {
            href: href.into(),
            width,
            height,
        }
    }
}

/// SVG visualization generator
#[derive(Debug, Clone)]
pub struct Visualizer {
    /// Canvas width (ignored when a background is set)
    pub width: f64,
    /// Canvas height (ignored when a background is set)
    pub height: f64,
    /// Margin
    pub margin: f64,
    /// City marker radius
    pub node_radius: f64,
    /// Outer radius of the starting-city star
    pub star_radius: f64,
    /// Optional map drawn under the tour
    pub background: Option<MapBackground>,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            width: 800.0,
            height: 800.0,
            margin: 50.0,
            node_radius: 5.0,
            star_radius: 12.0,
            background: None,
        }
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(background: MapBackground) -> Self {
        Visualizer {
            background: Some(background),
            ..Self::default()
        }
    }

    fn canvas_size(&self) -> (f64, f64) {
        match &self.background {
            Some(bg) => (bg.width, bg.height),
            None => (self.width, self.height),
        }
    }

    /// Maps problem coordinates to canvas coordinates.
    ///
    /// Over a background map coordinates are already pixels; otherwise they are
    /// scaled to the canvas with the y axis pointing up.
    fn transform(&self, tour: &Tour) -> impl Fn(f64, f64) -> (f64, f64) {
        let background = self.background.is_some();
        let (min_x, max_x, min_y, max_y) = self.get_bounds(tour);
        let scale_x = (self.width - 2.0 * self.margin) / (max_x - min_x).max(1.0);
        let scale_y = (self.height - 2.0 * self.margin) / (max_y - min_y).max(1.0);
        let scale = scale_x.min(scale_y);
        let margin = self.margin;
        let height = self.height;

        move |x: f64, y: f64| {
            if background {
                (x, y)
            } else {
                (margin + (x - min_x) * scale, height - margin - (y - min_y) * scale)
            }
        }
    }

    /// Generate an SVG drawing of a tour.
    ///
    /// The loop is closed back to its first city, `starting_city` is marked with
    /// a yellow star and `caption` (if not empty) is written as the title.
    pub fn generate_svg(&self, tour: &Tour, starting_city: &City, caption: &str) -> String {
        let mut svg = String::new();
        let (width, height) = self.canvas_size();
        let transform = self.transform(tour);

        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .node {{ fill: #3498db; stroke: #2c3e50; stroke-width: 1; }}
    .start {{ fill: #f1c40f; stroke: #b7950b; stroke-width: 1; }}
    .edge {{ stroke: #1f77b4; stroke-width: 2; fill: none; }}
    .label {{ font-family: Arial; font-size: 10px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 16px; fill: #2c3e50; font-weight: bold; }}
</style>
"##,
            width, height, width, height
        ));

        match &self.background {
            Some(bg) => svg.push_str(&format!(
                r##"<image href="{}" x="0" y="0" width="{}" height="{}"/>
"##,
                escape_xml(&bg.href),
                bg.width,
                bg.height
            )),
            None => svg.push_str(
                r##"<rect width="100%" height="100%" fill="#ecf0f1"/>
"##,
            ),
        }

        if !caption.is_empty() {
            svg.push_str(&format!(
                r##"<text x="{}" y="25" class="title" text-anchor="middle">{}</text>
"##,
                width / 2.0,
                escape_xml(caption)
            ));
        }

        let mut points: Vec<(f64, f64)> = tour.cities().map(|c| transform(c.x, c.y)).collect();
        if let Some(&first) = points.first() {
            points.push(first);
        }
        let points_attr: Vec<String> = points.iter().map(|(x, y)| format!("{:.2},{:.2}", x, y)).collect();
        svg.push_str(&format!(
            r##"<polyline points="{}" class="edge"/>
"##,
            points_attr.join(" ")
        ));

        for city in tour.cities() {
            let (x, y) = transform(city.x, city.y);
            svg.push_str(&format!(
                r##"<circle cx="{:.2}" cy="{:.2}" r="{}" class="node"/>
"##,
                x, y, self.node_radius
            ));
            svg.push_str(&format!(
                r##"<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>
"##,
                x,
                y - self.node_radius - 3.0,
                escape_xml(&city.name)
            ));
        }

        let (sx, sy) = transform(starting_city.x, starting_city.y);
        svg.push_str(&format!(
            r##"<polygon points="{}" class="start"/>
"##,
            star_points(sx, sy, self.star_radius)
        ));

        svg.push_str("</svg>");

        svg
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(svg.as_bytes())?;
        Ok(())
    }

    /// Get coordinate bounds
    fn get_bounds(&self, tour: &Tour) -> (f64, f64, f64, f64) {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for city in tour.cities() {
            min_x = min_x.min(city.x);
            max_x = max_x.max(city.x);
            min_y = min_y.min(city.y);
            max_y = max_y.max(city.y);
        }

        (min_x, max_x, min_y, max_y)
    }

    /// Export data for external plotting (e.g., matplotlib)
    pub fn export_plot_data(&self, tour: &Tour, starting_city: &City) -> String {
        let mut data = String::new();

        data.push_str("# TSP Tour Data\n");
        data.push_str(&format!("# Cost: {:.2}\n", tour.cost()));
        data.push_str(&format!("# Start: {}\n\n", starting_city.name));

        data.push_str("# Path: name, x, y (closed back to the first city)\n");
        for city in tour.cities().chain(tour.cities().take(1)) {
            data.push_str(&format!("{},{},{}\n", city.name, city.x, city.y));
        }

        data
    }
}

/// Ten-vertex star outline centred on `(cx, cy)`
fn star_points(cx: f64, cy: f64, radius: f64) -> String {
    let inner = radius * 0.4;
    (0..10)
        .map(|k| {
            let r = if k % 2 == 0 { radius } else { inner };
            let angle = -std::f64::consts::FRAC_PI_2 + k as f64 * std::f64::consts::PI / 5.0;
            format!("{:.2},{:.2}", cx + r * angle.cos(), cy + r * angle.sin())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_tour() -> Tour {
        Tour::new(vec![
            City::new("Atlanta", 585.6, 376.8),
            City::new("Austin", 389.7, 448.5),
            City::new("Boston", 946.0, 135.6),
        ])
        .unwrap()
    }

    #[test]
    fn test_visualizer() {
        let tour = create_test_tour();
        let viz = Visualizer::new();
        let svg = viz.generate_svg(&tour, tour.city(0), "1234 Miles after optimization");

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("class=\"start\""));
        assert!(svg.contains("1234 Miles after optimization"));
        assert!(svg.contains("Boston"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_path_is_closed() {
        let tour = create_test_tour();
        let svg = Visualizer::new().generate_svg(&tour, tour.city(0), "");
        let line = svg.lines().find(|l| l.starts_with("<polyline")).unwrap();
        let points = line.split('"').nth(1).unwrap();
        let coords: Vec<&str> = points.split(' ').collect();
        assert_eq!(coords.len(), 4);
        assert_eq!(coords.first(), coords.last());
        assert!(!svg.contains("class=\"title\""));
    }

    #[test]
    fn test_background_uses_pixel_coordinates() {
        let tour = create_test_tour();
        let viz = Visualizer::with_background(MapBackground::new("map.png", 1100.0, 700.0));
        let svg = viz.generate_svg(&tour, tour.city(0), "");

        assert!(svg.contains(r#"<image href="map.png""#));
        assert!(svg.contains(r#"width="1100" height="700""#));
        assert!(svg.contains(r#"cx="585.60" cy="376.80""#));
    }

    #[test]
    fn test_labels_are_escaped() {
        let tour = Tour::new(vec![
            City::new("A&B", 0.0, 0.0),
            City::new("<C>", 1.0, 0.0),
            City::new("D", 1.0, 1.0),
        ])
        .unwrap();
        let svg = Visualizer::new().generate_svg(&tour, tour.city(0), "");
        assert!(svg.contains("A&amp;B"));
        assert!(svg.contains("&lt;C&gt;"));
    }

    #[test]
    fn test_export_plot_data() {
        let tour = create_test_tour();
        let data = Visualizer::new().export_plot_data(&tour, tour.city(0));
        let rows: Vec<&str> = data.lines().filter(|l| !l.starts_with('#') && !l.is_empty()).collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], rows[3]);
        assert!(data.contains("# Start: Atlanta"));
    }
}
