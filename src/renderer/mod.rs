// Draws the collected features onto the SVG page.
//
// Paint order is fixed: water-colored page, land polygons, parks, water
// features, buildings, roads. Features that do not intersect the boundary
// relation's multipolygon (when one is given) are culled before drawing.

pub mod style;
pub mod svg;

use geo::{Coord, Intersects, LineString, MultiPolygon, Polygon};
use indicatif::{ProgressBar, ProgressStyle};

use crate::coastline::Chain;
use crate::coordinate_system::page::{PageTransform, POINTS_PER_METER};
use crate::features::PolygonFeature;
use style::LineStyle;
use svg::SvgCanvas;

pub struct FeatureRenderer<'a> {
    canvas: &'a mut SvgCanvas,
    transform: PageTransform,
    boundary: Option<&'a MultiPolygon>,
}

impl<'a> FeatureRenderer<'a> {
    pub fn new(
        canvas: &'a mut SvgCanvas,
        transform: PageTransform,
        boundary: Option<&'a MultiPolygon>,
    ) -> Self {
        Self {
            canvas,
            transform,
            boundary,
        }
    }

    /// Page coordinates: projected points with the y axis flipped, since
    /// SVG grows downward while the projection grows upward.
    fn project(&self, coord: Coord) -> (f64, f64) {
        let (x, y_up) = self.transform.to_page(coord);
        (x, self.transform.height_points() - y_up)
    }

    /// Draws land chains over the water background. Closed chains are
    /// filled with the land color; an open chain marks a coastline the
    /// closure could not finish, so its endpoints get diagnostic dots
    /// (blue start, red end) instead of a fill.
    pub fn render_land(&mut self, chains: &[Chain]) {
        let progress = layer_progress(chains.len(), "Drawing coastline chains");
        for chain in chains {
            progress.inc(1);
            if chain.len() < 2 {
                continue;
            }

            let is_closed = chain.len() > 3 && chain.first() == chain.last();
            if is_closed {
                let ring: Vec<(f64, f64)> =
                    chain.iter().map(|&coord| self.project(coord)).collect();
                self.canvas.fill_path(&[ring], style::LAND_COLOR);
            } else {
                let start = self.project(chain[0]);
                let end = self.project(*chain.last().unwrap());
                self.canvas.circle(
                    start,
                    style::OPEN_CHAIN_MARKER_RADIUS,
                    style::OPEN_CHAIN_START_COLOR,
                );
                self.canvas.circle(
                    end,
                    style::OPEN_CHAIN_MARKER_RADIUS,
                    style::OPEN_CHAIN_END_COLOR,
                );
            }
        }
        progress.finish();
    }

    /// Fills polygon features, holes cut out via even-odd subpaths.
    pub fn render_polygons(&mut self, features: &[PolygonFeature], color: &str, desc: &str) {
        let progress = layer_progress(features.len(), desc);
        for feature in features {
            progress.inc(1);
            if feature.exterior.len() < 3 {
                continue;
            }
            if self.outside_boundary(&feature.exterior) {
                continue;
            }

            let mut rings: Vec<Vec<(f64, f64)>> = Vec::with_capacity(1 + feature.interiors.len());
            rings.push(feature.exterior.iter().map(|&c| self.project(c)).collect());
            for interior in &feature.interiors {
                if interior.len() >= 3 {
                    rings.push(interior.iter().map(|&c| self.project(c)).collect());
                }
            }
            self.canvas.fill_path(&rings, color);
        }
        progress.finish();
    }

    /// Strokes line features with per-feature styles.
    pub fn render_lines(&mut self, lines: &[(&[Coord], LineStyle)], desc: &str) {
        let progress = layer_progress(lines.len(), desc);
        for (coords, line_style) in lines {
            progress.inc(1);
            if coords.len() < 2 {
                continue;
            }
            if self.line_outside_boundary(coords) {
                continue;
            }

            let points: Vec<(f64, f64)> = coords.iter().map(|&c| self.project(c)).collect();
            self.canvas.stroke_polyline(
                &points,
                &line_style.color,
                line_style.width_meters * POINTS_PER_METER,
                line_style.round_cap,
            );
        }
        progress.finish();
    }

    fn outside_boundary(&self, exterior: &[Coord]) -> bool {
        let Some(boundary) = self.boundary else {
            return false;
        };
        let mut ring = exterior.to_vec();
        if ring.first() != ring.last() {
            let first = ring[0];
            ring.push(first);
        }
        let polygon = Polygon::new(LineString::new(ring), Vec::new());
        !polygon.intersects(boundary)
    }

    fn line_outside_boundary(&self, coords: &[Coord]) -> bool {
        let Some(boundary) = self.boundary else {
            return false;
        };
        !LineString::new(coords.to_vec()).intersects(boundary)
    }
}

fn layer_progress(len: usize, desc: &str) -> ProgressBar {
    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:45.white/black}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );
    progress.set_message(desc.to_string());
    progress
}
