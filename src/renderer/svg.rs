// Minimal SVG backend: the page is built as a string body between a fixed
// header and footer. Coordinates arrive already projected to page points,
// y growing downward.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct SvgCanvas {
    width: f64,
    height: f64,
    body: String,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    /// Fills the whole page with one color.
    pub fn fill_page(&mut self, color: &str) {
        self.body.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{color}\"/>\n"
        ));
    }

    /// Fills a path of one or more rings. Rings after the first become
    /// holes under the even-odd fill rule.
    pub fn fill_path(&mut self, rings: &[Vec<(f64, f64)>], color: &str) {
        let data = path_data(rings, true);
        if data.is_empty() {
            return;
        }
        self.body.push_str(&format!(
            "<path d=\"{data}\" fill=\"{color}\" fill-rule=\"evenodd\" stroke=\"none\"/>\n"
        ));
    }

    /// Strokes an open polyline.
    pub fn stroke_polyline(&mut self, points: &[(f64, f64)], color: &str, width: f64, round_cap: bool) {
        if points.len() < 2 {
            return;
        }
        let data = path_data(&[points.to_vec()], false);
        let caps = if round_cap {
            " stroke-linecap=\"round\" stroke-linejoin=\"round\""
        } else {
            ""
        };
        self.body.push_str(&format!(
            "<path d=\"{data}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{width:.2}\"{caps}/>\n"
        ));
    }

    /// A filled circle, used for the open-chain endpoint markers.
    pub fn circle(&mut self, center: (f64, f64), radius: f64, color: &str) {
        self.body.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{radius:.2}\" fill=\"{color}\" stroke=\"{color}\"/>\n",
            center.0, center.1
        ));
    }

    pub fn to_svg_string(&self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n\
             <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.2}\" height=\"{h:.2}\" viewBox=\"0 0 {w:.2} {h:.2}\">\n\
             {body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body
        )
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(self.to_svg_string().as_bytes())?;
        writer.flush()
    }
}

/// "M x,y L x,y ..." per ring, with a closing "Z" for filled rings.
fn path_data(rings: &[Vec<(f64, f64)>], close: bool) -> String {
    let mut data = String::new();
    for ring in rings {
        if ring.is_empty() {
            continue;
        }
        if !data.is_empty() {
            data.push(' ');
        }
        data.push_str(&format!("M{:.2},{:.2}", ring[0].0, ring[0].1));
        for &(x, y) in &ring[1..] {
            data.push_str(&format!(" L{x:.2},{y:.2}"));
        }
        if close {
            data.push('Z');
        }
    }
    data
}
