// The house map palette, shared by every layer.

pub const WATER_COLOR: &str = "#87ceeb";
pub const LAND_COLOR: &str = "#f2f2f2";
pub const BUILDING_COLOR: &str = "#d9d9d9";
pub const PARK_COLOR: &str = "#b2caae";
/// Park interiors (holes rendered as their own areas) are slightly lighter
/// than the main park color.
pub const PARK_INTERIOR_COLOR: &str = "#cce6cc";
pub const PEDESTRIAN_AREA_COLOR: &str = "#dddde8";

/// Endpoint markers for land chains that could not be closed.
pub const OPEN_CHAIN_START_COLOR: &str = "#0000ff";
pub const OPEN_CHAIN_END_COLOR: &str = "#ff0000";
pub const OPEN_CHAIN_MARKER_RADIUS: f64 = 5.0;

/// Stroke styling for one line layer. Widths are real-world meters and are
/// scaled to page points at draw time.
#[derive(Clone, Debug)]
pub struct LineStyle {
    pub color: String,
    pub width_meters: f64,
    pub round_cap: bool,
}

/// Road stroke style by importance level: majors darker and wider.
pub fn road_style(hierarchy: u8) -> LineStyle {
    LineStyle {
        color: gray(0.3 + f64::from(hierarchy) * 0.1),
        width_meters: road_width_meters(hierarchy),
        round_cap: true,
    }
}

pub fn river_style() -> LineStyle {
    LineStyle {
        color: WATER_COLOR.to_string(),
        width_meters: 2.0,
        round_cap: false,
    }
}

fn road_width_meters(hierarchy: u8) -> f64 {
    match hierarchy {
        // Motorway through tertiary: multiple lanes plus shoulders.
        1..=5 => 8.0,
        6 => 6.0,
        8 => 1.5,
        _ => 4.0,
    }
}

fn gray(level: f64) -> String {
    let channel = (level.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{channel:02x}{channel:02x}{channel:02x}")
}
