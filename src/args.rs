use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments parser
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// OSM PBF extract to render (required)
    #[arg(long)]
    pub file: PathBuf,

    /// Bounding box of the map window: "min_lat,min_lng,max_lat,max_lng" (required)
    #[arg(long)]
    pub bbox: String,

    /// OSM relation id whose multipolygon culls rendered features (optional)
    #[arg(long)]
    pub boundary_relation: Option<i64>,

    /// Output SVG path (optional)
    #[arg(long, default_value = "map.svg")]
    pub output: PathBuf,

    /// Enable debug logging (optional)
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    pub debug: bool,
}

/// Checks everything that does not need the dataset open.
pub fn validate_args(args: &Args) -> Result<(), String> {
    if !args.file.exists() {
        return Err(format!(
            "No OSM extract found at {}",
            args.file.display()
        ));
    }

    args.bbox
        .parse::<crate::coordinate_system::geographic::LLBBox>()
        .map(|_| ())
}
