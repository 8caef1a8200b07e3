mod animation;
pub mod config_reader;
mod figure_json;
mod io_common;
mod io_csv;

use log::{debug, info, warn};

use countermeasure_maps::*;
use snafu::{prelude::*, Snafu};

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::{Args, Command};
use crate::cm::config_reader::*;

#[derive(Debug, Snafu)]
pub enum CmError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error downloading {url}"))]
    Download { source: reqwest::Error, url: String },
    #[snafu(display("Error downloading {url}: HTTP status {status}"))]
    HttpStatus { url: String, status: u16 },
    #[snafu(display("Error reading the CSV header"))]
    CsvHeader { source: csv::Error },
    #[snafu(display("Error reading CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Invalid countermeasure data: {source}"))]
    Map { source: MapErrors },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error encoding image {path}"))]
    Image {
        source: image::ImageError,
        path: String,
    },
    #[snafu(display("No frame found in {dir}"))]
    NoFrames { dir: String },
    #[snafu(display("Could not start command {command}"))]
    RasterCommand {
        source: std::io::Error,
        command: String,
    },
    #[snafu(display("Command {command} failed: {status}"))]
    RasterFailed { command: String, status: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type CmResult<T> = Result<T, CmError>;

/// Reads the data sources and builds the dashboard.
pub fn load_dashboard(settings: &Settings) -> CmResult<Dashboard> {
    let contents = io_common::read_source(&settings.data)?;
    let table = io_csv::read_countermeasures(&contents)?;
    let dashboard = Dashboard::new(table);

    if let Some(iso_source) = settings.iso_codes.as_ref() {
        let iso_contents = io_common::read_source(iso_source)?;
        let codes = io_csv::read_iso_codes(&iso_contents)?;
        let unmatched = unmatched_countries(&dashboard, &codes);
        if !unmatched.is_empty() {
            warn!(
                "{} regions are not known ISO 3166 alpha-3 codes and will not be drawn: {:?}",
                unmatched.len(),
                unmatched
            );
        }
    }
    Ok(dashboard)
}

/// The identifiers classified as countries that are not found in the reference codes.
pub fn unmatched_countries(dashboard: &Dashboard, alpha_3_codes: &HashSet<String>) -> Vec<String> {
    let rows = &dashboard.table().rows;
    dashboard
        .partition()
        .world
        .iter()
        .map(|idx| &rows[*idx].region_id)
        .filter(|id| !alpha_3_codes.contains(id.as_str()))
        .cloned()
        .collect()
}

/// The day to show when none is requested: today if the data covers it, the latest day otherwise.
fn default_date(dashboard: &Dashboard) -> CmResult<String> {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    if dashboard.table().date_index(&today).is_some() {
        return Ok(today);
    }
    match dashboard.latest_date() {
        Some(d) => {
            warn!("No data for today ({}), using the latest day {}", today, d);
            Ok(d.to_string())
        }
        None => Err(CmError::Map {
            source: MapErrors::EmptyTable,
        }),
    }
}

pub fn run_render(
    settings: &Settings,
    dashboard: &Dashboard,
    date: Option<String>,
    out: Option<String>,
    html: bool,
    reference: Option<String>,
) -> CmResult<()> {
    let date = match date {
        Some(d) => d,
        None => default_date(dashboard)?,
    };
    info!(
        "Rendering {} with palette {} and projection {}",
        date, settings.palette, settings.projection
    );
    let fig = dashboard
        .render(&date, settings.palette, settings.projection)
        .context(MapSnafu {})?;
    let fig_js = figure_json::figure_to_json(&fig);
    let pretty_js = serde_json::to_string_pretty(&fig_js).context(ParsingJsonSnafu {})?;

    let output = if html {
        figure_json::figure_to_html(&fig, &fig_js)
    } else {
        pretty_js.clone()
    };
    match out.as_deref() {
        None | Some("") | Some("stdout") => {
            println!("{}", output);
        }
        Some(path) => {
            fs::write(path, output).context(WritingFileSnafu { path })?;
            info!("Figure written to {}", path);
        }
    }

    // The reference figure, if provided for comparison
    if let Some(reference_p) = reference {
        let reference_js = read_reference(&reference_p)?;
        let pretty_reference =
            serde_json::to_string_pretty(&reference_js).context(ParsingJsonSnafu {})?;
        if pretty_reference != pretty_js {
            warn!("Found differences with the reference figure");
            print_diff(pretty_reference.as_str(), pretty_js.as_str(), "\n");
            whatever!("Difference detected between the rendered figure and the reference figure")
        }
        info!("The figure matches the reference {}", reference_p);
    }
    Ok(())
}

fn read_reference(path: &str) -> CmResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    serde_json::from_str(&contents).context(ParsingJsonSnafu {})
}

/// Writes one figure per day, in increasing order of the days. Returns the paths of the figures.
pub fn run_frames(settings: &Settings, dashboard: &Dashboard) -> CmResult<Vec<PathBuf>> {
    let out_dir = settings.output_directory.as_path();
    fs::create_dir_all(out_dir).context(WritingFileSnafu {
        path: out_dir.display().to_string(),
    })?;
    let dates = dashboard.dates(settings.until.as_deref());
    info!(
        "Writing {} frames to {:?} (palette {}, projection {})",
        dates.len(),
        out_dir,
        settings.palette,
        settings.projection
    );
    let mut res: Vec<PathBuf> = Vec::new();
    for date in dates {
        let fig = dashboard
            .render(date, settings.palette, settings.projection)
            .context(MapSnafu {})?;
        let fig_js = figure_json::figure_to_json(&fig);
        let p = out_dir.join(io_common::frame_file_name(date, "json"));
        let contents = serde_json::to_string(&fig_js).context(ParsingJsonSnafu {})?;
        fs::write(&p, contents).context(WritingFileSnafu {
            path: p.display().to_string(),
        })?;
        debug!("run_frames: wrote {:?}", p);
        if let Some(command) = settings.raster_command.as_ref() {
            let image_p = out_dir.join(io_common::frame_file_name(date, "png"));
            animation::rasterize_frame(command, &p, &image_p)?;
        }
        res.push(p);
    }
    Ok(res)
}

/// Assembles the PNG frames of the output directory into an animation. Returns the path of the animation.
pub fn run_animate(settings: &Settings) -> CmResult<PathBuf> {
    let dir = settings.output_directory.as_path();
    let frames = animation::collect_frames(dir)?;
    let out = dir.join(io_common::animation_file_name(settings.projection));
    info!("Assembling {} frames into {:?}", frames.len(), out);
    animation::assemble_gif(&frames, &out)?;
    Ok(out)
}

pub fn run(args: &Args) -> CmResult<()> {
    let config = match args.config.as_ref() {
        Some(p) => Some(read_config(Path::new(p))?),
        None => None,
    };
    debug!("config: {:?}", config);
    let settings = Settings::resolve(args, config.as_ref())?;
    info!("settings: {:?}", settings);

    match args.command.clone() {
        Command::Render {
            date,
            out,
            html,
            reference,
            ..
        } => {
            let dashboard = load_dashboard(&settings)?;
            run_render(&settings, &dashboard, date, out, html, reference)
        }
        Command::Frames { .. } => {
            let dashboard = load_dashboard(&settings)?;
            let frames = run_frames(&settings, &dashboard)?;
            info!("Wrote {} frames", frames.len());
            Ok(())
        }
        Command::Animate { .. } => {
            let out = run_animate(&settings)?;
            println!("{}", out.display());
            Ok(())
        }
        Command::Dates { .. } => {
            let dashboard = load_dashboard(&settings)?;
            for d in dashboard.dates(settings.until.as_deref()) {
                println!("{}", d);
            }
            Ok(())
        }
        Command::Palettes => {
            for p in Palette::ALL {
                println!("{}: {}", p.name(), p.sample(NUM_LEVELS).join(" "));
            }
            Ok(())
        }
    }
}
