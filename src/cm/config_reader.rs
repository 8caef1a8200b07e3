use crate::cm::*;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/OlivierLej/Coronavirus_CounterMeasures/master/dataset.csv";
pub const DEFAULT_ISO_CODES_URL: &str = "https://raw.githubusercontent.com/lukes/ISO-3166-Countries-with-Regional-Codes/master/all/all.csv";

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataSources {
    pub countermeasures: Option<String>,
    #[serde(rename = "isoCodes")]
    pub iso_codes: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    pub palette: Option<String>,
    pub projection: Option<String>,
    pub until: Option<String>,
    #[serde(rename = "rasterCommand")]
    pub raster_command: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct CmConfig {
    #[serde(rename = "dataSources", default)]
    pub data_sources: DataSources,
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
}

pub fn read_config(path: &Path) -> CmResult<CmConfig> {
    let p = path.display().to_string();
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path: p })?;
    let config: CmConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Checks that a day is written `YYYY-MM-DD`, the form of the dates of the dataset.
pub fn check_date(date: &str) -> CmResult<String> {
    match chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) if d.format("%Y-%m-%d").to_string() == date => Ok(date.to_string()),
        _ => whatever!("Invalid date {:?}, expected the form YYYY-MM-DD", date),
    }
}

/// The options of a run, after merging the command line and the configuration file.
#[derive(PartialEq, Debug, Clone)]
pub struct Settings {
    pub data: String,
    pub iso_codes: Option<String>,
    pub output_directory: PathBuf,
    pub palette: Palette,
    pub projection: Projection,
    pub until: Option<String>,
    pub raster_command: Option<String>,
}

impl Settings {
    pub fn resolve(args: &Args, config: Option<&CmConfig>) -> CmResult<Settings> {
        let default_config = CmConfig::default();
        let config = config.unwrap_or(&default_config);
        let sources = &config.data_sources;
        let output = &config.output_settings;

        let (cli_palette, cli_projection, cli_out_dir, cli_until, cli_raster) =
            match &args.command {
                Command::Render {
                    date,
                    palette,
                    projection,
                    ..
                } => {
                    if let Some(d) = date.as_ref() {
                        check_date(d)?;
                    }
                    (*palette, *projection, None, None, None)
                }
                Command::Frames {
                    until,
                    palette,
                    projection,
                    out_dir,
                    raster_command,
                } => (
                    *palette,
                    *projection,
                    out_dir.clone(),
                    until.clone(),
                    raster_command.clone(),
                ),
                Command::Animate {
                    out_dir,
                    projection,
                } => (None, *projection, out_dir.clone(), None, None),
                Command::Dates { until } => (None, None, None, until.clone(), None),
                Command::Palettes => (None, None, None, None, None),
            };

        let palette = match (cli_palette, output.palette.as_ref()) {
            (Some(p), _) => p,
            (None, Some(s)) => match s.parse::<Palette>() {
                Ok(p) => p,
                Err(msg) => whatever!("Invalid palette in the configuration: {}", msg),
            },
            (None, None) => Palette::default(),
        };
        let projection = match (cli_projection, output.projection.as_ref()) {
            (Some(p), _) => p,
            (None, Some(s)) => match s.parse::<Projection>() {
                Ok(p) => p,
                Err(msg) => whatever!("Invalid projection in the configuration: {}", msg),
            },
            (None, None) => Projection::default(),
        };

        let iso_codes = if args.skip_iso_codes {
            None
        } else {
            Some(
                args.iso_codes
                    .clone()
                    .or_else(|| sources.iso_codes.clone())
                    .unwrap_or_else(|| DEFAULT_ISO_CODES_URL.to_string()),
            )
        };

        Ok(Settings {
            data: args
                .data
                .clone()
                .or_else(|| sources.countermeasures.clone())
                .unwrap_or_else(|| DEFAULT_DATA_URL.to_string()),
            iso_codes,
            output_directory: PathBuf::from(
                cli_out_dir
                    .or_else(|| output.output_directory.clone())
                    .unwrap_or_else(|| ".".to_string()),
            ),
            palette,
            projection,
            until: cli_until
                .or_else(|| output.until.clone())
                .map(|d| check_date(&d))
                .transpose()?,
            raster_command: cli_raster.or_else(|| output.raster_command.clone()),
        })
    }
}
