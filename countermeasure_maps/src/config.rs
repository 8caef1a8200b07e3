// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// The level of containment measures that a government applied to a region on one day.
///
/// The levels are ordinal: a higher level is a stricter policy.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum CountermeasureLevel {
    NoMeasures,
    PublicGatheringBan,
    SchoolClosure,
    ShopClosure,
    PartialLockdown,
    FullLockdown,
}

impl CountermeasureLevel {
    pub const ALL: [CountermeasureLevel; 6] = [
        CountermeasureLevel::NoMeasures,
        CountermeasureLevel::PublicGatheringBan,
        CountermeasureLevel::SchoolClosure,
        CountermeasureLevel::ShopClosure,
        CountermeasureLevel::PartialLockdown,
        CountermeasureLevel::FullLockdown,
    ];

    pub fn from_code(code: u8) -> Option<CountermeasureLevel> {
        CountermeasureLevel::ALL.get(code as usize).copied()
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// The text displayed in the legend of the map.
    pub fn description(&self) -> &'static str {
        match self {
            CountermeasureLevel::NoMeasures => "No or few containment measures in place",
            CountermeasureLevel::PublicGatheringBan => {
                "Ban on public gatherings, cancellation of major events and conferences"
            }
            CountermeasureLevel::SchoolClosure => {
                "Schools and universities closed (dates matched to those from UNESCO)"
            }
            CountermeasureLevel::ShopClosure => "Non-essential shops, restaurants and bars closed",
            CountermeasureLevel::PartialLockdown => {
                "Night curfew / partial lockdown in place for broad population categories"
            }
            CountermeasureLevel::FullLockdown => {
                "All-day lockdown / shelter-in-place government instruction"
            }
        }
    }
}

/// The number of distinct countermeasure levels, which is also the number of
/// bands in the color scale.
pub const NUM_LEVELS: usize = CountermeasureLevel::ALL.len();

/// The table of countermeasures, as loaded from the data source.
///
/// The date columns are already normalized to the `YYYY-MM-DD` form.
/// A cell is `None` when the source did not report a level for this region and day.
#[derive(PartialEq, Debug, Clone)]
pub struct CountermeasureTable {
    pub id_header: String,
    pub name_header: String,
    pub dates: Vec<String>,
    pub rows: Vec<RegionRow>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct RegionRow {
    pub region_id: String,
    pub region_name: String,
    pub levels: Vec<Option<CountermeasureLevel>>,
}

impl CountermeasureTable {
    pub fn region_ids(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.region_id.as_str()).collect()
    }

    pub fn date_index(&self, date: &str) -> Option<usize> {
        self.dates.iter().position(|d| d == date)
    }
}

/// The rows of a table, split between the states of the USA and the countries of
/// the world.
///
/// Invariant: every row index appears in exactly one of the two sets, in increasing order.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RegionPartition {
    pub usa: Vec<usize>,
    pub world: Vec<usize>,
}

// ******** Output data structures *********

/// One stop of a piecewise-constant colorscale.
#[derive(PartialEq, Debug, Clone)]
pub struct ScaleStop {
    /// Normalized position in [0, 1]
    pub position: f64,
    pub color: String,
}

/// A discrete colorscale, along with the ticks for its colorbar.
///
/// There are two stops per category, so that each category is rendered with a
/// flat color and a hard edge at each boundary.
#[derive(PartialEq, Debug, Clone)]
pub struct ColorScale {
    pub stops: Vec<ScaleStop>,
    pub tickvals: Vec<f64>,
    pub ticktext: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum LocationMode {
    UsaStates,
    Iso3,
}

impl LocationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationMode::UsaStates => "USA-states",
            LocationMode::Iso3 => "ISO-3",
        }
    }
}

/// A choropleth layer of the map.
#[derive(PartialEq, Debug, Clone)]
pub struct ChoroplethLayer {
    pub location_mode: LocationMode,
    pub locations: Vec<String>,
    pub text: Vec<String>,
    pub z: Vec<Option<u8>>,
    pub zmin: f64,
    pub zmax: f64,
    pub colorscale: ColorScale,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Figure {
    pub date: String,
    pub title: String,
    pub projection: Projection,
    pub annotation: String,
    pub layers: Vec<ChoroplethLayer>,
}

/// Errors that prevent the maps from being built.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum MapErrors {
    /// The number of scale boundaries is not the number of colors plus one.
    Arity { values: usize, colors: usize },
    /// A date header is not made of 8 digits.
    Format { column: usize, header: String },
    /// The scale boundaries do not span a usable range.
    Domain,
    /// A cell does not contain a countermeasure level.
    Level { region_id: String, date: String, cell: String },
    /// A row does not have as many cells as there are headers.
    RowLength { region_id: String, expected: usize, found: usize },
    MissingDate(String),
    EmptyTable,
    /// The table does not have the region identifier and region name columns.
    MissingColumns { found: usize },
    DuplicateDate(String),
}

impl Error for MapErrors {}

impl Display for MapErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapErrors::Arity { values, colors } => write!(
                f,
                "expected one more scale value than colors, got {} values for {} colors",
                values, colors
            ),
            MapErrors::Format { column, header } => write!(
                f,
                "column {} has header {:?}, expected a date in the form YYYYMMDD",
                column, header
            ),
            MapErrors::Domain => write!(f, "the scale values must span a non-empty finite range"),
            MapErrors::Level {
                region_id,
                date,
                cell,
            } => write!(
                f,
                "region {} on {}: {:?} is not a countermeasure level",
                region_id, date, cell
            ),
            MapErrors::RowLength {
                region_id,
                expected,
                found,
            } => write!(
                f,
                "region {}: expected {} cells, found {}",
                region_id, expected, found
            ),
            MapErrors::MissingDate(d) => write!(f, "no data for date {}", d),
            MapErrors::EmptyTable => write!(f, "the countermeasure table has no date column"),
            MapErrors::MissingColumns { found } => write!(
                f,
                "expected at least the region identifier and name columns, found {} columns",
                found
            ),
            MapErrors::DuplicateDate(d) => write!(f, "the date {} appears in several columns", d),
        }
    }
}

// ********* Configuration **********

/// The palettes offered to color the maps.
///
/// The sequential palettes are the plotly scales of the same name, reversed so
/// that the strictest measures get the darkest color.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Palette {
    Viridis,
    Cividis,
    Plotly3,
    Magma,
    Plasma,
    /// Hand-picked colors, one per level.
    Shikari,
}

const VIRIDIS: &[&str] = &[
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#b5de2b", "#fde725",
];

const CIVIDIS: &[&str] = &[
    "#00224e", "#123570", "#3b496c", "#575d6d", "#707173", "#8a8678", "#a59c74", "#c3b369",
    "#e1cc55", "#fee838",
];

const PLOTLY3: &[&str] = &[
    "#0508b8", "#1910d8", "#3c19f0", "#6b1cfb", "#981cfd", "#bf1cfd", "#dd2bfd", "#f246fe",
    "#fc67fd", "#fea5fd", "#febefe", "#fec3fe",
];

const MAGMA: &[&str] = &[
    "#000004", "#180f3d", "#440f76", "#721f81", "#9e2f7f", "#cd4071", "#f1605d", "#fd9668",
    "#feca8d", "#fcfdbf",
];

const PLASMA: &[&str] = &[
    "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953", "#fb9f3a",
    "#fdca26", "#f0f921",
];

const SHIKARI: &[&str] = &[
    "#2f2f2f", "#a1dcfc", "#fdee03", "#75b82b", "#a84190", "#0169b3",
];

impl Palette {
    pub const ALL: [Palette; 6] = [
        Palette::Viridis,
        Palette::Cividis,
        Palette::Plotly3,
        Palette::Magma,
        Palette::Plasma,
        Palette::Shikari,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Palette::Viridis => "Viridis",
            Palette::Cividis => "Cividis",
            Palette::Plotly3 => "Plotly3",
            Palette::Magma => "Magma",
            Palette::Plasma => "Plasma",
            Palette::Shikari => "Shikari",
        }
    }

    /// The full list of colors of this palette, in the order used for the levels.
    pub fn colors(&self) -> Vec<&'static str> {
        match self {
            Palette::Viridis => VIRIDIS.iter().rev().copied().collect(),
            Palette::Cividis => CIVIDIS.iter().rev().copied().collect(),
            Palette::Plotly3 => PLOTLY3.iter().rev().copied().collect(),
            Palette::Magma => MAGMA.iter().rev().copied().collect(),
            Palette::Plasma => PLASMA.iter().rev().copied().collect(),
            Palette::Shikari => SHIKARI.to_vec(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::Shikari
    }
}

impl FromStr for Palette {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Palette::ALL
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown palette: {}", s))
    }
}

impl Display for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The geographic projections that can be used for the world map.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Projection {
    NaturalEarth,
    Equirectangular,
    Eckert4,
    Mollweide,
    AlbersUsa,
    Sinusoidal,
}

impl Projection {
    pub const ALL: [Projection; 6] = [
        Projection::NaturalEarth,
        Projection::Equirectangular,
        Projection::Eckert4,
        Projection::Mollweide,
        Projection::AlbersUsa,
        Projection::Sinusoidal,
    ];

    /// The name of the projection, as understood by plotly.
    pub fn name(&self) -> &'static str {
        match self {
            Projection::NaturalEarth => "natural earth",
            Projection::Equirectangular => "equirectangular",
            Projection::Eckert4 => "eckert4",
            Projection::Mollweide => "mollweide",
            Projection::AlbersUsa => "albers usa",
            Projection::Sinusoidal => "sinusoidal",
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::NaturalEarth
    }
}

impl FromStr for Projection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept "natural-earth" and "natural_earth" for shells.
        let normalized = s.replace(['-', '_'], " ");
        Projection::ALL
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(&normalized))
            .copied()
            .ok_or_else(|| format!("unknown projection: {}", s))
    }
}

impl Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
