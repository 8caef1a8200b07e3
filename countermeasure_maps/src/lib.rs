/*!
Discrete color scales and data preparation for maps of the COVID-19 countermeasures
taken by governments.

This crate turns a table of countermeasure levels (one row per region, one column per day)
into the ingredients of a choropleth map:
- the date columns, normalized to `YYYY-MM-DD`
- the split of the regions between the states of the USA and the countries of the world
- a discrete color scale, with one flat color per level

The rendering itself (plotly, image export) is left to the caller. See the [manual] for
the command line interface built on top of it.

```
use countermeasure_maps::*;

let scale = discrete_colorscale(&[0.0, 1.0, 2.0], &["#000000", "#ffffff"])?;
assert_eq!(scale.stops.len(), 4);
assert_eq!(scale.tickvals, vec![0.5, 1.5]);
assert_eq!(scale.ticktext, vec!["0", "1"]);
# Ok::<(), MapErrors>(())
```
*/

pub mod builder;
mod config;
pub mod manual;

use log::{debug, info};

pub use crate::config::*;

/// The attribution displayed at the bottom of the maps.
pub const ANNOTATION: &str = "Data: <a href=\"https://github.com/OlivierLej/Coronavirus_CounterMeasures\">Olivier Lejeune</a>, Visualisation: <a href=\"https://patternizer.github.io\">Michael Taylor</a>";

const TITLE_PREFIX: &str = "Coronavirus counter-measures: ";

/// Rewrites the date headers of a table from `YYYYMMDD` to `YYYY-MM-DD`.
///
/// The first two headers (region identifier and region name) are kept as is. All the other
/// ones must be made of exactly 8 digits, with no surrounding space, otherwise the whole
/// table is rejected.
pub fn normalize_date_headers<S: AsRef<str>>(headers: &[S]) -> Result<Vec<String>, MapErrors> {
    let mut res: Vec<String> = Vec::with_capacity(headers.len());
    for (idx, h) in headers.iter().enumerate() {
        let h = h.as_ref();
        if idx < 2 {
            res.push(h.to_string());
            continue;
        }
        if h.len() != 8 || !h.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MapErrors::Format {
                column: idx,
                header: h.to_string(),
            });
        }
        res.push(format!(
            "{}-{}-{}",
            &h[0..4],
            &h[4..6],
            &h[6..8]
        ));
    }
    Ok(res)
}

/// Splits the regions between USA states (identifiers shorter than 3 characters) and
/// world countries (all the others).
///
/// The identifiers are not checked further: an unknown code is simply not drawn on the map.
pub fn partition_regions<S: AsRef<str>>(region_ids: &[S]) -> RegionPartition {
    let mut partition = RegionPartition::default();
    for (idx, id) in region_ids.iter().enumerate() {
        if id.as_ref().chars().count() < 3 {
            partition.usa.push(idx);
        } else {
            partition.world.push(idx);
        }
    }
    debug!(
        "partition_regions: {} usa states, {} countries",
        partition.usa.len(),
        partition.world.len()
    );
    partition
}

/// Builds a piecewise-constant color scale.
///
/// Arguments:
/// * `values` the boundaries of the categories. They do not need to be sorted.
/// * `colors` one color per category, so one fewer than the number of boundaries.
///
/// Each category `k` gets two stops, at the normalized positions of its lower and upper
/// boundaries, so that it is rendered with a single flat color. The tick of a category is
/// placed in the middle of its band and labeled with its lower bound, truncated to an integer.
pub fn discrete_colorscale<S: AsRef<str>>(
    values: &[f64],
    colors: &[S],
) -> Result<ColorScale, MapErrors> {
    if values.len() != colors.len() + 1 {
        return Err(MapErrors::Arity {
            values: values.len(),
            colors: colors.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(MapErrors::Domain);
    }
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let vmin = sorted[0];
    let vmax = sorted[sorted.len() - 1];
    let range = vmax - vmin;
    if range <= 0.0 {
        return Err(MapErrors::Domain);
    }
    let normalized: Vec<f64> = sorted.iter().map(|v| (v - vmin) / range).collect();

    let mut stops: Vec<ScaleStop> = Vec::with_capacity(2 * colors.len());
    for (k, color) in colors.iter().enumerate() {
        let color = color.as_ref().to_string();
        stops.push(ScaleStop {
            position: normalized[k],
            color: color.clone(),
        });
        stops.push(ScaleStop {
            position: normalized[k + 1],
            color,
        });
    }
    let tickvals: Vec<f64> = sorted.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();
    // Truncation, not rounding.
    let ticktext: Vec<String> = sorted[..colors.len()]
        .iter()
        .map(|v| format!("{}", v.trunc() as i64))
        .collect();
    Ok(ColorScale {
        stops,
        tickvals,
        ticktext,
    })
}

/// The indices of `num` evenly spaced elements in a list of `len` elements, always
/// including the first and the last element. Fractional indices are truncated.
pub fn sample_indices(len: usize, num: usize) -> Vec<usize> {
    if len == 0 || num == 0 {
        return Vec::new();
    }
    if num == 1 {
        return vec![0];
    }
    let last = (len - 1) as f64;
    let step = last / (num - 1) as f64;
    (0..num)
        .map(|i| {
            if i == num - 1 {
                len - 1
            } else {
                (i as f64 * step) as usize
            }
        })
        .collect()
}

impl Palette {
    /// Selects `num` colors of the palette, evenly spread over the whole palette.
    pub fn sample(&self, num: usize) -> Vec<String> {
        let colors = self.colors();
        sample_indices(colors.len(), num)
            .into_iter()
            .map(|idx| colors[idx].to_string())
            .collect()
    }

    /// The discrete color scale of this palette for all the countermeasure levels.
    pub fn level_colorscale(&self) -> Result<ColorScale, MapErrors> {
        let colors = self.sample(NUM_LEVELS);
        let values: Vec<f64> = (0..=colors.len()).map(|x| x as f64).collect();
        discrete_colorscale(&values, &colors)
    }
}

/// The data behind the maps: the table and the split of its regions.
///
/// It is built once when the data is loaded and only read afterwards.
#[derive(PartialEq, Debug, Clone)]
pub struct Dashboard {
    table: CountermeasureTable,
    partition: RegionPartition,
}

impl Dashboard {
    pub fn new(table: CountermeasureTable) -> Dashboard {
        let partition = partition_regions(&table.region_ids());
        info!(
            "Dashboard: {} regions ({} usa, {} world), {} dates",
            table.rows.len(),
            partition.usa.len(),
            partition.world.len(),
            table.dates.len()
        );
        Dashboard { table, partition }
    }

    pub fn table(&self) -> &CountermeasureTable {
        &self.table
    }

    pub fn partition(&self) -> &RegionPartition {
        &self.partition
    }

    /// The dates available for rendering, up to (and including) `until` if provided.
    pub fn dates(&self, until: Option<&str>) -> Vec<&str> {
        self.table
            .dates
            .iter()
            .map(|d| d.as_str())
            .filter(|d| until.map_or(true, |u| *d <= u))
            .collect()
    }

    pub fn latest_date(&self) -> Option<&str> {
        self.table.dates.iter().map(|d| d.as_str()).max()
    }

    /// Builds the map for one day.
    ///
    /// This function does not modify the dashboard: the same inputs always produce the same figure.
    pub fn render(
        &self,
        date: &str,
        palette: Palette,
        projection: Projection,
    ) -> Result<Figure, MapErrors> {
        let date_idx = self
            .table
            .date_index(date)
            .ok_or_else(|| MapErrors::MissingDate(date.to_string()))?;
        let colorscale = palette.level_colorscale()?;
        debug!(
            "render: date {} palette {} projection {}",
            date, palette, projection
        );
        let layers = vec![
            self.layer(&self.partition.usa, date_idx, LocationMode::UsaStates, &colorscale),
            self.layer(&self.partition.world, date_idx, LocationMode::Iso3, &colorscale),
        ];
        Ok(Figure {
            date: date.to_string(),
            title: format!("{}{}", TITLE_PREFIX, date),
            projection,
            annotation: ANNOTATION.to_string(),
            layers,
        })
    }

    fn layer(
        &self,
        indices: &[usize],
        date_idx: usize,
        location_mode: LocationMode,
        colorscale: &ColorScale,
    ) -> ChoroplethLayer {
        let rows: Vec<&RegionRow> = indices.iter().map(|idx| &self.table.rows[*idx]).collect();
        ChoroplethLayer {
            location_mode,
            locations: rows.iter().map(|r| r.region_id.clone()).collect(),
            text: rows.iter().map(|r| r.region_name.clone()).collect(),
            z: rows
                .iter()
                .map(|r| r.levels.get(date_idx).copied().flatten().map(|l| l.code()))
                .collect(),
            zmin: 0.0,
            zmax: NUM_LEVELS as f64,
            colorscale: colorscale.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::builder::Builder;
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn colors(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{}", i)).collect()
    }

    #[test]
    fn colorscale_has_two_stops_per_category() {
        init();
        for n in 1..10 {
            let values: Vec<f64> = (0..=n).map(|x| x as f64 * 3.0 - 7.0).collect();
            let scale = discrete_colorscale(&values, &colors(n)).unwrap();
            assert_eq!(scale.stops.len(), 2 * n);
            assert_eq!(scale.tickvals.len(), n);
            assert_eq!(scale.ticktext.len(), n);
            assert_eq!(scale.stops.first().unwrap().position, 0.0);
            assert_eq!(scale.stops.last().unwrap().position, 1.0);
            assert!(scale
                .stops
                .windows(2)
                .all(|w| w[0].position <= w[1].position));
        }
    }

    #[test]
    fn colorscale_levels() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let scale = discrete_colorscale(&values, &colors(6)).unwrap();
        assert_eq!(scale.tickvals, vec![0.5, 1.5, 2.5, 3.5, 4.5, 5.5]);
        assert_eq!(scale.ticktext, vec!["0", "1", "2", "3", "4", "5"]);
        assert_eq!(scale.stops[2].position, 1.0 / 6.0);
        assert_eq!(scale.stops[2].color, "c1");
        assert_eq!(scale.stops[3].color, "c1");
    }

    #[test]
    fn colorscale_sorts_values() {
        let sorted = discrete_colorscale(&[-10.0, 0.0, 30.0], &["a", "b"]).unwrap();
        let unsorted = discrete_colorscale(&[30.0, -10.0, 0.0], &["a", "b"]).unwrap();
        assert_eq!(sorted, unsorted);
        assert_eq!(sorted.stops[1].position, 0.25);
        assert_eq!(sorted.tickvals, vec![-5.0, 15.0]);
        assert_eq!(sorted.ticktext, vec!["-10", "0"]);
    }

    #[test]
    fn colorscale_truncates_labels() {
        let scale = discrete_colorscale(&[0.7, 1.9, 3.2], &["a", "b"]).unwrap();
        assert_eq!(scale.ticktext, vec!["0", "1"]);
        let scale = discrete_colorscale(&[-1.5, 0.5, 2.0], &["a", "b"]).unwrap();
        assert_eq!(scale.ticktext, vec!["-1", "0"]);
    }

    #[test]
    fn colorscale_errors() {
        assert_eq!(
            discrete_colorscale(&[0.0, 1.0, 2.0], &["a", "b", "c"]),
            Err(MapErrors::Arity {
                values: 3,
                colors: 3
            })
        );
        assert_eq!(
            discrete_colorscale(&[5.0, 5.0, 5.0], &["a", "b"]),
            Err(MapErrors::Domain)
        );
        assert_eq!(
            discrete_colorscale(&[0.0, f64::NAN, 2.0], &["a", "b"]),
            Err(MapErrors::Domain)
        );
        let no_colors: [&str; 0] = [];
        assert_eq!(
            discrete_colorscale(&[1.0], &no_colors),
            Err(MapErrors::Domain)
        );
    }

    #[test]
    fn partition_by_identifier_length() {
        let p = partition_regions(&["US", "CA", "FRA", "DEU"]);
        assert_eq!(p.usa, vec![0, 1]);
        assert_eq!(p.world, vec![2, 3]);

        let p = partition_regions(&["FRA", "", "X", "ABCD", "NY"]);
        assert_eq!(p.usa, vec![1, 2, 4]);
        assert_eq!(p.world, vec![0, 3]);
    }

    #[test]
    fn normalize_headers() {
        let res =
            normalize_date_headers(&["country_id", "country_name", "20200123", "20201231"])
                .unwrap();
        assert_eq!(
            res,
            vec!["country_id", "country_name", "2020-01-23", "2020-12-31"]
        );
        assert_eq!(
            normalize_date_headers(&["country_id", "country_name", "20200123", "2020012"]),
            Err(MapErrors::Format {
                column: 3,
                header: "2020012".to_string()
            })
        );
        assert!(normalize_date_headers(&["a", "b", "2020012x"]).is_err());
        assert_eq!(
            normalize_date_headers(&["a", "b", " 20200123"]),
            Err(MapErrors::Format {
                column: 2,
                header: " 20200123".to_string()
            })
        );
    }

    #[test]
    fn palette_sampling() {
        assert_eq!(sample_indices(10, 6), vec![0, 1, 3, 5, 7, 9]);
        assert_eq!(sample_indices(12, 6), vec![0, 2, 4, 6, 8, 11]);
        assert_eq!(sample_indices(6, 6), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(sample_indices(5, 1), vec![0]);
        assert_eq!(
            Palette::Shikari.sample(6),
            vec!["#2f2f2f", "#a1dcfc", "#fdee03", "#75b82b", "#a84190", "#0169b3"]
        );
        // Reversed: the strictest level gets the darkest color.
        let viridis = Palette::Viridis.sample(6);
        assert_eq!(viridis.first().unwrap(), "#fde725");
        assert_eq!(viridis.last().unwrap(), "#440154");
        for p in Palette::ALL {
            assert_eq!(p.level_colorscale().unwrap().stops.len(), 12);
        }
    }

    #[test]
    fn palette_and_projection_names() {
        assert_eq!("magma".parse::<Palette>(), Ok(Palette::Magma));
        assert!("jet".parse::<Palette>().is_err());
        assert_eq!(
            "natural-earth".parse::<Projection>(),
            Ok(Projection::NaturalEarth)
        );
        assert_eq!("Albers USA".parse::<Projection>(), Ok(Projection::AlbersUsa));
    }

    fn sample_dashboard() -> Dashboard {
        let mut b = Builder::new(&["country_id", "country_name", "20200401", "20200402"]).unwrap();
        b.add_row(&["NY", "New York", "3", "5"]).unwrap();
        b.add_row(&["FRA", "France", "4", ""]).unwrap();
        b.add_row(&["CA", "California", "2", "5"]).unwrap();
        Dashboard::new(b.build().unwrap())
    }

    #[test]
    fn render_figure() {
        init();
        let d = sample_dashboard();
        let fig = d
            .render("2020-04-02", Palette::Shikari, Projection::NaturalEarth)
            .unwrap();
        assert_eq!(fig.title, "Coronavirus counter-measures: 2020-04-02");
        assert_eq!(fig.layers.len(), 2);
        let usa = &fig.layers[0];
        assert_eq!(usa.location_mode, LocationMode::UsaStates);
        assert_eq!(usa.locations, vec!["NY", "CA"]);
        assert_eq!(usa.text, vec!["New York", "California"]);
        assert_eq!(usa.z, vec![Some(5), Some(5)]);
        assert_eq!(usa.zmax, 6.0);
        let world = &fig.layers[1];
        assert_eq!(world.location_mode, LocationMode::Iso3);
        assert_eq!(world.locations, vec!["FRA"]);
        assert_eq!(world.z, vec![None]);
    }

    #[test]
    fn render_is_repeatable_and_checks_dates() {
        let d = sample_dashboard();
        let a = d
            .render("2020-04-01", Palette::Magma, Projection::Mollweide)
            .unwrap();
        let b = d
            .render("2020-04-01", Palette::Magma, Projection::Mollweide)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(
            d.render("2020-05-01", Palette::Magma, Projection::Mollweide),
            Err(MapErrors::MissingDate("2020-05-01".to_string()))
        );
    }

    #[test]
    fn dates_until() {
        let d = sample_dashboard();
        assert_eq!(d.dates(None), vec!["2020-04-01", "2020-04-02"]);
        assert_eq!(d.dates(Some("2020-04-01")), vec!["2020-04-01"]);
        assert!(d.dates(Some("2020-01-01")).is_empty());
        assert_eq!(d.latest_date(), Some("2020-04-02"));
    }
}
