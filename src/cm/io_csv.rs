// Primitives for reading CSV files.

use crate::cm::*;

use countermeasure_maps::builder::Builder;
use serde::Deserialize;

/// Parses the countermeasures dataset: `country_id, country_name, <YYYYMMDD>...`
pub fn read_countermeasures(contents: &str) -> CmResult<CountermeasureTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(contents.as_bytes());
    let headers: Vec<String> = rdr
        .headers()
        .context(CsvHeaderSnafu {})?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_countermeasures: {} columns", headers.len());
    let mut builder = Builder::new(&headers).context(MapSnafu {})?;

    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let cells: Vec<&str> = line.iter().collect();
        builder.add_row(&cells).context(MapSnafu {})?;
    }
    let table = builder.build().context(MapSnafu {})?;
    info!(
        "Read {} regions over {} days",
        table.rows.len(),
        table.dates.len()
    );
    Ok(table)
}

#[derive(Debug, Deserialize)]
struct IsoCountry {
    name: String,
    #[serde(rename = "alpha-3")]
    alpha_3: String,
}

/// Parses a table of ISO 3166 countries and returns the alpha-3 codes.
pub fn read_iso_codes(contents: &str) -> CmResult<HashSet<String>> {
    let mut rdr = csv::Reader::from_reader(contents.as_bytes());
    let mut res: HashSet<String> = HashSet::new();
    for (idx, rec) in rdr.deserialize::<IsoCountry>().enumerate() {
        let country = rec.context(CsvLineParseSnafu { lineno: idx + 2 })?;
        debug!("read_iso_codes: {} -> {}", country.name, country.alpha_3);
        res.insert(country.alpha_3);
    }
    info!("Read {} ISO 3166 codes", res.len());
    Ok(res)
}
