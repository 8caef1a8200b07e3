pub use crate::config::*;

use log::debug;
use std::collections::HashSet;

/// A builder for assembling a countermeasure table, one region at a time.
///
/// The headers are checked and normalized when the builder is created, so that
/// a malformed source is rejected before reading any row. A date may only appear once.
///
/// ```
/// use countermeasure_maps::builder::Builder;
/// # use countermeasure_maps::MapErrors;
///
/// let headers = ["country_id", "country_name", "20200123", "20200124"];
/// let mut builder = Builder::new(&headers)?;
///
/// builder.add_row(&["FRA", "France", "0", "1"])?;
/// builder.add_row(&["CA", "California", "", "2"])?;
///
/// let table = builder.build()?;
/// assert_eq!(table.dates, vec!["2020-01-23", "2020-01-24"]);
/// # Ok::<(), MapErrors>(())
/// ```
pub struct Builder {
    pub(crate) _headers: Vec<String>,
    pub(crate) _rows: Vec<RegionRow>,
}

impl Builder {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Result<Builder, MapErrors> {
        let raw: Vec<String> = headers.iter().map(|h| h.as_ref().to_string()).collect();
        if raw.len() < 2 {
            return Err(MapErrors::MissingColumns { found: raw.len() });
        }
        let normalized = crate::normalize_date_headers(&raw)?;
        let mut seen: HashSet<&str> = HashSet::new();
        for d in normalized[2..].iter() {
            if !seen.insert(d.as_str()) {
                return Err(MapErrors::DuplicateDate(d.clone()));
            }
        }
        debug!("Builder::new: normalized headers: {:?}", normalized);
        Ok(Builder {
            _headers: normalized,
            _rows: Vec::new(),
        })
    }

    /// The dates covered by this table, in the normalized form.
    pub fn dates(&self) -> &[String] {
        if self._headers.len() > 2 {
            &self._headers[2..]
        } else {
            &[]
        }
    }

    /// Adds a row from the raw cells of the source.
    ///
    /// The first cell is the region identifier, the second one the region name, and
    /// the others the levels in the order of the date headers. Empty cells are
    /// accepted as missing values.
    pub fn add_row<S: AsRef<str>>(&mut self, cells: &[S]) -> Result<(), MapErrors> {
        let region_id = cells
            .first()
            .map(|s| s.as_ref().trim().to_string())
            .unwrap_or_default();
        if cells.len() != self._headers.len() {
            return Err(MapErrors::RowLength {
                region_id,
                expected: self._headers.len(),
                found: cells.len(),
            });
        }
        let region_name = cells[1].as_ref().trim().to_string();
        let mut levels: Vec<Option<CountermeasureLevel>> = Vec::new();
        for (cell, date) in cells[2..].iter().zip(self.dates()) {
            levels.push(parse_level(cell.as_ref(), &region_id, date)?);
        }
        self.add_region(RegionRow {
            region_id,
            region_name,
            levels,
        })
    }

    pub fn add_region(&mut self, row: RegionRow) -> Result<(), MapErrors> {
        if row.levels.len() != self.dates().len() {
            return Err(MapErrors::RowLength {
                region_id: row.region_id,
                expected: self._headers.len(),
                found: row.levels.len() + 2,
            });
        }
        self._rows.push(row);
        Ok(())
    }

    pub fn build(self) -> Result<CountermeasureTable, MapErrors> {
        if self._headers.len() <= 2 {
            return Err(MapErrors::EmptyTable);
        }
        let mut headers = self._headers.into_iter();
        let id_header = headers.next().unwrap_or_default();
        let name_header = headers.next().unwrap_or_default();
        Ok(CountermeasureTable {
            id_header,
            name_header,
            dates: headers.collect(),
            rows: self._rows,
        })
    }
}

// Some exports write the levels as floats (1.0), which are accepted when integral.
fn parse_level(
    cell: &str,
    region_id: &str,
    date: &str,
) -> Result<Option<CountermeasureLevel>, MapErrors> {
    let s = cell.trim();
    if s.is_empty() {
        return Ok(None);
    }
    let code: Option<u8> = match s.parse::<u8>() {
        Ok(x) => Some(x),
        Err(_) => match s.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 && (0.0..=255.0).contains(&f) => Some(f as u8),
            _ => None,
        },
    };
    match code.and_then(CountermeasureLevel::from_code) {
        Some(level) => Ok(Some(level)),
        None => Err(MapErrors::Level {
            region_id: region_id.to_string(),
            date: date.to_string(),
            cell: s.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_table_with_missing_cells() {
        let mut b = Builder::new(&["country_id", "country_name", "20200301", "20200302"]).unwrap();
        b.add_row(&["DEU", "Germany", "1", "2.0"]).unwrap();
        b.add_row(&["NY", "New York", "", "5"]).unwrap();
        let t = b.build().unwrap();
        assert_eq!(t.id_header, "country_id");
        assert_eq!(t.dates, vec!["2020-03-01", "2020-03-02"]);
        assert_eq!(
            t.rows[0].levels,
            vec![
                Some(CountermeasureLevel::PublicGatheringBan),
                Some(CountermeasureLevel::SchoolClosure)
            ]
        );
        assert_eq!(
            t.rows[1].levels,
            vec![None, Some(CountermeasureLevel::FullLockdown)]
        );
    }

    #[test]
    fn rejects_out_of_range_level() {
        let mut b = Builder::new(&["country_id", "country_name", "20200301"]).unwrap();
        let err = b.add_row(&["ITA", "Italy", "6"]).unwrap_err();
        assert_eq!(
            err,
            MapErrors::Level {
                region_id: "ITA".to_string(),
                date: "2020-03-01".to_string(),
                cell: "6".to_string()
            }
        );
        assert!(b.add_row(&["ITA", "Italy", "x"]).is_err());
        assert!(b.add_row(&["ITA", "Italy", "2.5"]).is_err());
    }

    #[test]
    fn rejects_short_rows() {
        let mut b = Builder::new(&["country_id", "country_name", "20200301"]).unwrap();
        assert!(matches!(
            b.add_row(&["ITA", "Italy"]),
            Err(MapErrors::RowLength {
                expected: 3,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_headers_and_empty_tables() {
        assert!(matches!(
            Builder::new(&["country_id", "country_name", "2020-03-01"]),
            Err(MapErrors::Format { column: 2, .. })
        ));
        let b = Builder::new(&["country_id", "country_name"]).unwrap();
        assert_eq!(b.build(), Err(MapErrors::EmptyTable));
    }

    #[test]
    fn rejects_single_column() {
        assert_eq!(
            Builder::new(&["country_id"]).err(),
            Some(MapErrors::MissingColumns { found: 1 })
        );
        let empty: [&str; 0] = [];
        assert_eq!(
            Builder::new(&empty).err(),
            Some(MapErrors::MissingColumns { found: 0 })
        );
    }

    #[test]
    fn rejects_duplicate_dates() {
        assert_eq!(
            Builder::new(&["country_id", "country_name", "20200401", "20200402", "20200401"]).err(),
            Some(MapErrors::DuplicateDate("2020-04-01".to_string()))
        );
    }
}
