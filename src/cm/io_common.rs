// Primitives for reading the data sources and naming the outputs.

use crate::cm::*;

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Reads the whole content of a data source, either a URL or a local file.
pub fn read_source(location: &str) -> CmResult<String> {
    if is_url(location) {
        info!("Downloading {}", location);
        let response = reqwest::blocking::get(location).context(DownloadSnafu { url: location })?;
        let status = response.status();
        if !status.is_success() {
            return Err(CmError::HttpStatus {
                url: location.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().context(DownloadSnafu { url: location })
    } else {
        info!("Attempting to read file {:?}", location);
        fs::read_to_string(location).context(OpeningFileSnafu { path: location })
    }
}

pub fn frame_file_name(date: &str, extension: &str) -> String {
    format!("countermeasures_{}.{}", date, extension)
}

pub fn animation_file_name(projection: Projection) -> String {
    format!("countermeasures_{}.gif", projection.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names() {
        assert_eq!(
            frame_file_name("2020-07-30", "png"),
            "countermeasures_2020-07-30.png"
        );
        assert_eq!(
            animation_file_name(Projection::NaturalEarth),
            "countermeasures_natural earth.gif"
        );
    }

    #[test]
    fn reads_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("data.csv");
        fs::write(&p, "a,b\n").unwrap();
        assert_eq!(read_source(p.to_str().unwrap()).unwrap(), "a,b\n");
        assert!(matches!(
            read_source(dir.path().join("missing.csv").to_str().unwrap()),
            Err(CmError::OpeningFile { .. })
        ));
    }
}
