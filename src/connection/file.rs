use std::io::prelude::BufRead;

/// Delimited text file of position fixes, one per line:
/// `timestamp,latitude,longitude[,speed_mps[,rpm]]`
///
/// Timestamps may be integer Unix milliseconds, RFC 3339, or local `%Y-%m-%d %H:%M:%S`.
/// Blank lines and lines starting with `#` are skipped; an empty speed or RPM column is
/// treated as absent.
#[derive(serde::Deserialize, Debug, PartialEq, Clone)]
pub struct SampleTextFile {
    pub path: String,
}

impl SampleTextFile {
    pub fn new(path: String) -> Result<Self, crate::connection::ConnectionError> {
        if std::path::Path::new(&path).exists() || url::Url::parse(&path).is_ok() {
            Ok(Self { path })
        } else {
            Err(crate::connection::ConnectionError::FailedToEstablish {
                connection: path,
                message: "path does not exist".to_string(),
            })
        }
    }
}

fn read_lines(path: &String) -> Result<Vec<String>, crate::connection::ConnectionError> {
    let mut lines: Vec<String> = vec![];
    if std::path::Path::new(path).exists() {
        match std::fs::File::open(path) {
            Ok(file) => {
                let reader = std::io::BufReader::new(file);
                for line in reader.lines() {
                    match line {
                        Ok(line) => lines.push(line),
                        Err(error) => {
                            return Err(crate::connection::ConnectionError::ReadFailure {
                                connection: path.to_owned(),
                                message: error.to_string(),
                            });
                        }
                    }
                }
            }
            Err(error) => {
                return Err(crate::connection::ConnectionError::FailedToEstablish {
                    connection: path.to_owned(),
                    message: error.to_string(),
                });
            }
        }
    } else {
        match url::Url::parse(path) {
            Ok(url) => {
                let response = match reqwest::blocking::get(url.to_owned()) {
                    Ok(response) => response,
                    Err(error) => {
                        return Err(crate::connection::ConnectionError::ReadFailure {
                            connection: url.to_string(),
                            message: error.to_string(),
                        });
                    }
                };

                let text = match response.text() {
                    Ok(text) => text,
                    Err(error) => {
                        return Err(crate::connection::ConnectionError::ReadFailure {
                            connection: url.to_string(),
                            message: error.to_string(),
                        })
                    }
                };

                for line in text.split('\n') {
                    lines.push(line.trim_end_matches('\r').to_string());
                }
            }
            Err(error) => {
                return Err(crate::connection::ConnectionError::FailedToEstablish {
                    connection: path.to_owned(),
                    message: error.to_string(),
                });
            }
        }
    }

    Ok(lines)
}

pub fn parse_timestamp_millis(value: &str) -> Result<i64, String> {
    let value = value.trim();
    if let Ok(milliseconds) = value.parse::<i64>() {
        return Ok(milliseconds);
    }
    if let Ok(time) = chrono::DateTime::parse_from_rfc3339(value) {
        return Ok(time.timestamp_millis());
    }
    match chrono::NaiveDateTime::parse_from_str(value, &crate::DATETIME_FORMAT) {
        Ok(time) => match time.and_local_timezone(chrono::Local).single() {
            Some(time) => Ok(time.timestamp_millis()),
            None => Err(format!("ambiguous local time {:}", value)),
        },
        Err(_) => Err(format!("unrecognized timestamp {:}", value)),
    }
}

fn parse_optional_f64(value: Option<&str>, name: &str) -> Result<Option<f64>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => match value.parse::<f64>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(format!("{:} {:} is not a number", name, value)),
        },
    }
}

pub fn parse_sample_line(line: &str) -> Result<Option<crate::location::GeoSample>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let columns: Vec<&str> = line.split(',').collect();
    if columns.len() < 3 || columns.len() > 5 {
        return Err(format!(
            "expected 3 to 5 columns but found {:}",
            columns.len()
        ));
    }

    let timestamp_millis = parse_timestamp_millis(columns[0])?;
    let latitude = parse_optional_f64(Some(columns[1]), "latitude")?
        .ok_or_else(|| "latitude is missing".to_string())?;
    let longitude = parse_optional_f64(Some(columns[2]), "longitude")?
        .ok_or_else(|| "longitude is missing".to_string())?;

    let mut sample = crate::location::GeoSample::new(latitude, longitude, timestamp_millis);
    if let Some(speed) = parse_optional_f64(columns.get(3).copied(), "speed")? {
        sample = sample.with_reported_speed(speed);
    }
    if let Some(rpm) = parse_optional_f64(columns.get(4).copied(), "RPM")? {
        sample = sample.with_engine_rpm(rpm);
    }

    Ok(Some(sample))
}

impl SampleTextFile {
    pub fn read_samples_from_file(
        &self,
    ) -> Result<Vec<crate::location::GeoSample>, crate::connection::ConnectionError> {
        let lines = read_lines(&self.path)?;

        let mut samples: Vec<crate::location::GeoSample> = vec![];
        for (index, line) in lines.iter().enumerate() {
            match parse_sample_line(line) {
                Ok(Some(sample)) => samples.push(sample.with_source(
                    crate::location::SampleSource::TextFile(self.path.to_owned()),
                )),
                Ok(None) => continue,
                Err(message) => {
                    return Err(crate::connection::ConnectionError::ParseFailure {
                        connection: self.path.to_owned(),
                        line: index + 1,
                        message,
                    });
                }
            }
        }
        Ok(samples)
    }
}

/// GeoJSON `FeatureCollection` of `Point` features with a `time` property (RFC 3339 string
/// or Unix seconds) and optional `speed` (m/s) and `rpm` properties
#[derive(serde::Deserialize, Debug, PartialEq, Clone)]
pub struct GeoJsonFile {
    pub path: String,
}

impl GeoJsonFile {
    pub fn new(path: String) -> Result<Self, crate::connection::ConnectionError> {
        if std::path::Path::new(&path).exists() || url::Url::parse(&path).is_ok() {
            Ok(Self { path })
        } else {
            Err(crate::connection::ConnectionError::FailedToEstablish {
                connection: path,
                message: "path does not exist".to_string(),
            })
        }
    }
}

/// absent and `null` properties are `None`; anything else must be a number
fn optional_number(
    properties: &serde_json::Map<String, serde_json::Value>,
    name: &str,
) -> Result<Option<f64>, String> {
    match properties.get(name) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => match value.as_f64() {
            Some(number) => Ok(Some(number)),
            None => Err(format!("{:} {:} is not a number", name, value)),
        },
    }
}

impl GeoJsonFile {
    pub fn read_samples_from_geojson(
        &self,
    ) -> Result<Vec<crate::location::GeoSample>, crate::connection::ConnectionError> {
        let lines = read_lines(&self.path)?;
        let contents = lines.join("\n");
        let parsed = match contents.parse::<geojson::GeoJson>() {
            Ok(parsed) => parsed,
            Err(error) => {
                return Err(crate::connection::ConnectionError::ParseFailure {
                    connection: self.path.to_owned(),
                    line: 0,
                    message: error.to_string(),
                })
            }
        };

        let mut samples: Vec<crate::location::GeoSample> = vec![];
        if let geojson::GeoJson::FeatureCollection(ref collection) = parsed {
            for (index, feature) in collection.features.iter().enumerate() {
                if let Some(ref geometry) = feature.geometry {
                    if let geojson::Value::Point(point) = &geometry.value {
                        let parse_failure = |message: String| {
                            crate::connection::ConnectionError::ParseFailure {
                                connection: self.path.to_owned(),
                                line: index + 1,
                                message,
                            }
                        };

                        let properties = match feature.properties.as_ref() {
                            Some(properties) => properties,
                            None => {
                                return Err(parse_failure("feature has no properties".to_string()))
                            }
                        };

                        let timestamp_millis = match properties.get("time") {
                            Some(serde_json::Value::String(time)) => {
                                parse_timestamp_millis(time).map_err(parse_failure)?
                            }
                            Some(serde_json::Value::Number(time)) => match time.as_f64() {
                                Some(seconds) => (seconds * 1000.0).round() as i64,
                                None => {
                                    return Err(parse_failure(format!("invalid time {:}", time)))
                                }
                            },
                            _ => return Err(parse_failure("feature has no time".to_string())),
                        };

                        if point.len() < 2 {
                            return Err(parse_failure(
                                "point has fewer than 2 coordinates".to_string(),
                            ));
                        }

                        let mut sample = crate::location::GeoSample::new(
                            point[1],
                            point[0],
                            timestamp_millis,
                        )
                        .with_source(crate::location::SampleSource::GeoJsonFile(
                            self.path.to_owned(),
                        ));
                        if let Some(speed) =
                            optional_number(properties, "speed").map_err(parse_failure)?
                        {
                            sample = sample.with_reported_speed(speed);
                        }
                        if let Some(rpm) =
                            optional_number(properties, "rpm").map_err(parse_failure)?
                        {
                            sample = sample.with_engine_rpm(rpm);
                        }

                        samples.push(sample);
                    }
                }
            }
        }

        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_line() {
        let sample = parse_sample_line("1700000000000,59.9139,10.7522,12.5,2100")
            .unwrap()
            .unwrap();
        assert_eq!(sample.timestamp_millis, 1_700_000_000_000);
        assert_eq!(sample.latitude(), 59.9139);
        assert_eq!(sample.longitude(), 10.7522);
        assert_eq!(sample.reported_speed_meters_per_second, Some(12.5));
        assert_eq!(sample.engine_rpm, Some(2100.0));

        let sample = parse_sample_line("2023-11-14T22:13:20Z,59.9139,10.7522,,")
            .unwrap()
            .unwrap();
        assert_eq!(sample.timestamp_millis, 1_700_000_000_000);
        assert_eq!(sample.reported_speed_meters_per_second, None);
        assert_eq!(sample.engine_rpm, None);

        assert!(parse_sample_line("# comment").unwrap().is_none());
        assert!(parse_sample_line("   ").unwrap().is_none());
    }

    #[test]
    fn test_parse_sample_line_failures() {
        assert!(parse_sample_line("1700000000000,59.9139").is_err());
        assert!(parse_sample_line("yesterday,59.9139,10.7522").is_err());
        assert!(parse_sample_line("1700000000000,north,10.7522").is_err());
        assert!(parse_sample_line("1700000000000,59.9,10.7,fast").is_err());
        assert!(parse_sample_line("1700000000000,59.9,10.7,1,2,3").is_err());
    }

    #[test]
    fn test_local_timestamp() {
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap()
            .and_local_timezone(chrono::Local)
            .unwrap()
            .timestamp_millis();
        assert_eq!(
            parse_timestamp_millis("2024-05-01 07:30:00").unwrap(),
            expected
        );
    }

    #[test]
    fn test_samples_from_file() {
        let path = format!("{:}/{:}", env!("CARGO_MANIFEST_DIR"), "data/drive.csv");

        let connection = SampleTextFile::new(path.to_owned()).unwrap();

        let samples = connection.read_samples_from_file().unwrap();

        assert_eq!(samples.len(), 6);
        assert_eq!(
            samples[0].source,
            crate::location::SampleSource::TextFile(path)
        );
        assert!(samples.iter().all(|sample| sample.validate().is_ok()));
    }

    #[test]
    fn test_samples_from_geojson() {
        let path = format!("{:}/{:}", env!("CARGO_MANIFEST_DIR"), "data/drive.geojson");

        let connection = GeoJsonFile::new(path).unwrap();

        let samples = connection.read_samples_from_geojson().unwrap();

        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0].latitude(), 59.9139);
        assert_eq!(samples[0].longitude(), 10.7522);
        assert_eq!(samples[0].timestamp_millis, 1_700_000_000_000);
        assert_eq!(samples[1].reported_speed_meters_per_second, Some(11.0));
        assert_eq!(samples[1].engine_rpm, Some(2400.0));
    }

    #[test]
    fn test_geojson_non_numeric_speed() {
        let path = std::env::temp_dir().join(format!(
            "fuelrate_non_numeric_speed_{:}.geojson",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "geometry": { "type": "Point", "coordinates": [10.7522, 59.9139] },
                        "properties": { "time": "2023-11-14T22:13:20Z", "speed": null }
                    },
                    {
                        "type": "Feature",
                        "geometry": { "type": "Point", "coordinates": [10.7530, 59.9140] },
                        "properties": { "time": "2023-11-14T22:13:30Z", "speed": "fast" }
                    }
                ]
            }"#,
        )
        .unwrap();

        let connection = GeoJsonFile::new(path.to_string_lossy().to_string()).unwrap();
        let result = connection.read_samples_from_geojson();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            result,
            Err(crate::connection::ConnectionError::ParseFailure { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(SampleTextFile::new("does/not/exist.csv".to_string()).is_err());
        assert!(GeoJsonFile::new("does/not/exist.geojson".to_string()).is_err());
    }
}
