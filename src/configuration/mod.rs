fn default_name() -> String {
    String::from("unnamed_drive")
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct RunConfiguration {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub time: TimeConfiguration,
    #[serde(default)]
    pub calibration: CalibrationConfiguration,
    #[serde(default)]
    pub samples: Vec<SampleSourceConfiguration>,
    #[cfg(feature = "sync")]
    pub service: Option<crate::connection::calibration_service::CalibrationService>,
}

impl RunConfiguration {
    pub fn from_file(
        path: &std::path::Path,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let file = std::fs::File::open(path)?;
        let configuration: Self = serde_yaml::from_reader(file)?;
        Ok(configuration)
    }
}

#[derive(PartialEq, Debug, serde::Deserialize, Clone, Default)]
pub struct TimeConfiguration {
    #[serde(default)]
    #[serde(with = "crate::utilities::optional_local_datetime_string")]
    pub start: Option<chrono::DateTime<chrono::Local>>,
    #[serde(default)]
    #[serde(with = "crate::utilities::optional_local_datetime_string")]
    pub end: Option<chrono::DateTime<chrono::Local>>,
}

#[derive(PartialEq, Debug, serde::Deserialize, Clone, Default)]
pub struct CalibrationConfiguration {
    #[serde(default)]
    pub axis: crate::calibration::OperatingAxis,
    /// factory calibration for the axis when omitted
    pub points: Option<Vec<crate::calibration::CalibrationPoint>>,
}

impl CalibrationConfiguration {
    pub fn to_table(
        &self,
    ) -> Result<crate::calibration::CalibrationTable, crate::calibration::ValidationError> {
        crate::calibration::CalibrationTable::new(match &self.points {
            Some(points) => points.to_owned(),
            None => self.axis.default_calibration(),
        })
    }
}

#[derive(serde::Deserialize, PartialEq, Debug, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum SampleFormat {
    Text,
    GeoJson,
}

#[derive(serde::Deserialize, PartialEq, Debug, Clone)]
pub struct SampleSourceConfiguration {
    pub path: String,
    /// inferred from the file extension when omitted
    pub format: Option<SampleFormat>,
}

impl SampleSourceConfiguration {
    pub fn format(&self) -> SampleFormat {
        match self.format {
            Some(format) => format,
            None => {
                let path = self.path.to_lowercase();
                if path.ends_with(".geojson") || path.ends_with(".json") {
                    SampleFormat::GeoJson
                } else {
                    SampleFormat::Text
                }
            }
        }
    }

    pub fn to_connection(
        &self,
    ) -> Result<crate::connection::Connection, crate::connection::ConnectionError> {
        Ok(match self.format() {
            SampleFormat::Text => crate::connection::Connection::SampleTextFile(
                crate::connection::file::SampleTextFile::new(self.path.to_owned())?,
            ),
            SampleFormat::GeoJson => crate::connection::Connection::GeoJsonFile(
                crate::connection::file::GeoJsonFile::new(self.path.to_owned())?,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::offset::TimeZone;

    #[test]
    fn test_example_1() {
        let path = format!(
            "{:}/{:}",
            env!("CARGO_MANIFEST_DIR"),
            "demos/example_1.yaml"
        );

        let configuration = RunConfiguration::from_file(std::path::Path::new(&path)).unwrap();

        assert_eq!(configuration.name, "morning_drive");
        assert_eq!(
            configuration.calibration.axis,
            crate::calibration::OperatingAxis::EngineSpeed
        );
        assert_eq!(
            configuration.calibration.to_table().unwrap().points(),
            crate::calibration::DEFAULT_ENGINE_SPEED_CALIBRATION.as_slice()
        );
        assert_eq!(
            configuration.samples,
            vec![
                SampleSourceConfiguration {
                    path: String::from("data/drive.csv"),
                    format: None,
                },
                SampleSourceConfiguration {
                    path: String::from("data/drive.geojson"),
                    format: None,
                },
            ]
        );
        assert_eq!(configuration.samples[1].format(), SampleFormat::GeoJson);

        assert_eq!(
            configuration.time,
            TimeConfiguration {
                start: Some(
                    chrono::Local
                        .from_local_datetime(
                            &chrono::NaiveDate::from_ymd_opt(2023, 11, 14)
                                .unwrap()
                                .and_hms_opt(0, 0, 0)
                                .unwrap()
                        )
                        .unwrap()
                ),
                end: None,
            }
        );

        #[cfg(feature = "sync")]
        assert_eq!(
            configuration.service,
            Some(crate::connection::calibration_service::CalibrationService {
                url: String::from("https://gpsspeed.onrender.com"),
            })
        );
    }

    #[test]
    fn test_defaults() {
        let configuration: RunConfiguration = serde_yaml::from_str("samples: []").unwrap();

        assert_eq!(configuration.name, "unnamed_drive");
        assert_eq!(configuration.time, TimeConfiguration::default());
        assert_eq!(
            configuration.calibration.axis,
            crate::calibration::OperatingAxis::Speed
        );
        assert_eq!(
            configuration.calibration.to_table().unwrap().points(),
            crate::calibration::DEFAULT_SPEED_CALIBRATION.as_slice()
        );
    }

    #[test]
    fn test_custom_calibration() {
        let configuration: RunConfiguration = serde_yaml::from_str(
            r#"
name: custom
calibration:
  axis: speed
  points:
    - { operating_value: 0, fuel_flow_l_per_hour: 0.6 }
    - { operating_value: 50, fuel_flow_l_per_hour: 7.5 }
samples:
  - path: track.txt
    format: text
  - path: track.json
"#,
        )
        .unwrap();

        let table = configuration.calibration.to_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.idle_point().unwrap().fuel_flow_l_per_hour, 0.6);
        assert_eq!(configuration.samples[0].format(), SampleFormat::Text);
        assert_eq!(configuration.samples[1].format(), SampleFormat::GeoJson);
    }

    #[test]
    fn test_invalid_calibration() {
        let configuration: RunConfiguration = serde_yaml::from_str(
            r#"
calibration:
  points:
    - { operating_value: 10, fuel_flow_l_per_hour: -2.0 }
"#,
        )
        .unwrap();

        assert!(configuration.calibration.to_table().is_err());
    }
}
