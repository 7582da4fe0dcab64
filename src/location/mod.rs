pub mod track;

/// great-circle distance between two points given in degrees (`x` is longitude, `y` is latitude)
pub fn haversine_distance_km(a: &geo::Point, b: &geo::Point) -> f64 {
    let a_latitude = crate::units::degrees_to_radians(a.y());
    let b_latitude = crate::units::degrees_to_radians(b.y());
    let delta_latitude = crate::units::degrees_to_radians(b.y() - a.y());
    let delta_longitude = crate::units::degrees_to_radians(b.x() - a.x());

    let h = (delta_latitude / 2.0).sin().powi(2)
        + a_latitude.cos() * b_latitude.cos() * (delta_longitude / 2.0).sin().powi(2);

    // rounding can push `h` a hair past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);

    crate::units::EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

#[derive(Clone, Debug)]
pub struct GeoSample {
    pub location: geo::Point,
    pub timestamp_millis: i64,
    pub reported_speed_meters_per_second: Option<f64>,
    pub engine_rpm: Option<f64>,
    pub source: SampleSource,
}

impl GeoSample {
    pub fn new(latitude: f64, longitude: f64, timestamp_millis: i64) -> Self {
        Self {
            location: geo::point!(x: longitude, y: latitude),
            timestamp_millis,
            reported_speed_meters_per_second: None,
            engine_rpm: None,
            source: SampleSource::None,
        }
    }

    pub fn with_reported_speed(mut self, meters_per_second: f64) -> Self {
        self.reported_speed_meters_per_second = Some(meters_per_second);
        self
    }

    pub fn with_engine_rpm(mut self, rpm: f64) -> Self {
        self.engine_rpm = Some(rpm);
        self
    }

    pub fn with_source(mut self, source: SampleSource) -> Self {
        self.source = source;
        self
    }

    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }

    pub fn time(&self) -> Option<chrono::DateTime<chrono::Local>> {
        chrono::DateTime::from_timestamp_millis(self.timestamp_millis)
            .map(|time| time.with_timezone(&chrono::Local))
    }

    pub fn distance_km(&self, other: &Self) -> f64 {
        haversine_distance_km(&self.location, &other.location)
    }

    /// reported speed if the device gave a usable (non-negative) one
    pub fn reported_speed_kmh(&self) -> Option<f64> {
        match self.reported_speed_meters_per_second {
            Some(speed) if speed >= 0.0 => {
                Some(crate::units::meters_per_second_to_kilometers_per_hour(speed))
            }
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let latitude = self.latitude();
        let longitude = self.longitude();

        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(format!("latitude {:} is out of range", latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("longitude {:} is out of range", longitude));
        }
        if let Some(speed) = self.reported_speed_meters_per_second {
            if !speed.is_finite() {
                return Err(format!("reported speed {:} is not a number", speed));
            }
        }
        if let Some(rpm) = self.engine_rpm {
            if !rpm.is_finite() {
                return Err(format!("engine speed {:} is not a number", rpm));
            }
        }

        Ok(())
    }
}

#[derive(Clone, Default, Debug, PartialEq)]
pub enum SampleSource {
    TextFile(String),
    GeoJsonFile(String),
    #[default]
    None,
}

impl std::fmt::Display for SampleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TextFile(path) | Self::GeoJsonFile(path) => write!(f, "{:}", path),
            Self::None => write!(f, "unknown source"),
        }
    }
}
