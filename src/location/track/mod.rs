#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedSource {
    /// first sample of a track with no device speed
    Initial,
    Reported,
    Derived,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackUpdate {
    pub speed_kmh: f64,
    pub incremental_distance_km: f64,
    pub speed_source: SpeedSource,
}

#[derive(Clone, Debug, Default)]
pub struct TrackState {
    pub last_sample: Option<crate::location::GeoSample>,
    pub total_distance_km: f64,
}

/// speed and distance estimation over a single stream of samples
#[derive(Clone, Debug, Default)]
pub struct VehicleTrack {
    state: TrackState,
}

impl VehicleTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_distance_km(&self) -> f64 {
        self.state.total_distance_km
    }

    pub fn last_sample(&self) -> Option<&crate::location::GeoSample> {
        self.state.last_sample.as_ref()
    }

    pub fn observe(
        &mut self,
        sample: crate::location::GeoSample,
    ) -> Result<TrackUpdate, TrackError> {
        if let Err(message) = sample.validate() {
            return Err(TrackError::InvalidSample { message });
        }

        let reported_speed = sample.reported_speed_kmh();

        let (incremental_distance_km, derived_speed_kmh) = match &self.state.last_sample {
            Some(last_sample) => {
                let interval = match sample
                    .timestamp_millis
                    .checked_sub(last_sample.timestamp_millis)
                {
                    Some(interval) => interval,
                    None => {
                        return Err(TrackError::InvalidSample {
                            message: format!(
                                "interval from {:} ms to {:} ms is out of range",
                                last_sample.timestamp_millis, sample.timestamp_millis
                            ),
                        })
                    }
                };
                let elapsed_hours = crate::units::milliseconds_to_hours(interval);
                if elapsed_hours <= 0.0 {
                    return Err(TrackError::InvalidSampleOrdering {
                        previous: last_sample.timestamp_millis,
                        current: sample.timestamp_millis,
                    });
                }

                let distance = last_sample.distance_km(&sample);
                (distance, Some(distance / elapsed_hours))
            }
            None => (0.0, None),
        };

        let (speed_kmh, speed_source) = match (reported_speed, derived_speed_kmh) {
            (Some(speed), _) => (speed, SpeedSource::Reported),
            (None, Some(speed)) => (speed, SpeedSource::Derived),
            (None, None) => (0.0, SpeedSource::Initial),
        };

        self.state.last_sample = Some(sample);
        self.state.total_distance_km += incremental_distance_km;

        Ok(TrackUpdate {
            speed_kmh,
            incremental_distance_km,
            speed_source,
        })
    }

    pub fn reset(&mut self) {
        self.state = TrackState::default();
    }
}

custom_error::custom_error! {pub TrackError
    InvalidSampleOrdering { previous: i64, current: i64 } = "sample at {current} ms does not follow the previous sample at {previous} ms",
    InvalidSample { message: String } = "invalid sample; {message}",
}
