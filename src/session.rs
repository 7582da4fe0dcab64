use crate::calibration::interpolate::{FuelRate, InterpolationError};
use crate::calibration::{
    CalibrationField, CalibrationPoint, CalibrationTable, OperatingAxis, ValidationError,
};
use crate::location::track::{SpeedSource, TrackError, VehicleTrack};
use crate::location::GeoSample;

#[derive(Debug)]
pub struct EstimationResult {
    pub timestamp_millis: i64,
    pub speed_kmh: f64,
    pub speed_source: SpeedSource,
    pub incremental_distance_km: f64,
    pub total_distance_km: f64,
    pub fuel: Result<FuelRate, InterpolationError>,
}

impl EstimationResult {
    pub fn fuel_flow_l_per_hour(&self) -> Option<f64> {
        self.fuel.as_ref().ok().map(|rate| rate.fuel_flow_l_per_hour)
    }

    pub fn fuel_per_distance_l_per_km(&self) -> Option<f64> {
        self.fuel
            .as_ref()
            .ok()
            .and_then(|rate| rate.fuel_per_distance.liters_per_kilometer())
    }

    pub fn summary(&self) -> String {
        let mut message = format!(
            "speed: {:.2} km/h ({:?}) - traveled {:.3} km ({:.3} km total)",
            self.speed_kmh, self.speed_source, self.incremental_distance_km, self.total_distance_km,
        );
        match &self.fuel {
            Ok(rate) => {
                message += &format!(
                    " - fuel: {:.2} L/h, {:}",
                    rate.fuel_flow_l_per_hour, rate.fuel_per_distance
                )
            }
            Err(error) => message += &format!(" - fuel: {:}", error),
        }
        message
    }
}

/// A single vehicle's estimation state: its track and the calibration it is measured against.
///
/// Calibration changes take effect on the next observed sample.
#[derive(Clone, Debug)]
pub struct EstimationSession {
    track: VehicleTrack,
    calibration: CalibrationTable,
    axis: OperatingAxis,
}

impl EstimationSession {
    pub fn new(axis: OperatingAxis, calibration: CalibrationTable) -> Self {
        Self {
            track: VehicleTrack::new(),
            calibration,
            axis,
        }
    }

    /// session using the factory calibration for the given axis
    pub fn with_default_calibration(axis: OperatingAxis) -> Self {
        Self::new(axis, axis.default_table())
    }

    pub fn axis(&self) -> OperatingAxis {
        self.axis
    }

    pub fn calibration(&self) -> &CalibrationTable {
        &self.calibration
    }

    pub fn total_distance_km(&self) -> f64 {
        self.track.total_distance_km()
    }

    pub fn observe_sample(&mut self, sample: GeoSample) -> Result<EstimationResult, TrackError> {
        let timestamp_millis = sample.timestamp_millis;
        let engine_rpm = sample.engine_rpm;

        let update = self.track.observe(sample)?;

        let operating_value = match self.axis {
            OperatingAxis::Speed => Some(update.speed_kmh),
            OperatingAxis::EngineSpeed => engine_rpm,
        };

        let fuel = crate::calibration::interpolate::fuel_rate(
            &self.calibration,
            Some(update.speed_kmh),
            operating_value,
        );

        Ok(EstimationResult {
            timestamp_millis,
            speed_kmh: update.speed_kmh,
            speed_source: update.speed_source,
            incremental_distance_km: update.incremental_distance_km,
            total_distance_km: self.track.total_distance_km(),
            fuel,
        })
    }

    pub fn reset_track(&mut self) {
        self.track.reset();
    }

    pub fn replace_calibration(
        &mut self,
        points: Vec<CalibrationPoint>,
    ) -> Result<(), ValidationError> {
        self.calibration.replace_all(points)
    }

    pub fn edit_calibration_point(
        &mut self,
        index: usize,
        field: CalibrationField,
        value: f64,
    ) -> Result<(), ValidationError> {
        self.calibration.set_field(index, field, value)
    }
}
