use super::{CalibrationPoint, CalibrationTable};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FuelPerDistance {
    LitersPerKilometer(f64),
    /// vehicle is not moving
    Stopped,
    /// no speed or operating value to work from
    Unavailable,
}

impl FuelPerDistance {
    pub fn liters_per_kilometer(&self) -> Option<f64> {
        match self {
            Self::LitersPerKilometer(value) => Some(*value),
            _ => None,
        }
    }
}

impl std::fmt::Display for FuelPerDistance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LitersPerKilometer(value) => write!(f, "{:.2} L/km", value),
            Self::Stopped => write!(f, "- L/km (stopped)"),
            Self::Unavailable => write!(f, "- L/km (speed unavailable)"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuelRate {
    pub fuel_flow_l_per_hour: f64,
    pub fuel_per_distance: FuelPerDistance,
}

impl FuelRate {
    fn unavailable() -> Self {
        Self {
            fuel_flow_l_per_hour: 0.0,
            fuel_per_distance: FuelPerDistance::Unavailable,
        }
    }
}

/// Piecewise-linear fuel flow at `operating_value`, extrapolating from the first or last
/// segment outside the calibrated range.
pub fn interpolate(
    table: &CalibrationTable,
    operating_value: f64,
) -> Result<f64, InterpolationError> {
    let sorted = table.sorted_by_operating_value();

    let (first, last) = match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(InterpolationError::NoCalibrationData),
    };

    if sorted.len() == 1 {
        return Ok(first.fuel_flow_l_per_hour);
    }

    if operating_value < first.operating_value {
        return Ok(along_segment(&sorted[0], &sorted[1], operating_value));
    }

    if operating_value > last.operating_value {
        let count = sorted.len();
        return Ok(along_segment(
            &sorted[count - 2],
            &sorted[count - 1],
            operating_value,
        ));
    }

    for pair in sorted.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        if left.operating_value <= operating_value && operating_value <= right.operating_value {
            return Ok(along_segment(left, right, operating_value));
        }
    }

    // only reachable with NaN, which the fraction would carry through anyway
    Ok(along_segment(first, last, operating_value))
}

fn along_segment(left: &CalibrationPoint, right: &CalibrationPoint, operating_value: f64) -> f64 {
    let span = right.operating_value - left.operating_value;
    if span == 0.0 {
        return left.fuel_flow_l_per_hour;
    }

    let fraction = (operating_value - left.operating_value) / span;
    left.fuel_flow_l_per_hour + fraction * (right.fuel_flow_l_per_hour - left.fuel_flow_l_per_hour)
}

/// fuel flow at the lowest calibrated operating value
pub fn idle_fuel_flow(table: &CalibrationTable) -> Result<f64, InterpolationError> {
    match table.idle_point() {
        Some(point) => Ok(point.fuel_flow_l_per_hour),
        None => Err(InterpolationError::NoCalibrationData),
    }
}

/// Fuel consumption for the current operating condition.
///
/// A stopped vehicle burns the idle point's fuel flow. Without a speed, or while moving
/// without an operating value, nothing can be inferred and flow is reported as zero with
/// the per-distance figure marked unavailable.
pub fn fuel_rate(
    table: &CalibrationTable,
    speed_kmh: Option<f64>,
    operating_value: Option<f64>,
) -> Result<FuelRate, InterpolationError> {
    let speed_kmh = match speed_kmh {
        Some(speed) => speed,
        None => return Ok(FuelRate::unavailable()),
    };

    let moving = speed_kmh > 0.0;
    if moving && operating_value.is_none() {
        return Ok(FuelRate::unavailable());
    }

    if table.is_empty() {
        return Err(InterpolationError::NoCalibrationData);
    }

    match operating_value {
        Some(operating_value) if moving => {
            let fuel_flow_l_per_hour = interpolate(table, operating_value)?;
            Ok(FuelRate {
                fuel_flow_l_per_hour,
                fuel_per_distance: FuelPerDistance::LitersPerKilometer(
                    fuel_flow_l_per_hour / speed_kmh,
                ),
            })
        }
        _ => Ok(FuelRate {
            fuel_flow_l_per_hour: idle_fuel_flow(table)?,
            fuel_per_distance: FuelPerDistance::Stopped,
        }),
    }
}

custom_error::custom_error! {pub InterpolationError
    NoCalibrationData = "no calibration data; supply at least one calibration point",
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::DEFAULT_ENGINE_SPEED_CALIBRATION;

    fn table() -> CalibrationTable {
        CalibrationTable::new(DEFAULT_ENGINE_SPEED_CALIBRATION.to_owned()).unwrap()
    }

    #[test]
    fn test_midpoint() {
        let value = interpolate(&table(), 2025.0).unwrap();
        assert!(crate::utilities::approx_equal(value, 5.4, 9));
    }

    #[test]
    fn test_calibration_points() {
        let table = table();
        for point in table.points() {
            assert!(crate::utilities::approx_equal(
                interpolate(&table, point.operating_value).unwrap(),
                point.fuel_flow_l_per_hour,
                9
            ));
        }
    }

    #[test]
    fn test_below_range() {
        let value = interpolate(&table(), 0.0).unwrap();
        let slope = (10.0 - 0.8) / (3200.0 - 850.0);
        assert!(crate::utilities::approx_equal(
            value,
            0.8 - 850.0 * slope,
            9
        ));
    }

    #[test]
    fn test_above_range() {
        let value = interpolate(&table(), 6500.0).unwrap();
        let slope = (22.5 - 16.0) / (5850.0 - 4500.0);
        assert!(crate::utilities::approx_equal(
            value,
            22.5 + 650.0 * slope,
            9
        ));
    }

    #[test]
    fn test_unsorted_table() {
        let table = CalibrationTable::new(vec![
            CalibrationPoint::new(5850.0, 22.5),
            CalibrationPoint::new(850.0, 0.8),
            CalibrationPoint::new(4500.0, 16.0),
            CalibrationPoint::new(3200.0, 10.0),
        ])
        .unwrap();
        assert!(crate::utilities::approx_equal(
            interpolate(&table, 2025.0).unwrap(),
            5.4,
            9
        ));
    }

    #[test]
    fn test_single_point() {
        let table = CalibrationTable::new(vec![CalibrationPoint::new(1000.0, 2.0)]).unwrap();
        for operating_value in [0.0, 1000.0, 9000.0] {
            assert_eq!(interpolate(&table, operating_value).unwrap(), 2.0);
        }
    }

    #[test]
    fn test_degenerate_segment() {
        let left = CalibrationPoint::new(100.0, 1.0);
        let right = CalibrationPoint::new(100.0, 3.0);
        assert_eq!(along_segment(&left, &right, 100.0), 1.0);
    }

    #[test]
    fn test_empty_table() {
        let table = CalibrationTable::empty();
        assert!(matches!(
            interpolate(&table, 2025.0),
            Err(InterpolationError::NoCalibrationData)
        ));
        assert!(matches!(
            idle_fuel_flow(&table),
            Err(InterpolationError::NoCalibrationData)
        ));
        assert!(matches!(
            fuel_rate(&table, Some(0.0), Some(0.0)),
            Err(InterpolationError::NoCalibrationData)
        ));
        assert!(matches!(
            fuel_rate(&table, Some(30.0), Some(30.0)),
            Err(InterpolationError::NoCalibrationData)
        ));
    }

    #[test]
    fn test_idle_fuel_floor() {
        let rate = fuel_rate(&table(), Some(0.0), Some(0.0)).unwrap();
        assert_eq!(rate.fuel_flow_l_per_hour, 0.8);
        assert_eq!(rate.fuel_per_distance, FuelPerDistance::Stopped);

        // stopped with no operating value still idles
        let rate = fuel_rate(&table(), Some(0.0), None).unwrap();
        assert_eq!(rate.fuel_flow_l_per_hour, 0.8);
        assert_eq!(rate.fuel_per_distance, FuelPerDistance::Stopped);
    }

    #[test]
    fn test_idle_uses_lowest_point_after_edit() {
        let mut table = table();
        table
            .set_field(0, crate::calibration::CalibrationField::FuelFlow, 1.1)
            .unwrap();
        let rate = fuel_rate(&table, Some(0.0), Some(0.0)).unwrap();
        assert_eq!(rate.fuel_flow_l_per_hour, 1.1);
    }

    #[test]
    fn test_speed_unavailable() {
        let rate = fuel_rate(&table(), None, Some(2025.0)).unwrap();
        assert_eq!(rate.fuel_flow_l_per_hour, 0.0);
        assert_eq!(rate.fuel_per_distance, FuelPerDistance::Unavailable);

        let rate = fuel_rate(&table(), Some(50.0), None).unwrap();
        assert_eq!(rate.fuel_flow_l_per_hour, 0.0);
        assert_eq!(rate.fuel_per_distance, FuelPerDistance::Unavailable);
    }

    #[test]
    fn test_fuel_per_distance() {
        let rate = fuel_rate(&table(), Some(54.0), Some(2025.0)).unwrap();
        assert!(crate::utilities::approx_equal(
            rate.fuel_flow_l_per_hour,
            5.4,
            9
        ));
        assert!(crate::utilities::approx_equal(
            rate.fuel_per_distance.liters_per_kilometer().unwrap(),
            0.1,
            9
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            FuelPerDistance::LitersPerKilometer(0.0712).to_string(),
            "0.07 L/km"
        );
        assert_eq!(FuelPerDistance::Stopped.to_string(), "- L/km (stopped)");
    }
}
