// all unit conversions in the crate go through here

pub const EARTH_RADIUS_KM: f64 = 6371.0;

const MILLISECONDS_PER_HOUR: f64 = 3_600_000.0;
const KMH_PER_MPS: f64 = 3.6;

pub fn meters_per_second_to_kilometers_per_hour(speed: f64) -> f64 {
    speed * KMH_PER_MPS
}

pub fn kilometers_per_hour_to_meters_per_second(speed: f64) -> f64 {
    speed / KMH_PER_MPS
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

pub fn milliseconds_to_hours(milliseconds: i64) -> f64 {
    milliseconds as f64 / MILLISECONDS_PER_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_conversion() {
        assert!(crate::utilities::approx_equal(
            meters_per_second_to_kilometers_per_hour(10.0),
            36.0,
            9
        ));
        assert!(crate::utilities::approx_equal(
            kilometers_per_hour_to_meters_per_second(36.0),
            10.0,
            9
        ));
    }

    #[test]
    fn test_angle_conversion() {
        assert!(crate::utilities::approx_equal(
            degrees_to_radians(180.0),
            std::f64::consts::PI,
            12
        ));
        assert_eq!(degrees_to_radians(0.0), 0.0);
    }

    #[test]
    fn test_time_conversion() {
        assert_eq!(milliseconds_to_hours(3_600_000), 1.0);
        assert_eq!(milliseconds_to_hours(1_800_000), 0.5);
        assert_eq!(milliseconds_to_hours(-3_600_000), -1.0);
    }
}
