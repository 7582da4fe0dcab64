pub mod interpolate;

lazy_static::lazy_static! {
    // factory calibration for a small petrol engine
    pub static ref DEFAULT_SPEED_CALIBRATION: Vec<CalibrationPoint> = vec![
        CalibrationPoint::new(0.0, 0.8),
        CalibrationPoint::new(20.0, 10.0),
        CalibrationPoint::new(40.0, 16.0),
        CalibrationPoint::new(60.0, 22.5),
    ];
    pub static ref DEFAULT_ENGINE_SPEED_CALIBRATION: Vec<CalibrationPoint> = vec![
        CalibrationPoint::new(850.0, 0.8),
        CalibrationPoint::new(3200.0, 10.0),
        CalibrationPoint::new(4500.0, 16.0),
        CalibrationPoint::new(5850.0, 22.5),
    ];
}

/// which quantity the calibration curve is keyed by
#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperatingAxis {
    /// vehicle speed in km/h
    #[default]
    Speed,
    /// engine speed in RPM
    EngineSpeed,
}

impl OperatingAxis {
    pub fn default_calibration(&self) -> Vec<CalibrationPoint> {
        match self {
            Self::Speed => DEFAULT_SPEED_CALIBRATION.to_owned(),
            Self::EngineSpeed => DEFAULT_ENGINE_SPEED_CALIBRATION.to_owned(),
        }
    }

    /// factory calibration as a table; the constant points are known to be valid
    pub fn default_table(&self) -> CalibrationTable {
        CalibrationTable {
            points: self.default_calibration(),
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Speed => "km/h",
            Self::EngineSpeed => "RPM",
        }
    }
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, Debug, PartialEq)]
pub struct CalibrationPoint {
    pub operating_value: f64,
    pub fuel_flow_l_per_hour: f64,
}

impl CalibrationPoint {
    pub fn new(operating_value: f64, fuel_flow_l_per_hour: f64) -> Self {
        Self {
            operating_value,
            fuel_flow_l_per_hour,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationField {
    OperatingValue,
    FuelFlow,
}

impl std::fmt::Display for CalibrationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OperatingValue => write!(f, "operating value"),
            Self::FuelFlow => write!(f, "fuel flow"),
        }
    }
}

/// Calibration points as seen by the interpolator.
///
/// Every mutation is checked against a candidate copy of the points before it replaces the
/// live contents, so a rejected edit leaves the table exactly as it was.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CalibrationTable {
    points: Vec<CalibrationPoint>,
}

impl CalibrationTable {
    pub fn new(points: Vec<CalibrationPoint>) -> Result<Self, ValidationError> {
        validate(&points)?;
        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[CalibrationPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn replace_all(&mut self, points: Vec<CalibrationPoint>) -> Result<(), ValidationError> {
        validate(&points)?;
        self.points = points;
        Ok(())
    }

    pub fn set_field(
        &mut self,
        index: usize,
        field: CalibrationField,
        value: f64,
    ) -> Result<(), ValidationError> {
        let mut candidate = self.points.to_owned();
        let length = candidate.len();
        let point = match candidate.get_mut(index) {
            Some(point) => point,
            None => return Err(ValidationError::IndexOutOfRange { index, length }),
        };

        match field {
            CalibrationField::OperatingValue => point.operating_value = value,
            CalibrationField::FuelFlow => point.fuel_flow_l_per_hour = value,
        }

        validate(&candidate)?;
        self.points = candidate;
        Ok(())
    }

    /// parse a raw value from an editing surface and apply it
    pub fn set_field_from_str(
        &mut self,
        index: usize,
        field: CalibrationField,
        text: &str,
    ) -> Result<(), ValidationError> {
        match text.trim().parse::<f64>() {
            Ok(value) => self.set_field(index, field, value),
            Err(_) => Err(ValidationError::Unparsable {
                field: field.to_string(),
                text: text.to_string(),
            }),
        }
    }

    /// points ordered by operating value; ties keep insertion order
    pub fn sorted_by_operating_value(&self) -> Vec<CalibrationPoint> {
        let mut sorted = self.points.to_owned();
        sorted.sort_by(|a, b| a.operating_value.total_cmp(&b.operating_value));
        sorted
    }

    /// the point with the lowest operating value
    pub fn idle_point(&self) -> Option<CalibrationPoint> {
        self.points
            .iter()
            .copied()
            .reduce(|lowest, point| {
                if point.operating_value < lowest.operating_value {
                    point
                } else {
                    lowest
                }
            })
    }
}

fn validate(points: &[CalibrationPoint]) -> Result<(), ValidationError> {
    for (index, point) in points.iter().enumerate() {
        if !point.operating_value.is_finite() {
            return Err(ValidationError::NonFiniteValue {
                index,
                field: CalibrationField::OperatingValue.to_string(),
            });
        }
        if !point.fuel_flow_l_per_hour.is_finite() {
            return Err(ValidationError::NonFiniteValue {
                index,
                field: CalibrationField::FuelFlow.to_string(),
            });
        }
        if point.fuel_flow_l_per_hour < 0.0 {
            return Err(ValidationError::NegativeFuelFlow {
                index,
                value: point.fuel_flow_l_per_hour,
            });
        }
    }

    let mut operating_values: Vec<f64> = points.iter().map(|point| point.operating_value).collect();
    operating_values.sort_by(|a, b| a.total_cmp(b));
    for pair in operating_values.windows(2) {
        if pair[0] == pair[1] {
            return Err(ValidationError::DuplicateOperatingValue { value: pair[0] });
        }
    }

    Ok(())
}

custom_error::custom_error! {pub ValidationError
    NegativeFuelFlow { index: usize, value: f64 } = "fuel flow of {value} L/h at point {index} is negative",
    NonFiniteValue { index: usize, field: String } = "{field} at point {index} is not a finite number",
    DuplicateOperatingValue { value: f64 } = "operating value {value} appears more than once",
    IndexOutOfRange { index: usize, length: usize } = "no calibration point at index {index} in a table of {length}",
    Unparsable { field: String, text: String } = "{field} '{text}' is not a number",
}
