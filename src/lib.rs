//! Speed, distance, and fuel consumption estimation from a stream of position fixes.
//!
//! Fuel flow is not measured; it is read off a calibration curve that maps an operating value
//! (vehicle speed or engine speed) to litres per hour. An [`session::EstimationSession`]
//! owns one vehicle's track and calibration and turns each [`location::GeoSample`] into an
//! [`session::EstimationResult`].

pub mod calibration;
pub mod configuration;
pub mod connection;
pub mod location;
pub mod replay;
pub mod session;
pub mod units;
pub mod utilities;

lazy_static::lazy_static! {
    pub static ref DATETIME_FORMAT: String = "%Y-%m-%d %H:%M:%S".to_string();
    pub static ref LOG_LEVEL: log::Level = log::Level::Info;
}
