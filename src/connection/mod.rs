#[cfg(feature = "sync")]
pub mod calibration_service;
pub mod file;

lazy_static::lazy_static! {
    pub static ref USER_AGENT: String =
        format!("{:}/{:}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
}

#[derive(Debug)]
pub enum Connection {
    SampleTextFile(crate::connection::file::SampleTextFile),
    GeoJsonFile(crate::connection::file::GeoJsonFile),
}

impl Connection {
    pub fn retrieve_samples(&self) -> Result<Vec<crate::location::GeoSample>, ConnectionError> {
        match self {
            Self::SampleTextFile(connection) => connection.read_samples_from_file(),
            Self::GeoJsonFile(connection) => connection.read_samples_from_geojson(),
        }
    }
}

custom_error::custom_error! {pub ConnectionError
    FailedToEstablish { connection: String, message: String } = "failed to establish connection to {connection}; {message}",
    ReadFailure { connection: String, message: String } = "failed to read from {connection}; {message}",
    ParseFailure { connection: String, line: usize, message: String } = "{connection} line {line}: {message}",
    ApiError { message: String, url: String } = "{message} - {url}",
}
