//! client for the remote calibration endpoint; replies are passed back to the user as-is

#[derive(serde::Deserialize, serde::Serialize, Debug, PartialEq, Clone)]
pub struct CalibrationService {
    pub url: String,
}

#[derive(serde::Deserialize, Debug, PartialEq, Clone)]
pub struct ServiceReply {
    pub status: String,
    pub message: String,
}

impl CalibrationService {
    pub fn new(url: String) -> Result<Self, crate::connection::ConnectionError> {
        match url::Url::parse(&url) {
            Ok(_) => Ok(Self { url }),
            Err(error) => Err(crate::connection::ConnectionError::FailedToEstablish {
                connection: url,
                message: error.to_string(),
            }),
        }
    }

    fn endpoint(&self) -> String {
        format!("{:}/calibrate", self.url.trim_end_matches('/'))
    }

    /// `{"<axis key>": [...], "fuel": [...]}`, ordered by operating value
    pub fn payload(
        table: &crate::calibration::CalibrationTable,
        axis: crate::calibration::OperatingAxis,
    ) -> serde_json::Value {
        let sorted = table.sorted_by_operating_value();
        let operating_values: Vec<f64> = sorted.iter().map(|point| point.operating_value).collect();
        let fuel: Vec<f64> = sorted
            .iter()
            .map(|point| point.fuel_flow_l_per_hour)
            .collect();

        let key = match axis {
            crate::calibration::OperatingAxis::Speed => "speed",
            crate::calibration::OperatingAxis::EngineSpeed => "rpm",
        };

        let mut payload = serde_json::Map::new();
        payload.insert(key.to_string(), serde_json::json!(operating_values));
        payload.insert("fuel".to_string(), serde_json::json!(fuel));
        serde_json::Value::Object(payload)
    }

    pub fn submit(
        &self,
        table: &crate::calibration::CalibrationTable,
        axis: crate::calibration::OperatingAxis,
    ) -> Result<ServiceReply, crate::connection::ConnectionError> {
        let url = self.endpoint();

        let client = match reqwest::blocking::Client::builder()
            .user_agent(crate::connection::USER_AGENT.to_owned())
            .timeout(Some(std::time::Duration::from_secs(10)))
            .build()
        {
            Ok(client) => client,
            Err(error) => {
                return Err(crate::connection::ConnectionError::FailedToEstablish {
                    connection: url,
                    message: error.to_string(),
                })
            }
        };

        let response = match client.post(&url).json(&Self::payload(table, axis)).send() {
            Ok(response) => response,
            Err(error) => {
                return Err(crate::connection::ConnectionError::FailedToEstablish {
                    connection: url,
                    message: error.to_string(),
                })
            }
        };

        let status = response.status();
        match response.json::<ServiceReply>() {
            Ok(reply) => {
                if status.is_success() {
                    Ok(reply)
                } else {
                    Err(crate::connection::ConnectionError::ApiError {
                        message: reply.message,
                        url,
                    })
                }
            }
            Err(error) => Err(crate::connection::ConnectionError::ApiError {
                message: format!("HTTP {:} - {:}", status.as_u16(), error),
                url,
            }),
        }
    }
}
