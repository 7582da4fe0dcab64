pub fn approx_equal(a: f64, b: f64, decimal_precision: u8) -> bool {
    let p = 10f64.powi(-(decimal_precision as i32));
    (a - b).abs() < p
}

fn parse_local_datetime(value: &str) -> Result<chrono::DateTime<chrono::Local>, String> {
    let naive = match chrono::NaiveDateTime::parse_from_str(value, &crate::DATETIME_FORMAT) {
        Ok(datetime) => datetime,
        Err(_) => match chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => date.and_time(chrono::NaiveTime::MIN),
            Err(error) => return Err(format!("{:}; {:}", value, error)),
        },
    };

    naive
        .and_local_timezone(chrono::Local)
        .earliest()
        .ok_or_else(|| format!("{:} does not exist in the local timezone", value))
}

pub mod optional_local_datetime_string {
    use serde::Deserialize;

    pub fn serialize<S>(
        date: &Option<chrono::DateTime<chrono::Local>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if let Some(ref date) = *date {
            return serializer.serialize_str(&format!("{:}", date.format(&crate::DATETIME_FORMAT)));
        }
        serializer.serialize_none()
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<Option<chrono::DateTime<chrono::Local>>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value: Option<String> = Option::deserialize(deserializer)?;
        match value {
            Some(value) => Ok(Some(
                super::parse_local_datetime(&value).map_err(serde::de::Error::custom)?,
            )),
            None => Ok(None),
        }
    }
}

pub fn duration_string(duration: &chrono::Duration) -> String {
    let mut parts = vec![];

    let hours = duration.num_hours().abs();
    let minutes = duration.num_minutes().abs() % 60;
    let seconds = duration.num_seconds().abs() % 60;

    if hours > 0 {
        parts.push(format!("{:}h", hours));
    }

    if minutes > 0 {
        parts.push(format!("{:}m", minutes));
    }

    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{:}s", seconds));
    }

    if duration < &chrono::Duration::zero() {
        parts.push("ago".to_string());
    }

    parts.join(" ")
}
