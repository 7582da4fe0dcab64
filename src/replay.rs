pub type LogMessage = (chrono::DateTime<chrono::Local>, String, log::Level);

/// Feed every sample from the given connections through the session in time order.
///
/// Samples outside `start`..=`end` are skipped and samples the session rejects are dropped;
/// both are reported in the returned messages rather than aborting the replay.
pub fn replay_samples(
    connections: &[crate::connection::Connection],
    session: &mut crate::session::EstimationSession,
    start: Option<chrono::DateTime<chrono::Local>>,
    end: Option<chrono::DateTime<chrono::Local>>,
) -> (Vec<crate::session::EstimationResult>, Vec<LogMessage>) {
    let mut samples: Vec<crate::location::GeoSample> = vec![];
    let mut messages = Vec::<LogMessage>::new();
    let mut results = vec![];

    for connection in connections {
        match connection.retrieve_samples() {
            Ok(retrieved) => samples.extend(retrieved),
            Err(error) => {
                messages.push((chrono::Local::now(), error.to_string(), log::Level::Error));
            }
        }
    }

    let num_samples = samples.len();
    messages.push((
        chrono::Local::now(),
        format!("received {:} samples", num_samples),
        log::Level::Debug,
    ));

    samples.sort_by_key(|sample| sample.timestamp_millis);

    let mut skipped: usize = 0;
    let mut rejected: usize = 0;
    let mut fuel_used_l = 0.0;
    let mut fuel_withheld: usize = 0;
    let mut previous_timestamp: Option<i64> = None;
    let mut previous_fuel_flow: Option<f64> = None;

    for sample in samples {
        if let Some(start) = start {
            if sample.timestamp_millis < start.timestamp_millis() {
                skipped += 1;
                continue;
            }
        }

        if let Some(end) = end {
            if sample.timestamp_millis > end.timestamp_millis() {
                skipped += 1;
                continue;
            }
        }

        let timestamp = sample.timestamp_millis;
        let source = sample.source.to_owned();
        match session.observe_sample(sample) {
            Ok(result) => {
                // fuel burned since the previous sample at the previous rate
                if let (Some(previous_timestamp), Some(previous_fuel_flow)) =
                    (previous_timestamp, previous_fuel_flow)
                {
                    fuel_used_l += previous_fuel_flow
                        * crate::units::milliseconds_to_hours(timestamp - previous_timestamp);
                }
                if result.fuel.is_err() {
                    fuel_withheld += 1;
                }
                previous_timestamp = Some(timestamp);
                previous_fuel_flow = result.fuel_flow_l_per_hour();

                messages.push((
                    chrono::Local::now(),
                    sample_update(&result),
                    log::Level::Debug,
                ));
                results.push(result);
            }
            Err(error) => {
                rejected += 1;
                messages.push((
                    chrono::Local::now(),
                    format!("dropped sample from {:}; {:}", source, error),
                    log::Level::Warn,
                ));
            }
        }
    }

    if skipped > 0 {
        messages.push((
            chrono::Local::now(),
            format!("skipped {:} samples outside of the time window", skipped),
            log::Level::Debug,
        ));
    }

    if fuel_withheld > 0 {
        messages.push((
            chrono::Local::now(),
            format!(
                "fuel rate withheld for {:} samples; {:}",
                fuel_withheld,
                crate::calibration::interpolate::InterpolationError::NoCalibrationData
            ),
            log::Level::Error,
        ));
    }

    messages.push((
        chrono::Local::now(),
        track_update(&results, fuel_used_l, rejected),
        log::Level::Info,
    ));

    (results, messages)
}

fn sample_update(result: &crate::session::EstimationResult) -> String {
    let time = match chrono::DateTime::from_timestamp_millis(result.timestamp_millis) {
        Some(time) => time.with_timezone(&chrono::Local).to_rfc3339(),
        None => format!("{:} ms", result.timestamp_millis),
    };
    format!("{:} - {:}", time, result.summary())
}

fn track_update(
    results: &[crate::session::EstimationResult],
    fuel_used_l: f64,
    rejected: usize,
) -> String {
    let (first, last) = match (results.first(), results.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return format!("no samples accepted ({:} rejected)", rejected),
    };

    let elapsed = chrono::Duration::milliseconds(last.timestamp_millis - first.timestamp_millis);
    let elapsed_hours = crate::units::milliseconds_to_hours(elapsed.num_milliseconds());

    let mut message = format!(
        "{:} samples ({:} rejected) over {:} - distance: {:.3} km",
        results.len(),
        rejected,
        crate::utilities::duration_string(&elapsed),
        last.total_distance_km,
    );

    if elapsed_hours > 0.0 {
        message += &format!(
            " - avg. speed: {:.2} km/h",
            last.total_distance_km / elapsed_hours
        );
    }

    message += &format!(" - est. fuel used: {:.3} L", fuel_used_l);
    if last.total_distance_km > 0.0 {
        message += &format!(
            " ({:.2} L/100 km)",
            fuel_used_l / last.total_distance_km * 100.0
        );
    }

    message
}
