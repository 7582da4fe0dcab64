use std::str::FromStr;

use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    // configuration file to read
    configuration_filename: std::path::PathBuf,

    // most verbose message level to print (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    // push the configured calibration to the calibration service before replaying
    #[arg(long, default_value_t = false)]
    sync: bool,
}

fn print_messages(messages: &[fuelrate::replay::LogMessage], log_level: log::Level) {
    for (time, message, level) in messages {
        if *level <= log_level {
            println!(
                "{:} {: <5} {:}",
                time.format(&fuelrate::DATETIME_FORMAT),
                level,
                message
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let arguments = Cli::parse();

    let log_level = match &arguments.log_level {
        Some(level) => log::Level::from_str(level)
            .map_err(|_| format!("unrecognized log level {:}", level))?,
        None => *fuelrate::LOG_LEVEL,
    };

    let configuration =
        fuelrate::configuration::RunConfiguration::from_file(&arguments.configuration_filename)?;

    let mut messages = Vec::<fuelrate::replay::LogMessage>::new();

    let calibration = configuration.calibration.to_table()?;
    messages.push((
        chrono::Local::now(),
        format!(
            "{:} - calibrated on {:} point(s) keyed by {:}",
            configuration.name,
            calibration.len(),
            configuration.calibration.axis.unit(),
        ),
        log::Level::Info,
    ));
    let mut session =
        fuelrate::session::EstimationSession::new(configuration.calibration.axis, calibration);

    if arguments.sync {
        #[cfg(feature = "sync")]
        {
            let message = match &configuration.service {
                Some(service) => match service.submit(session.calibration(), session.axis()) {
                    Ok(reply) => (chrono::Local::now(), reply.message, log::Level::Info),
                    Err(error) => (chrono::Local::now(), error.to_string(), log::Level::Error),
                },
                None => (
                    chrono::Local::now(),
                    "no calibration service configured".to_string(),
                    log::Level::Error,
                ),
            };
            messages.push(message);
        }
        #[cfg(not(feature = "sync"))]
        {
            messages.push((
                chrono::Local::now(),
                "built without calibration service support".to_string(),
                log::Level::Error,
            ));
        }
    }

    let mut connections = vec![];
    for source in &configuration.samples {
        match source.to_connection() {
            Ok(connection) => {
                messages.push((
                    chrono::Local::now(),
                    format!("reading samples from {:}", source.path),
                    log::Level::Info,
                ));
                connections.push(connection);
            }
            Err(error) => {
                messages.push((chrono::Local::now(), error.to_string(), log::Level::Error))
            }
        }
    }

    if connections.is_empty() {
        messages.push((
            chrono::Local::now(),
            "no sample sources to read".to_string(),
            log::Level::Error,
        ));
        print_messages(&messages, log_level);
        return Ok(());
    }

    print_messages(&messages, log_level);

    let (_, replay_messages) = fuelrate::replay::replay_samples(
        &connections,
        &mut session,
        configuration.time.start,
        configuration.time.end,
    );
    print_messages(&replay_messages, log_level);

    Ok(())
}
