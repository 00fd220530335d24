// Copyright 2016 Claus Matzinger
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde_derive;

mod config;
mod datasink;
mod dto;
mod error;
mod influx;
mod poller;
mod sensor;
#[cfg(test)]
mod testlog;

use clap::Parser;
use config::{BoardKind, Settings};
use error::{ConnectError, LoggingError, SensorError};
use influx::InfluxDbClient;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use poller::{Poller, ThreadSleep};
use sensor::{SensorBoard, SensorReader, SimulatedBoard};
use std::fmt;
use std::path::Path;
use std::process;

/// The initial ping did not answer 204.
const EXIT_UNREACHABLE: i32 = 251;
const EXIT_FAILURE: i32 = 1;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {m}{n}";

fn init_logging(config_file: Option<&Path>) -> Result<(), LoggingError> {
    if let Some(path) = config_file {
        return log4rs::init_file(path, Default::default())
            .map_err(|e| LoggingError::new(format!("{}: {}", path.display(), e)));
    }

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        .map_err(|e| LoggingError::new(e.to_string()))?;
    log4rs::init_config(config).map_err(|e| LoggingError::new(e.to_string()))?;
    Ok(())
}

fn open_board(kind: BoardKind) -> Result<Box<dyn SensorBoard>, SensorError> {
    match kind {
        BoardKind::Simulated => {
            warn!("Using the simulated board, points written are synthetic");
            Ok(Box::new(SimulatedBoard::new()))
        }
        #[cfg(feature = "sense-hat")]
        BoardKind::SenseHat => Ok(Box::new(sensor::SenseHatBoard::open()?)),
        #[cfg(not(feature = "sense-hat"))]
        BoardKind::SenseHat => {
            Err(SensorError::new("built without Sense HAT support, enable the `sense-hat` \
                                  feature or use --board simulated"))
        }
    }
}

/// Reasons the process gives up, each with its exit status.
#[derive(Debug)]
enum Fatal {
    Board(SensorError),
    Unreachable(ConnectError),
    Sensor(SensorError),
}

impl Fatal {
    fn exit_code(&self) -> i32 {
        match *self {
            Fatal::Unreachable(_) => EXIT_UNREACHABLE,
            Fatal::Board(_) | Fatal::Sensor(_) => EXIT_FAILURE,
        }
    }
}

impl fmt::Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Fatal::Board(ref e) | Fatal::Sensor(ref e) => write!(f, "{}", e),
            Fatal::Unreachable(ref e) => write!(f, "Cannot reach influxdb service, aborting: {}", e),
        }
    }
}

///
/// Connects to InfluxDB and wires up the poller. Nothing is read from the
/// board before the ping succeeded.
///
fn prepare<B: SensorBoard>(settings: &Settings, board: B) -> Result<Poller<B, InfluxDbClient>, Fatal> {
    let client = InfluxDbClient::connect(&settings.influxdb()).map_err(Fatal::Unreachable)?;
    info!("Writing to database '{}'", client.database());

    Ok(Poller::new(SensorReader::new(board),
                   client,
                   settings.tags(),
                   settings.precision,
                   ThreadSleep))
}

fn main() {
    let settings = Settings::parse();

    if let Err(e) = init_logging(settings.log_config.as_deref()) {
        eprintln!("{}", e);
        process::exit(EXIT_FAILURE);
    }
    info!("Starting sense-influx...");

    info!("Retrieving sensor board ({:?})...", settings.board);
    let outcome = open_board(settings.board)
        .map_err(Fatal::Board)
        .and_then(|board| prepare(&settings, board))
        .and_then(|poller| poller.run().map_err(Fatal::Sensor));

    match outcome {
        Ok(never) => match never {},
        Err(fatal) => {
            error!("{}", fatal);
            process::exit(fatal.exit_code());
        }
    }
}
