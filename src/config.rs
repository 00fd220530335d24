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

use crate::dto::Tags;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sense-influx", version,
          about = "Ships temperature, pressure and humidity readings to InfluxDB")]
pub struct Settings {
    /// Hostname/IP of the InfluxDB server
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Port of the InfluxDB HTTP API
    #[arg(long, default_value_t = 8086)]
    pub port: u16,

    /// Use TLS for the InfluxDB HTTP API
    #[arg(long)]
    pub ssl: bool,

    /// User for the InfluxDB connection
    #[arg(long, default_value = "user")]
    pub user: String,

    /// Password for the InfluxDB connection
    #[arg(long, default_value = "password")]
    pub password: String,

    /// Database to write to
    #[arg(long, default_value = "home")]
    pub database: String,

    /// Name of the house/apartment, used as the `house` tag
    #[arg(long, default_value = "My House")]
    pub house: String,

    /// Name of the room, used as the `room` tag
    #[arg(long)]
    pub room: String,

    /// Decimal places kept, e.g. 3 turns 24.0544 into 24.054
    #[arg(long, default_value_t = 2)]
    pub precision: u8,

    /// Sensor board driver
    #[arg(long, value_enum, default_value_t = BoardKind::default())]
    pub board: BoardKind,

    /// log4rs YAML file; logs to the console at INFO without it
    #[arg(long, value_name = "FILE")]
    pub log_config: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardKind {
    SenseHat,
    Simulated,
}

impl Default for BoardKind {
    fn default() -> BoardKind {
        if cfg!(feature = "sense-hat") {
            BoardKind::SenseHat
        } else {
            BoardKind::Simulated
        }
    }
}

pub struct InfluxDb {
    pub host: String,
    pub port: u16,
    pub ssl: bool,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Settings {
    pub fn influxdb(&self) -> InfluxDb {
        InfluxDb {
            host: self.host.clone(),
            port: self.port,
            ssl: self.ssl,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        }
    }

    pub fn tags(&self) -> Tags {
        Tags::new(self.house.clone(), self.room.clone())
    }
}
