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

use reqwest::StatusCode;
use std::error::Error;
use std::fmt;

///
/// Raised when the sensor board cannot be opened or read.
///
#[derive(Debug)]
pub struct SensorError {
    pub description: String,
}

impl SensorError {
    pub fn new<S: Into<String>>(description: S) -> SensorError {
        SensorError { description: description.into() }
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Sensor board error: {}", self.description)
    }
}

impl Error for SensorError {}

///
/// Startup failures while establishing the InfluxDB connection.
///
#[derive(Debug)]
pub enum ConnectError {
    Address { address: String, reason: String },
    Client(reqwest::Error),
    Unreachable(reqwest::Error),
    Status(StatusCode),
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConnectError::Address { ref address, ref reason } => {
                write!(f, "Invalid InfluxDB address '{}': {}", address, reason)
            }
            ConnectError::Client(ref e) => write!(f, "Could not set up HTTP client: {}", e),
            ConnectError::Unreachable(ref e) => write!(f, "InfluxDB did not answer the ping: {}", e),
            ConnectError::Status(status) => {
                write!(f, "InfluxDB ping answered {} instead of 204 No Content", status)
            }
        }
    }
}

impl Error for ConnectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ConnectError::Client(ref e) | ConnectError::Unreachable(ref e) => Some(e),
            _ => None,
        }
    }
}

///
/// A single point could not be stored. Never fatal.
///
#[derive(Debug)]
pub enum WriteError {
    NoFields,
    Transport(reqwest::Error),
    Rejected { status: StatusCode, body: String },
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            WriteError::NoFields => write!(f, "point has no finite field values"),
            WriteError::Transport(ref e) => write!(f, "request failed: {}", e),
            WriteError::Rejected { status, ref body } if body.is_empty() => {
                write!(f, "server answered {}", status)
            }
            WriteError::Rejected { status, ref body } => {
                write!(f, "server answered {}: {}", status, body.trim())
            }
        }
    }
}

impl Error for WriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            WriteError::Transport(ref e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct LoggingError {
    pub description: String,
}

impl LoggingError {
    pub fn new<S: Into<String>>(description: S) -> LoggingError {
        LoggingError { description: description.into() }
    }
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Logging setup failed: {}", self.description)
    }
}

impl Error for LoggingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_write_mentions_status_and_body() {
        let e = WriteError::Rejected {
            status: StatusCode::BAD_REQUEST,
            body: "{\"error\":\"unable to parse\"}\n".to_owned(),
        };
        let text = e.to_string();
        assert!(text.contains("400"));
        assert!(text.ends_with("unable to parse\"}"));
    }

    #[test]
    fn ping_status_error_names_expected_code() {
        let e = ConnectError::Status(StatusCode::UNAUTHORIZED);
        assert!(e.to_string().contains("401"));
        assert!(e.to_string().contains("204"));
        assert!(e.source().is_none());
    }
}
