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

use chrono::{Local, Timelike};
use crate::dto::Reading;
use crate::error::SensorError;
use std::f64::consts::TAU;

#[cfg(feature = "sense-hat")]
pub use self::sense_hat::SenseHatBoard;

///
/// Raw access to an environmental sensor board. Every call blocks until the
/// hardware answers.
///
pub trait SensorBoard {
    fn name(&self) -> &'static str;

    /// Degrees Celsius.
    fn read_temperature(&mut self) -> Result<f64, SensorError>;

    /// Hectopascal (millibar).
    fn read_pressure(&mut self) -> Result<f64, SensorError>;

    /// Relative humidity in percent.
    fn read_humidity(&mut self) -> Result<f64, SensorError>;
}

impl<B: SensorBoard + ?Sized> SensorBoard for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn read_temperature(&mut self) -> Result<f64, SensorError> {
        (**self).read_temperature()
    }

    fn read_pressure(&mut self) -> Result<f64, SensorError> {
        (**self).read_pressure()
    }

    fn read_humidity(&mut self) -> Result<f64, SensorError> {
        (**self).read_humidity()
    }
}

// Beyond 2^52 an f64 carries no fractional digits left to round.
const INTEGRAL_LIMIT: f64 = 4_503_599_627_370_496.0;

///
/// Rounds half away from zero to `precision` decimal places. Values that
/// have no digits beyond that precision are returned untouched.
///
pub fn round_to(value: f64, precision: u8) -> f64 {
    let scale = 10f64.powi(precision as i32);
    let scaled = value * scale;
    if !scaled.is_finite() || scaled.abs() >= INTEGRAL_LIMIT {
        return value;
    }
    scaled.round() / scale
}

pub struct SensorReader<B> {
    board: B,
}

impl<B: SensorBoard> SensorReader<B> {
    pub fn new(board: B) -> SensorReader<B> {
        SensorReader { board: board }
    }

    ///
    /// Samples all three quantities once and rounds them. Hardware errors
    /// are handed to the caller as they are.
    ///
    pub fn read(&mut self, precision: u8) -> Result<Reading, SensorError> {
        let temperature = self.board.read_temperature()?;
        let pressure = self.board.read_pressure()?;
        let humidity = self.board.read_humidity()?;
        Ok(Reading {
            temperature: round_to(temperature, precision),
            pressure: round_to(pressure, precision),
            humidity: round_to(humidity, precision),
        })
    }

    pub fn board_name(&self) -> &'static str {
        self.board.name()
    }
}

///
/// Stand-in board for hosts without the hardware. Values follow the time of
/// day; the very first pressure sample is zero like on a cold Sense HAT.
///
pub struct SimulatedBoard {
    pressure_reads: u64,
}

impl SimulatedBoard {
    pub fn new() -> SimulatedBoard {
        SimulatedBoard { pressure_reads: 0 }
    }

    // 0.0 at midnight, 0.5 at noon
    fn day_fraction() -> f64 {
        let now = Local::now();
        (now.num_seconds_from_midnight() as f64) / 86_400.0
    }
}

impl SensorBoard for SimulatedBoard {
    fn name(&self) -> &'static str {
        "simulated board"
    }

    fn read_temperature(&mut self) -> Result<f64, SensorError> {
        // warmest at 15:00
        let phase = (Self::day_fraction() - 15.0 / 24.0) * TAU;
        Ok(21.0 + 2.5 * phase.cos())
    }

    fn read_pressure(&mut self) -> Result<f64, SensorError> {
        self.pressure_reads += 1;
        if self.pressure_reads == 1 {
            return Ok(0.0);
        }
        Ok(1013.25 + 0.8 * (Self::day_fraction() * 2.0 * TAU).sin())
    }

    fn read_humidity(&mut self) -> Result<f64, SensorError> {
        let phase = (Self::day_fraction() - 15.0 / 24.0) * TAU;
        Ok(45.0 - 6.0 * phase.cos())
    }
}

#[cfg(feature = "sense-hat")]
mod sense_hat {
    use super::SensorBoard;
    use crate::error::SensorError;
    use sensehat::SenseHat;

    pub struct SenseHatBoard {
        hat: SenseHat<'static>,
    }

    impl SenseHatBoard {
        pub fn open() -> Result<SenseHatBoard, SensorError> {
            let hat = SenseHat::new().map_err(|e| SensorError::new(format!("{:?}", e)))?;
            Ok(SenseHatBoard { hat: hat })
        }
    }

    impl SensorBoard for SenseHatBoard {
        fn name(&self) -> &'static str {
            "Sense HAT"
        }

        fn read_temperature(&mut self) -> Result<f64, SensorError> {
            self.hat
                .get_temperature_from_humidity()
                .map(|t| t.as_celsius())
                .map_err(|e| SensorError::new(format!("temperature: {:?}", e)))
        }

        fn read_pressure(&mut self) -> Result<f64, SensorError> {
            self.hat
                .get_pressure()
                .map(|p| p.as_hectopascals())
                .map_err(|e| SensorError::new(format!("pressure: {:?}", e)))
        }

        fn read_humidity(&mut self) -> Result<f64, SensorError> {
            self.hat
                .get_humidity()
                .map(|h| h.as_percent())
                .map_err(|e| SensorError::new(format!("humidity: {:?}", e)))
        }
    }
}
