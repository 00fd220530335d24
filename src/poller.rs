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

use crate::datasink::PointSink;
use crate::dto::Tags;
use crate::error::SensorError;
use crate::sensor::{SensorBoard, SensorReader};
use std::convert::Infallible;
use std::thread;
use std::time::Duration;

pub trait Pause {
    fn pause(&mut self, duration: Duration);
}

pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Wait after the discarded first sample.
    pub warm_up: Duration,
    /// Wait after every submitted point.
    pub interval: Duration,
}

impl Default for Schedule {
    fn default() -> Schedule {
        Schedule {
            warm_up: Duration::from_secs(5),
            interval: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WarmUp,
    Steady,
}

///
/// Reads the board and writes points, one at a time, forever. The first
/// sample after start-up is thrown away because a freshly initialized board
/// tends to report zeros.
///
pub struct Poller<B, S, P = ThreadSleep> {
    reader: SensorReader<B>,
    sink: S,
    tags: Tags,
    precision: u8,
    pause: P,
    schedule: Schedule,
    phase: Phase,
}

impl<B, S, P> Poller<B, S, P>
    where B: SensorBoard,
          S: PointSink,
          P: Pause
{
    pub fn new(reader: SensorReader<B>, sink: S, tags: Tags, precision: u8, pause: P) -> Self {
        Poller {
            reader: reader,
            sink: sink,
            tags: tags,
            precision: precision,
            pause: pause,
            schedule: Schedule::default(),
            phase: Phase::WarmUp,
        }
    }

    ///
    /// Reads once, drops the sample and waits. Does nothing after the first
    /// call.
    ///
    pub fn warm_up(&mut self) -> Result<(), SensorError> {
        if self.phase == Phase::Steady {
            return Ok(());
        }
        let discarded = self.reader.read(self.precision)?;
        debug!("Discarding warm-up sample {:?}", discarded);
        self.pause.pause(self.schedule.warm_up);
        self.phase = Phase::Steady;
        Ok(())
    }

    ///
    /// One steady-state iteration: read, write, wait. Returns whether the
    /// point was stored; only sensor errors are raised. Leaves the phase
    /// alone, so `warm_up` has to come first.
    ///
    pub fn step(&mut self) -> Result<bool, SensorError> {
        let reading = self.reader.read(self.precision)?;
        let stored = self.sink.write(&self.tags, reading);
        self.pause.pause(self.schedule.interval);
        Ok(stored)
    }

    pub fn run(mut self) -> Result<Infallible, SensorError> {
        info!("Polling {} every {:?} for room '{}' in '{}'",
              self.reader.board_name(),
              self.schedule.interval,
              self.tags.room,
              self.tags.house);
        self.warm_up()?;
        loop {
            self.step()?;
        }
    }
}
