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

use crate::dto::{Point, Reading, Tags};
use crate::error::WriteError;

///
/// Warning text for readings with fields that are exactly zero, which the
/// board reports while it is still initializing. `None` for clean readings.
///
pub fn faulty_warning(reading: &Reading) -> Option<String> {
    let zeros = reading.zero_fields();
    if zeros.is_empty() {
        return None;
    }
    Some(format!("Faulty datapoint, {} == 0: {:?}", zeros.join(", "), reading))
}

pub trait PointSink {
    ///
    /// Hands one point to the store. `Ok` only if the store acknowledged it.
    ///
    fn send(&mut self, point: &Point) -> Result<(), WriteError>;

    ///
    /// Turns a reading into a point and submits it. Failures are logged and
    /// the reading is dropped; the return value tells whether it was stored.
    ///
    fn write(&mut self, tags: &Tags, reading: Reading) -> bool {
        if let Some(warning) = faulty_warning(&reading) {
            warn!("{}", warning);
        }

        let point = Point::new(tags, reading);
        match serde_json::to_string(&point) {
            Ok(json) => info!("Inserting: {}", json),
            Err(_) => info!("Inserting: {:?}", point),
        }

        match self.send(&point) {
            Ok(()) => {
                info!("Inserted successfully");
                true
            }
            Err(e) => {
                error!("Insertion failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::testlog;
    use log::Level;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Remembers every point it is given. Rejects all of them when `accept`
    /// is false.
    pub struct RecordingSink {
        pub accept: bool,
        pub points: Rc<RefCell<Vec<(String, Tags, Reading)>>>,
    }

    impl RecordingSink {
        pub fn new(accept: bool) -> RecordingSink {
            RecordingSink {
                accept: accept,
                points: Rc::new(RefCell::new(Vec::new())),
            }
        }
    }

    impl PointSink for RecordingSink {
        fn send(&mut self, point: &Point) -> Result<(), WriteError> {
            self.points
                .borrow_mut()
                .push((point.measurement().to_owned(), point.tags().clone(), point.fields()));
            if self.accept {
                Ok(())
            } else {
                Err(WriteError::NoFields)
            }
        }
    }

    #[test]
    fn write_reports_acknowledged_points() {
        let tags = Tags::new("Lakehouse", "Bedroom");
        let reading = Reading {
            temperature: 21.3,
            pressure: 1012.8,
            humidity: 40.1,
        };
        let mut sink = RecordingSink::new(true);
        assert!(sink.write(&tags, reading));

        let points = sink.points.borrow();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].0, "sensors");
        assert_eq!(points[0].1, tags);
        assert_eq!(points[0].2, reading);
    }

    #[test]
    fn zero_fields_are_still_submitted() {
        let tags = Tags::new("My House", "Attic");
        let reading = Reading {
            temperature: 0.0,
            pressure: 1005.2,
            humidity: 0.0,
        };
        let mut sink = RecordingSink::new(true);
        assert!(sink.write(&tags, reading));
        assert_eq!(sink.points.borrow()[0].2, reading);
    }

    #[test]
    fn warning_names_every_zero_field() {
        let reading = Reading {
            temperature: 0.0,
            pressure: 1005.2,
            humidity: 0.0,
        };
        let warning = faulty_warning(&reading).unwrap();
        assert!(warning.starts_with("Faulty datapoint, temperature, humidity == 0"));
        assert!(warning.contains("1005.2"));

        let clean = Reading {
            temperature: 21.3,
            pressure: 1012.8,
            humidity: 40.1,
        };
        assert_eq!(faulty_warning(&clean), None);
    }

    #[test]
    fn zero_reading_logs_one_warning_and_is_written() {
        testlog::install();
        let tags = Tags::new("My House", "Cellar 7");
        let reading = Reading {
            temperature: 0.0,
            pressure: 1007.7,
            humidity: 0.0,
        };
        let mut sink = RecordingSink::new(true);
        assert!(sink.write(&tags, reading));

        let warnings = testlog::matching(Level::Warn, "pressure: 1007.7");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("temperature, humidity == 0"));
        assert_eq!(sink.points.borrow().len(), 1);
    }

    #[test]
    fn rejected_write_returns_false() {
        let tags = Tags::new("My House", "Attic");
        let reading = Reading {
            temperature: 19.0,
            pressure: 1001.0,
            humidity: 55.0,
        };
        let mut sink = RecordingSink::new(false);
        assert!(!sink.write(&tags, reading));
        assert_eq!(sink.points.borrow().len(), 1);
    }
}
