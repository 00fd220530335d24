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

/// Every point ends up in this measurement.
pub const MEASUREMENT: &str = "sensors";

/// One rounded sample of the board. Temperature in °C, pressure in hPa,
/// humidity in %RH.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
}

impl Reading {
    ///
    /// Field name/value pairs, sorted by name.
    ///
    pub fn fields(&self) -> [(&'static str, f64); 3] {
        [
            ("humidity", self.humidity),
            ("pressure", self.pressure),
            ("temperature", self.temperature),
        ]
    }

    ///
    /// Names of the fields that are exactly zero. The board reports zeros
    /// while it is still initializing, so these are treated as suspicious.
    ///
    pub fn zero_fields(&self) -> Vec<&'static str> {
        [
            ("temperature", self.temperature),
            ("pressure", self.pressure),
            ("humidity", self.humidity),
        ]
        .iter()
        .filter(|&&(_, v)| v == 0.0)
        .map(|&(name, _)| name)
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tags {
    pub house: String,
    pub room: String,
}

impl Tags {
    pub fn new<H: Into<String>, R: Into<String>>(house: H, room: R) -> Tags {
        Tags {
            house: house.into(),
            room: room.into(),
        }
    }

    /// Key/value pairs, sorted by key.
    pub fn pairs(&self) -> [(&'static str, &str); 2] {
        [("house", &self.house), ("room", &self.room)]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point<'a> {
    measurement: &'static str,
    tags: &'a Tags,
    fields: Reading,
}

impl<'a> Point<'a> {
    pub fn new(tags: &'a Tags, reading: Reading) -> Point<'a> {
        Point {
            measurement: MEASUREMENT,
            tags: tags,
            fields: reading,
        }
    }

    pub fn measurement(&self) -> &'static str {
        self.measurement
    }

    pub fn tags(&self) -> &Tags {
        self.tags
    }

    pub fn fields(&self) -> Reading {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fields_lists_every_zero_value() {
        let r = Reading {
            temperature: 0.0,
            pressure: 1005.2,
            humidity: 0.0,
        };
        assert_eq!(r.zero_fields(), vec!["temperature", "humidity"]);

        let ok = Reading {
            temperature: 21.3,
            pressure: 1012.8,
            humidity: 40.1,
        };
        assert!(ok.zero_fields().is_empty());
    }

    #[test]
    fn negative_zero_counts_as_zero() {
        let r = Reading {
            temperature: -0.0,
            pressure: 1000.0,
            humidity: 50.0,
        };
        assert_eq!(r.zero_fields(), vec!["temperature"]);
    }

    #[test]
    fn point_serializes_like_the_influx_json_body() {
        let tags = Tags::new("Lakehouse", "Bedroom");
        let point = Point::new(&tags,
                               Reading {
                                   temperature: 21.3,
                                   pressure: 1012.8,
                                   humidity: 40.1,
                               });
        let json: serde_json::Value = serde_json::to_value(&point).unwrap();
        assert_eq!(json["measurement"], "sensors");
        assert_eq!(json["tags"]["room"], "Bedroom");
        assert_eq!(json["tags"]["house"], "Lakehouse");
        assert_eq!(json["fields"]["temperature"], 21.3);
        assert_eq!(json["fields"]["pressure"], 1012.8);
        assert_eq!(json["fields"]["humidity"], 40.1);
    }
}
