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

use crate::config::InfluxDb;
use crate::datasink::PointSink;
use crate::dto::Point;
use crate::error::{ConnectError, WriteError};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use std::fmt;
use std::time::Duration;

const MEASUREMENT_SPECIAL: &[char] = &[',', ' '];
const KEY_SPECIAL: &[char] = &[',', '=', ' '];

fn escape(raw: &str, special: &[char], out: &mut String) {
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c if special.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
}

///
/// Renders a point as one line of InfluxDB line protocol, without a
/// timestamp so that the server assigns one. Empty tag values and
/// non-finite fields are left out.
///
pub fn encode_line(point: &Point) -> Result<String, WriteError> {
    let mut line = String::new();
    escape(point.measurement(), MEASUREMENT_SPECIAL, &mut line);

    for &(key, value) in point.tags().pairs().iter() {
        if value.is_empty() {
            continue;
        }
        line.push(',');
        escape(key, KEY_SPECIAL, &mut line);
        line.push('=');
        escape(value, KEY_SPECIAL, &mut line);
    }

    let mut separator = ' ';
    for &(key, value) in point.fields().fields().iter() {
        if !value.is_finite() {
            continue;
        }
        line.push(separator);
        escape(key, KEY_SPECIAL, &mut line);
        line.push('=');
        line.push_str(&value.to_string());
        separator = ',';
    }

    if separator == ' ' {
        return Err(WriteError::NoFields);
    }
    Ok(line)
}

fn invalid_address<E: fmt::Display>(address: &str, reason: E) -> ConnectError {
    ConnectError::Address {
        address: address.to_owned(),
        reason: reason.to_string(),
    }
}

///
/// A validated connection to an InfluxDB 1.x server. Created once, reused for
/// every write.
///
pub struct InfluxDbClient {
    client: Client,
    ping_url: Url,
    write_url: Url,
    user: String,
    password: String,
    database: String,
}

impl InfluxDbClient {
    ///
    /// Builds the client and pings the server. Anything but `204 No Content`
    /// is an error; there is no retry.
    ///
    pub fn connect(conf: &InfluxDb) -> Result<InfluxDbClient, ConnectError> {
        let scheme = if conf.ssl { "https" } else { "http" };
        let address = format!("{}://{}:{}/", scheme, conf.host, conf.port);
        let base = Url::parse(&address).map_err(|e| invalid_address(&address, e))?;
        let ping_url = base.join("ping").map_err(|e| invalid_address(&address, e))?;
        let write_url = base.join("write").map_err(|e| invalid_address(&address, e))?;

        // talks straight to the LAN server, proxies from the environment are ignored
        let client = Client::builder()
            .no_proxy()
            .timeout(None::<Duration>)
            .build()
            .map_err(ConnectError::Client)?;

        let db = InfluxDbClient {
            client: client,
            ping_url: ping_url,
            write_url: write_url,
            user: conf.user.clone(),
            password: conf.password.clone(),
            database: conf.database.clone(),
        };
        match db.ping()? {
            Some(version) => info!("Connected to InfluxDB {} at {}", version, base),
            None => info!("Connected to InfluxDB at {}", base),
        }
        Ok(db)
    }

    ///
    /// Returns the server version if it announced one.
    ///
    pub fn ping(&self) -> Result<Option<String>, ConnectError> {
        let response = self.client
            .get(self.ping_url.clone())
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .map_err(ConnectError::Unreachable)?;

        if response.status() != StatusCode::NO_CONTENT {
            return Err(ConnectError::Status(response.status()));
        }
        Ok(response.headers()
            .get("X-Influxdb-Version")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_owned()))
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

impl PointSink for InfluxDbClient {
    fn send(&mut self, point: &Point) -> Result<(), WriteError> {
        let body = encode_line(point)?;
        debug!("Line protocol: {}", body);

        let response = self.client
            .post(self.write_url.clone())
            .query(&[("db", self.database.as_str())])
            .basic_auth(&self.user, Some(&self.password))
            .header("Content-Type", "application/octet-stream")
            .body(body)
            .send()
            .map_err(WriteError::Transport)?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            Ok(())
        } else {
            Err(WriteError::Rejected {
                status: status,
                body: response.text().unwrap_or_default(),
            })
        }
    }
}
