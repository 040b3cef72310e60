//! Shared helpers for requester tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;

use skycheck_cli::Console;
use skycheck_locate::{Coordinates, Dataset, LocationRecord, ResolverClient, ResolverServer};
use tokio::io::DuplexStream;
use tokio::task::JoinHandle;

/// Console fed from a fixed script of answers. Records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    pub output: Vec<String>,
    pub prompts: Vec<String>,
    pub clears: usize,
}

impl ScriptedConsole {
    pub fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn saw(&self, line: &str) -> bool {
        self.output.iter().any(|l| l == line)
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl Console for ScriptedConsole {
    fn show(&mut self, line: &str) {
        self.output.push(line.to_string());
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.prompts.push(prompt.to_string());
        self.inputs
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn clear(&mut self) {
        self.clears += 1;
    }
}

pub fn record(
    id: u64,
    name: &str,
    state: Option<&str>,
    country: &str,
    lat: f64,
    lon: f64,
) -> LocationRecord {
    LocationRecord {
        id,
        name: name.to_string(),
        state: state.map(String::from),
        country: country.to_string(),
        coord: Coordinates { lon, lat },
    }
}

pub fn dataset() -> Dataset {
    Dataset::new(vec![
        record(4250542, "Springfield", Some("IL"), "US", 39.80, -89.64),
        record(4575352, "Columbia", Some("SC"), "US", 34.00, -81.03),
        record(4381982, "Columbia", Some("MO"), "US", 38.95, -92.33),
        record(4682464, "Columbia", Some("TX"), "US", 29.30, -94.90),
        record(4352053, "Columbia", Some("MD"), "US", 39.24, -76.84),
        record(3685533, "Columbia", None, "CO", 4.00, -72.00),
        record(2988507, "Paris", None, "FR", 48.85, 2.35),
        record(4717560, "Paris", Some("TX"), "US", 33.66, -95.56),
    ])
}

/// Run a resolver on one end of an in-memory channel.
pub fn start_resolver(dataset: Dataset) -> (ResolverClient<DuplexStream>, JoinHandle<()>) {
    let (client_end, server_end) = tokio::io::duplex(64 * 1024);
    let handle = tokio::spawn(async move {
        let mut server = ResolverServer::new(dataset);
        server.serve(server_end).await.unwrap();
    });
    (ResolverClient::new(client_end), handle)
}
