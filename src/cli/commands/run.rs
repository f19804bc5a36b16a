//! Run command implementation
//!
//! Each `--event` document is an independent pipeline run; several runs are
//! executed concurrently and print one `{statusCode, body}` line each, in
//! argument order.

use crate::config::load_config;
use crate::core::pipeline::Pipeline;
use anyhow::Context;
use clap::Args;
use futures::future::join_all;
use serde_json::Value;
use std::io::Read;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Event document to process (`-` reads stdin); repeatable
    #[arg(short, long = "event", required = true)]
    pub events: Vec<String>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        let pipeline = match Pipeline::from_config(&config) {
            Ok(pipeline) => pipeline,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        let events = self
            .events
            .iter()
            .map(|source| read_event(source))
            .collect::<anyhow::Result<Vec<Value>>>()?;

        tracing::info!(events = events.len(), "Processing events");

        let outcomes = join_all(events.iter().map(|event| pipeline.run(event))).await;

        let mut all_succeeded = true;
        for outcome in &outcomes {
            let response = outcome.response();
            all_succeeded &= response.status_code == 200;
            println!("{}", serde_json::to_string(&response)?);
        }

        Ok(if all_succeeded { 0 } else { 1 })
    }
}

/// Reads one event document from a file or stdin
fn read_event(source: &str) -> anyhow::Result<Value> {
    let text = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read event from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read event file {source}"))?
    };

    serde_json::from_str(&text).with_context(|| format!("Event {source} is not valid JSON"))
}
