//! Convert command implementation
//!
//! Runs only the format transformer on a local file.

use crate::core::transform::{convert, to_csv};
use anyhow::Context;
use clap::Args;
use std::io::Write;

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// JSON export to convert
    pub input: String,

    /// Output CSV path (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<String>,
}

impl ConvertArgs {
    /// Execute the convert command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let raw = tokio::fs::read(&self.input)
            .await
            .with_context(|| format!("Failed to read {}", self.input))?;

        let csv = match convert(&raw).and_then(|artifact| {
            tracing::info!(rows = artifact.len(), input = %self.input, "Converted export");
            to_csv(&artifact)
        }) {
            Ok(csv) => csv,
            Err(e) => {
                eprintln!("❌ {} ({})", e, e.kind());
                return Ok(1);
            }
        };

        match &self.output {
            Some(path) => {
                tokio::fs::write(path, &csv)
                    .await
                    .with_context(|| format!("Failed to write {path}"))?;
                eprintln!("✅ Wrote {path}");
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&csv)?;
                stdout.flush()?;
            }
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_convert_to_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("sales.json");
        let output = dir.path().join("sales.csv");
        std::fs::write(
            &input,
            r#"[{"date":"2024-01-01","product":"Widget","sales":9.99}]"#,
        )
        .unwrap();

        let args = ConvertArgs {
            input: input.to_string_lossy().to_string(),
            output: Some(output.to_string_lossy().to_string()),
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "date,product,sales\n2024-01-01,Widget,9.99\n"
        );
    }

    #[tokio::test]
    async fn test_convert_schema_error_exit_code() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("bad.json");
        std::fs::write(&input, r#"[{"date":"2024-01-01","product":"Widget"}]"#).unwrap();

        let args = ConvertArgs {
            input: input.to_string_lossy().to_string(),
            output: None,
        };
        assert_eq!(args.execute().await.unwrap(), 1);
    }
}
