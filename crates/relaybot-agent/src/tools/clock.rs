//! Clock tool — current time lookup.

use async_trait::async_trait;
use chrono::Utc;

use super::base::Tool;

/// Reports the current UTC date and time. Ignores its input.
pub struct ClockTool;

#[async_trait]
impl Tool for ClockTool {
    fn name(&self) -> &str {
        "current_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time (UTC). No input required."
    }

    async fn invoke(&self, _input: &str) -> anyhow::Result<String> {
        let now = Utc::now();
        Ok(format!(
            "{} ({})",
            now.format("%Y-%m-%d %H:%M:%S UTC"),
            now.format("%A")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clock_output_shape() {
        let out = ClockTool.invoke("").await.unwrap();
        assert!(out.contains("UTC"));
        // "YYYY-MM-DD HH:MM:SS UTC (Weekday)"
        assert!(out.len() > 20);
    }
}
