//! Rendering of vision test results for display and download

use chrono::{DateTime, Local};

use crate::error::ClientError;

/// The outcome of one test run, ready to be shown to a user
#[derive(Debug, Clone)]
pub struct TestReport {
    pub test_name: String,
    pub model: String,
    pub timestamp: DateTime<Local>,
    /// Model response, or the rendered error text
    pub text: String,
    pub succeeded: bool,
}

impl TestReport {
    pub fn new(
        test_name: impl Into<String>,
        model: impl Into<String>,
        outcome: &Result<String, ClientError>,
    ) -> Self {
        let (text, succeeded) = match outcome {
            Ok(text) => (text.clone(), true),
            Err(e) => (e.user_message(), false),
        };
        Self {
            test_name: test_name.into(),
            model: model.into(),
            timestamp: Local::now(),
            text,
            succeeded,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Block shown in the results area
    pub fn render(&self) -> String {
        format!(
            "=== {} Results ===\n\n{}\n\n{}",
            self.test_name,
            self.text,
            "=".repeat(50)
        )
    }

    /// Plain-text file contents for saving a result
    pub fn to_download_text(&self) -> String {
        format!(
            "=== {} ===\nModel: {}\nTimestamp: {}\n\n{}",
            self.test_name,
            self.model,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.text
        )
    }
}
