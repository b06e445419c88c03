use crate::Result;
use crate::pipeline::ReleaseReport;

/// Configuration for JSON output
#[derive(Debug, Clone)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Convert a release report to JSON
pub fn report_to_json(report: &ReleaseReport, config: &JsonConfig) -> Result<String> {
    if config.pretty { Ok(serde_json::to_string_pretty(report)?) } else { Ok(serde_json::to_string(report)?) }
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, report: &ReleaseReport) -> Result<String> {
        report_to_json(report, &self.config)
    }
}
