use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Fetched,
    Stable,
    Increased,
    Decreased,
}

impl ChangeType {
    pub fn header(&self) -> &'static str {
        match self {
            ChangeType::Fetched => "PRICE FETCHED",
            ChangeType::Stable => "PRICE IS STABLE",
            ChangeType::Increased => "PRICE INCREASED",
            ChangeType::Decreased => "PRICE DECREASED",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub change_type: ChangeType,
    pub message: String,
    /// Stability flag to carry into the next comparison.
    pub now_stable: bool,
    /// Set when this is a stable report following another stable report.
    pub overwrite_previous: bool,
}

/// Trait for implementing value trackers
pub trait TrackerPlugin: Send + Sync {
    fn name(&self) -> &str;

    /// Turn the raw element text into a value.
    fn parse(&self, text: &str) -> Result<f64>;
    fn format(&self, value: f64) -> String;

    /// Classify `new_value` against the previous observation.
    fn compare(
        &self,
        old_value: f64,
        new_value: f64,
        is_first_run: bool,
        was_stable: bool,
    ) -> ComparisonResult;
}
