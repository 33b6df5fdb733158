use crate::plugins::traits::{ChangeType, ComparisonResult, TrackerPlugin};
use crate::utils::error::{AppError, Result};
use regex::Regex;

const DEFAULT_CURRENCY_MARKERS: [&str; 7] = ["US$", "USD", "EUR", "GBP", "€", "£", "$"];

pub struct PriceTracker {
    amount_regex: Regex,
    currency_markers: Vec<String>,
}

impl PriceTracker {
    pub fn new() -> Self {
        Self::with_currency_markers(&DEFAULT_CURRENCY_MARKERS)
    }

    pub fn with_currency_markers(markers: &[&str]) -> Self {
        let mut currency_markers: Vec<String> = markers
            .iter()
            .filter(|m| !m.is_empty())
            .map(|m| m.to_string())
            .collect();
        // Check longer markers first (US$ before $)
        currency_markers.sort_by(|a, b| b.len().cmp(&a.len()));

        PriceTracker {
            amount_regex: Regex::new(r"^\d(?:[\d.,]*\d)?$").unwrap(),
            currency_markers,
        }
    }

    /// Strips currency markers and whitespace, then rewrites the amount with a
    /// `.` decimal separator and no grouping separators.
    pub fn normalize(&self, text: &str) -> Result<String> {
        let mut cleaned = text.to_string();
        for marker in &self.currency_markers {
            cleaned = cleaned.replace(marker.as_str(), "");
        }
        let cleaned: String = cleaned.chars().filter(|c| !c.is_whitespace()).collect();

        if !self.amount_regex.is_match(&cleaned) {
            return Err(AppError::parse(format!("'{}' is not a price", text.trim())));
        }

        let last_comma = cleaned.rfind(',');
        let last_dot = cleaned.rfind('.');

        let normalized = match (last_comma, last_dot) {
            (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
            (Some(_), Some(_)) => cleaned.replace(',', ""),
            (Some(_), None) if cleaned.matches(',').count() > 1 => cleaned.replace(',', ""),
            (Some(_), None) => cleaned.replace(',', "."),
            (None, Some(_)) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
            _ => cleaned,
        };

        Ok(normalized)
    }
}

impl Default for PriceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerPlugin for PriceTracker {
    fn name(&self) -> &str {
        "Price Tracker"
    }

    fn parse(&self, text: &str) -> Result<f64> {
        let normalized = self.normalize(text)?;
        let value = normalized
            .parse::<f64>()
            .map_err(|e| AppError::parse(format!("'{}' is not a price: {}", text.trim(), e)))?;

        if !value.is_finite() {
            return Err(AppError::parse(format!("'{}' is out of range", text.trim())));
        }
        Ok(value)
    }

    fn format(&self, value: f64) -> String {
        format!("{:.2}", value)
    }

    #[allow(clippy::float_cmp)]
    fn compare(
        &self,
        old_value: f64,
        new_value: f64,
        is_first_run: bool,
        was_stable: bool,
    ) -> ComparisonResult {
        let change_type = if is_first_run {
            ChangeType::Fetched
        } else if new_value == old_value {
            ChangeType::Stable
        } else if new_value < old_value {
            ChangeType::Decreased
        } else {
            ChangeType::Increased
        };

        let message = match change_type {
            ChangeType::Fetched | ChangeType::Stable => {
                format!("{} (at {})", change_type.header(), self.format(new_value))
            }
            ChangeType::Increased | ChangeType::Decreased => format!(
                "{} (from {} to {})",
                change_type.header(),
                self.format(old_value),
                self.format(new_value)
            ),
        };

        let now_stable = change_type == ChangeType::Stable;

        ComparisonResult {
            change_type,
            message,
            now_stable,
            overwrite_previous: now_stable && was_stable,
        }
    }
}
