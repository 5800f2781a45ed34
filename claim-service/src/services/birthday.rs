//! Birthday comparison by calendar day in the deployment's timezone.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use super::ClaimError;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, Copy)]
pub struct BirthdayMatcher {
    offset: FixedOffset,
}

impl BirthdayMatcher {
    /// Fails when the offset is a day or more away from UTC.
    pub fn new(offset_minutes: i32) -> Result<Self, ClaimError> {
        let offset = FixedOffset::east_opt(offset_minutes * 60).ok_or_else(|| {
            ClaimError::Internal(anyhow::anyhow!(
                "Invalid timezone offset: {} minutes",
                offset_minutes
            ))
        })?;

        Ok(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Resolve caller input to a calendar day.
    ///
    /// A bare date is that day. A timestamp carrying an offset is moved into
    /// the configured timezone first. A timestamp without one is read as local.
    pub fn parse_birthday_input(&self, input: &str) -> Result<NaiveDate, ClaimError> {
        let input = input.trim();

        if let Some(date) = DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        {
            return Ok(date);
        }

        if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
            return Ok(ts.with_timezone(&self.offset).date_naive());
        }

        NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
            .map(|ts| ts.date())
            .ok_or_else(|| ClaimError::ValidationError("Invalid birthday format".to_string()))
    }

    /// Same calendar day, year included.
    pub fn matches(&self, stored: NaiveDate, input: &str) -> Result<bool, ClaimError> {
        Ok(self.parse_birthday_input(input)? == stored)
    }
}
