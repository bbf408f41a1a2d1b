//! The date and hour that name the next saved file.
//!
//! Each value has a text field mirror. Edits go through [`DateHourSelector::set_date_text`]
//! and [`DateHourSelector::set_hour_text`]; a rejected edit stays in the field
//! (so the user can keep typing) but never reaches the stored value.

use chrono::{Local, NaiveDate, Timelike};
use log::warn;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("The date must be in the form yyyy-MM-dd - year, month and day ({0})")]
    Date(String),
    #[error("The value must be an integer")]
    NotAnInteger,
    #[error("The hour of the day must be from 0 to 23 (inclusive)")]
    HourOutOfRange,
}

#[derive(Debug, Clone)]
pub struct DateHourSelector {
    date: NaiveDate,
    hour: u32,
    date_text: String,
    hour_text: String,
    date_error: Option<ValidationError>,
    hour_error: Option<ValidationError>,
}

impl DateHourSelector {
    /// Starts at the given date and hour; hours past 23 are clamped.
    pub fn new(date: NaiveDate, hour: u32) -> Self {
        let hour = hour.min(23);
        Self {
            date,
            hour,
            date_text: format_date(date),
            hour_text: hour.to_string(),
            date_error: None,
            hour_error: None,
        }
    }

    /// Starts at the current local date and hour.
    pub fn now() -> Self {
        let now = Local::now();
        Self::new(now.date_naive(), now.hour())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn date_text(&self) -> &str {
        &self.date_text
    }

    pub fn hour_text(&self) -> &str {
        &self.hour_text
    }

    pub fn date_error(&self) -> Option<&ValidationError> {
        self.date_error.as_ref()
    }

    pub fn hour_error(&self) -> Option<&ValidationError> {
        self.hour_error.as_ref()
    }

    pub fn set_date_text(&mut self, text: &str) -> Result<(), ValidationError> {
        self.date_text = text.to_owned();
        let result = parse_date(text);
        match &result {
            Ok(date) => {
                self.date = *date;
                self.date_error = None;
            }
            Err(e) => self.date_error = Some(e.clone()),
        }
        result.map(|_| ())
    }

    pub fn set_hour_text(&mut self, text: &str) -> Result<(), ValidationError> {
        self.hour_text = text.to_owned();
        let result = parse_hour(text);
        match &result {
            Ok(hour) => {
                self.hour = *hour;
                self.hour_error = None;
            }
            Err(e) => self.hour_error = Some(e.clone()),
        }
        result.map(|_| ())
    }

    pub fn increment_date(&mut self) {
        match self.date.succ_opt() {
            Some(date) => self.date = date,
            None => warn!("cannot move past {}", self.date),
        }
        self.sync_date_text();
    }

    pub fn decrement_date(&mut self) {
        match self.date.pred_opt() {
            Some(date) => self.date = date,
            None => warn!("cannot move before {}", self.date),
        }
        self.sync_date_text();
    }

    pub fn increment_hour(&mut self) {
        if self.hour >= 23 {
            self.increment_date();
            self.hour = 0;
        } else {
            self.hour += 1;
        }
        self.sync_hour_text();
    }

    pub fn decrement_hour(&mut self) {
        if self.hour == 0 {
            self.decrement_date();
            self.hour = 23;
        } else {
            self.hour -= 1;
        }
        self.sync_hour_text();
    }

    fn sync_date_text(&mut self) {
        self.date_text = format_date(self.date);
        self.date_error = None;
    }

    fn sync_hour_text(&mut self) {
        self.hour_text = self.hour.to_string();
        self.hour_error = None;
    }
}

impl Default for DateHourSelector {
    fn default() -> Self {
        Self::now()
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(text: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|e| ValidationError::Date(e.to_string()))
}

fn parse_hour(text: &str) -> Result<u32, ValidationError> {
    let value: i64 = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotAnInteger)?;
    match u32::try_from(value) {
        Ok(hour) if hour < 24 => Ok(hour),
        _ => Err(ValidationError::HourOutOfRange),
    }
}
