//! Leave-request validation.
//!
//! Checks run in a fixed order and stop at the first failing stage:
//! required fields, formats, start not in the past, end on or after start,
//! no overlap with the employee's active applications, duration, reason
//! length, manager selection.

#[cfg(test)]
#[path = "leave_test.rs"]
mod leave_test;

use chrono::NaiveDate;

use super::fields::FieldErrors;
use crate::net::types::{LeaveApplication, LeaveStatus, LeaveType, NewLeaveApplication, UserId};

pub const MAX_LEAVE_DAYS: i64 = 14;
pub const MIN_REASON_CHARS: usize = 10;
pub const MAX_REASON_CHARS: usize = 500;

pub const FIELD_START_DATE: &str = "start_date";
pub const FIELD_END_DATE: &str = "end_date";
pub const FIELD_LEAVE_TYPE: &str = "leave_type";
pub const FIELD_REASON: &str = "reason";
pub const FIELD_MANAGER: &str = "manager";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw leave form as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeaveForm {
    pub start_date: String,
    pub end_date: String,
    pub leave_type: String,
    pub reason: String,
    pub manager: String,
}

/// Inclusive calendar range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Inclusive overlap: either range has an endpoint inside the other.
    #[must_use]
    pub fn overlaps(&self, other: &DateRange) -> bool {
        other.contains(self.start) || other.contains(self.end) || self.contains(other.start) || self.contains(other.end)
    }

    /// Number of calendar days covered, both ends included.
    #[must_use]
    pub fn inclusive_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl From<&LeaveApplication> for DateRange {
    fn from(app: &LeaveApplication) -> Self {
        Self::new(app.start_date, app.end_date)
    }
}

/// Fields that survived the format stage.
struct ParsedForm {
    range: DateRange,
    leave_type: LeaveType,
    reason: String,
    manager: Option<UserId>,
}

/// Validate `form` against the employee's `existing` applications.
///
/// Returns per-field messages; an empty result means the form is valid.
#[must_use]
pub fn validate_leave_request(form: &LeaveForm, existing: &[LeaveApplication], today: NaiveDate) -> FieldErrors {
    match check(form, existing, today) {
        Ok(_) => FieldErrors::new(),
        Err(errors) => errors,
    }
}

impl LeaveForm {
    /// Validate and convert into a submission payload.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any check fails.
    pub fn to_request(&self, existing: &[LeaveApplication], today: NaiveDate) -> Result<NewLeaveApplication, FieldErrors> {
        check(self, existing, today)
    }

    /// Clear every field, e.g. after a successful submission.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn check(form: &LeaveForm, existing: &[LeaveApplication], today: NaiveDate) -> Result<NewLeaveApplication, FieldErrors> {
    require_fields(form)?;
    let parsed = parse_fields(form)?;
    let range = parsed.range;

    if range.start < today {
        return Err(single(FIELD_START_DATE, "Start date cannot be in the past"));
    }
    if range.end < range.start {
        return Err(single(FIELD_END_DATE, "End date must be on or after start date"));
    }
    if existing
        .iter()
        .filter(|app| app.status.is_active())
        .any(|app| range.overlaps(&DateRange::from(app)))
    {
        return Err(single(FIELD_START_DATE, "Leave dates overlap with an existing application"));
    }
    if range.inclusive_days() > MAX_LEAVE_DAYS {
        return Err(single(FIELD_END_DATE, "Leave duration cannot exceed 14 days"));
    }

    let reason_chars = parsed.reason.chars().count();
    if reason_chars < MIN_REASON_CHARS {
        return Err(single(FIELD_REASON, "Reason must be at least 10 characters"));
    }
    if reason_chars > MAX_REASON_CHARS {
        return Err(single(FIELD_REASON, "Reason cannot exceed 500 characters"));
    }

    let Some(manager) = parsed.manager else {
        return Err(single(FIELD_MANAGER, "Please select a manager"));
    };

    Ok(NewLeaveApplication {
        start_date: range.start,
        end_date: range.end,
        leave_type: parsed.leave_type,
        reason: parsed.reason,
        manager,
        status: LeaveStatus::Pending,
    })
}

fn require_fields(form: &LeaveForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    let required = [
        (FIELD_START_DATE, &form.start_date, "Start date is required"),
        (FIELD_END_DATE, &form.end_date, "End date is required"),
        (FIELD_LEAVE_TYPE, &form.leave_type, "Leave type is required"),
        (FIELD_REASON, &form.reason, "Reason is required"),
        (FIELD_MANAGER, &form.manager, "Manager is required"),
    ];
    for (field, value, message) in required {
        if value.trim().is_empty() {
            errors.insert(field, message);
        }
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn parse_fields(form: &LeaveForm) -> Result<ParsedForm, FieldErrors> {
    let mut errors = FieldErrors::new();

    let start = parse_date(&form.start_date);
    if start.is_none() {
        errors.insert(FIELD_START_DATE, "Start date must be a valid date (YYYY-MM-DD)");
    }
    let end = parse_date(&form.end_date);
    if end.is_none() {
        errors.insert(FIELD_END_DATE, "End date must be a valid date (YYYY-MM-DD)");
    }
    let leave_type = form.leave_type.parse::<LeaveType>();
    if leave_type.is_err() {
        errors.insert(FIELD_LEAVE_TYPE, "Leave type must be Annual, Sick or Personal");
    }

    match (start, end, leave_type) {
        (Some(start), Some(end), Ok(leave_type)) => Ok(ParsedForm {
            range: DateRange::new(start, end),
            leave_type,
            reason: form.reason.trim().to_owned(),
            manager: parse_manager(&form.manager),
        }),
        _ => Err(errors),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => None,
    }
}

fn parse_manager(raw: &str) -> Option<UserId> {
    match raw.trim().parse::<UserId>() {
        Ok(id) if id > 0 => Some(id),
        _ => None,
    }
}

fn single(field: &str, message: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field, message);
    errors
}
