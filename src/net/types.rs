//! Wire DTOs for the QuickLeave REST backend.
//!
//! DESIGN
//! ======
//! Field names mirror the backend JSON exactly (snake_case, `access`/`refresh`
//! token keys) so no rename attributes are needed on the hot types. Dates are
//! `YYYY-MM-DD` strings on the wire and `NaiveDate` here.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type ApplicationId = i64;

/// A user as returned by `/users/`, `/signin/` and `/token/refresh/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Kind of leave being requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveType {
    Annual,
    Sick,
    Personal,
}

impl LeaveType {
    pub const ALL: [LeaveType; 3] = [LeaveType::Annual, LeaveType::Sick, LeaveType::Personal];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Annual => "Annual",
            Self::Sick => "Sick",
            Self::Personal => "Personal",
        }
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a known [`LeaveType`] or [`LeaveStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0}")]
pub struct UnknownVariant(pub String);

impl FromStr for LeaveType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant(s.to_owned()))
    }
}

/// Lifecycle status of an application. Only managers move it off `Pending`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub const ALL: [LeaveStatus; 3] = [LeaveStatus::Pending, LeaveStatus::Approved, LeaveStatus::Rejected];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Rejected applications no longer reserve their dates.
    #[must_use]
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaveStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant(s.to_owned()))
    }
}

/// A stored leave application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    pub id: ApplicationId,
    /// Owner; the backend nests the full user on reads.
    #[serde(default)]
    pub user: Option<User>,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    /// Approving manager's user id.
    pub manager: UserId,
}

impl LeaveApplication {
    /// Whether `user_id` owns this application. Rows without a nested user
    /// come from the caller's own `/applications/` listing.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user.as_ref().map_or(true, |u| u.id == user_id)
    }

    /// Inclusive length in days.
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Payload for `POST /applications/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLeaveApplication {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: LeaveType,
    pub reason: String,
    pub manager: UserId,
    pub status: LeaveStatus,
}

/// Payload for `PATCH /applications/{id}/`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: LeaveStatus,
}

/// One row of `/total-leaves-report/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveReportRow {
    pub employee_name: String,
    pub leave_type: String,
    pub total_days: i64,
    pub pending_days: i64,
    pub approved_days: i64,
    pub rejected_days: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Token pair plus identity returned by `POST /signin/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

/// Body of `POST /token/refresh/`. `refresh` is present only when the backend
/// rotates refresh tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct VerifyRequest<'a> {
    pub token: &'a str,
}
