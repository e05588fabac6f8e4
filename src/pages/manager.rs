//! Manager page: subordinate applications, status decisions and the
//! total-leaves report.
//!
//! Both datasets load together and replace page state only when both arrive.
//! Sections start collapsed.

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{info, warn};

use super::failure_message;
use crate::components::toast::ToastQueue;
use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{ApplicationId, LeaveApplication, LeaveReportRow, LeaveStatus};
use crate::state::session::SessionContext;

/// Collapsible page sections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Applications,
    Report,
}

/// Result of a status change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusOutcome {
    Updated,
    /// The application already has that status; the action is disabled.
    Unchanged,
    NotFound,
    Failed,
}

/// Report rows summed per employee across leave types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeeTotals {
    pub employee_name: String,
    pub total_days: i64,
    pub pending_days: i64,
    pub approved_days: i64,
    pub rejected_days: i64,
}

pub struct ManagerPage {
    api: ApiClient,
    ctx: SessionContext,
    applications: Vec<LeaveApplication>,
    report: Vec<LeaveReportRow>,
    applications_open: bool,
    report_open: bool,
    toasts: ToastQueue,
}

impl ManagerPage {
    pub fn new(api: ApiClient, ctx: SessionContext) -> Self {
        Self {
            api,
            ctx,
            applications: Vec::new(),
            report: Vec::new(),
            applications_open: false,
            report_open: false,
            toasts: ToastQueue::default(),
        }
    }

    #[must_use]
    pub fn applications(&self) -> &[LeaveApplication] {
        &self.applications
    }

    /// Applications still awaiting a decision.
    pub fn pending(&self) -> impl Iterator<Item = &LeaveApplication> {
        self.applications.iter().filter(|a| a.status == LeaveStatus::Pending)
    }

    #[must_use]
    pub fn report(&self) -> &[LeaveReportRow] {
        &self.report
    }

    #[must_use]
    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastQueue {
        &mut self.toasts
    }

    fn client(&self) -> ApiClient {
        self.api.for_session(&self.ctx)
    }

    /// Fetch subordinate applications and the report concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first failure; page state is left untouched.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let api = self.client();
        let (applications, report) = tokio::join!(api.list_subordinate_applications(), api.total_leaves_report());
        match applications.and_then(|apps| report.map(|rows| (apps, rows))) {
            Ok((apps, rows)) => {
                info!(applications = apps.len(), report_rows = rows.len(), "manager data loaded");
                self.applications = apps;
                self.report = rows;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load manager data");
                self.toasts.error(failure_message(&e, "Failed to load team data"), Instant::now());
                Err(e)
            }
        }
    }

    /// Whether the action setting `status` is enabled for `app`.
    #[must_use]
    pub fn action_enabled(app: &LeaveApplication, status: LeaveStatus) -> bool {
        app.status != status
    }

    pub async fn set_status(&mut self, id: ApplicationId, status: LeaveStatus) -> StatusOutcome {
        let now = Instant::now();
        let Some(app) = self.applications.iter().find(|a| a.id == id) else {
            self.toasts.error("Leave application not found", now);
            return StatusOutcome::NotFound;
        };
        if !Self::action_enabled(app, status) {
            return StatusOutcome::Unchanged;
        }

        match self.client().update_application_status(id, status).await {
            Ok(_) => {
                info!(application_id = id, %status, "application status updated");
                if let Some(app) = self.applications.iter_mut().find(|a| a.id == id) {
                    app.status = status;
                }
                self.toasts.success(format!("Application {}", status.as_str().to_lowercase()), now);
                StatusOutcome::Updated
            }
            Err(e) => {
                warn!(error = %e, application_id = id, %status, "status update failed");
                self.toasts.error(failure_message(&e, "Failed to update application status"), now);
                StatusOutcome::Failed
            }
        }
    }

    pub fn toggle_section(&mut self, section: Section) {
        let open = match section {
            Section::Applications => &mut self.applications_open,
            Section::Report => &mut self.report_open,
        };
        *open = !*open;
    }

    #[must_use]
    pub fn is_open(&self, section: Section) -> bool {
        match section {
            Section::Applications => self.applications_open,
            Section::Report => self.report_open,
        }
    }

    /// Report totals per employee, ordered by name.
    #[must_use]
    pub fn report_totals(&self) -> Vec<EmployeeTotals> {
        let mut totals: BTreeMap<&str, EmployeeTotals> = BTreeMap::new();
        for row in &self.report {
            let entry = totals.entry(row.employee_name.as_str()).or_insert_with(|| EmployeeTotals {
                employee_name: row.employee_name.clone(),
                ..EmployeeTotals::default()
            });
            entry.total_days += row.total_days;
            entry.pending_days += row.pending_days;
            entry.approved_days += row.approved_days;
            entry.rejected_days += row.rejected_days;
        }
        totals.into_values().collect()
    }
}
