//! Employee page: own applications, the leave form and withdrawals.
//!
//! DESIGN
//! ======
//! Applications and the manager list load concurrently and independently; one
//! failing leaves the other usable. Submission validates against the caller's
//! own active applications before posting, appends the created record and
//! resets the form. Withdrawal is only offered for the caller's own Pending
//! applications.
//!
//! ERROR HANDLING
//! ==============
//! Remote failures become toasts. Field-keyed backend errors for form fields
//! are merged into the inline errors so the user sees them next to the input.

#[cfg(test)]
#[path = "employee_test.rs"]
mod employee_test;

use std::time::Instant;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::{SubmitOutcome, failure_message};
use crate::components::busy::BusyFlag;
use crate::components::toast::ToastQueue;
use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{ApplicationId, LeaveApplication, LeaveStatus, User};
use crate::state::session::SessionContext;
use crate::validation::FieldErrors;
use crate::validation::leave::{
    FIELD_END_DATE, FIELD_LEAVE_TYPE, FIELD_MANAGER, FIELD_REASON, FIELD_START_DATE, LeaveForm,
};

const FORM_FIELDS: [&str; 5] = [FIELD_START_DATE, FIELD_END_DATE, FIELD_LEAVE_TYPE, FIELD_REASON, FIELD_MANAGER];

/// Result of a withdraw request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WithdrawOutcome {
    Withdrawn,
    NotFound,
    NotPending,
    NotOwner,
    Failed,
}

pub struct EmployeePage {
    api: ApiClient,
    ctx: SessionContext,
    form: LeaveForm,
    errors: FieldErrors,
    applications: Vec<LeaveApplication>,
    managers: Vec<User>,
    toasts: ToastQueue,
    busy: BusyFlag,
}

impl EmployeePage {
    pub fn new(api: ApiClient, ctx: SessionContext) -> Self {
        Self {
            api,
            ctx,
            form: LeaveForm::default(),
            errors: FieldErrors::new(),
            applications: Vec::new(),
            managers: Vec::new(),
            toasts: ToastQueue::default(),
            busy: BusyFlag::default(),
        }
    }

    #[must_use]
    pub fn form(&self) -> &LeaveForm {
        &self.form
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub fn applications(&self) -> &[LeaveApplication] {
        &self.applications
    }

    #[must_use]
    pub fn managers(&self) -> &[User] {
        &self.managers
    }

    #[must_use]
    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastQueue {
        &mut self.toasts
    }

    /// Whether the submit action is currently disabled.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Shared view of the in-flight flag, readable while `submit` runs.
    #[must_use]
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// Set one form field by name and clear its error. Unknown names are ignored.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            FIELD_START_DATE => &mut self.form.start_date,
            FIELD_END_DATE => &mut self.form.end_date,
            FIELD_LEAVE_TYPE => &mut self.form.leave_type,
            FIELD_REASON => &mut self.form.reason,
            FIELD_MANAGER => &mut self.form.manager,
            _ => return false,
        };
        *slot = value.into();
        self.errors.clear_field(field);
        true
    }

    fn client(&self) -> ApiClient {
        self.api.for_session(&self.ctx)
    }

    /// Load own applications and the manager list.
    ///
    /// # Errors
    ///
    /// Returns the first failure after recording a toast for each one. Data
    /// from the call that succeeded is kept.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let api = self.client();
        let (applications, managers) = tokio::join!(api.list_applications(), api.list_users());
        let now = Instant::now();

        let applications = match applications {
            Ok(list) => {
                self.applications = list;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load leave applications");
                self.toasts.error(failure_message(&e, "Failed to load leave applications"), now);
                Err(e)
            }
        };
        let managers = match managers {
            Ok(list) => {
                self.managers = list;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load managers");
                self.toasts.error(failure_message(&e, "Failed to load managers"), now);
                Err(e)
            }
        };
        applications.and(managers)
    }

    /// Applications the overlap check runs against. With no user id in the
    /// session every row counts as the caller's; `/applications/` only ever
    /// returns the caller's own rows.
    fn own_applications(&self) -> Vec<LeaveApplication> {
        let user_id = self.ctx.snapshot().user_id();
        self.applications
            .iter()
            .filter(|app| user_id.is_none_or(|id| app.is_owned_by(id)))
            .cloned()
            .collect()
    }

    /// Validate and post the form. `today` anchors the past-date check.
    pub async fn submit(&mut self, today: NaiveDate) -> SubmitOutcome {
        let Some(_in_flight) = self.busy.try_begin() else {
            return SubmitOutcome::Busy;
        };
        let payload = match self.form.to_request(&self.own_applications(), today) {
            Ok(payload) => payload,
            Err(errors) => {
                self.errors = errors;
                return SubmitOutcome::Invalid;
            }
        };
        self.errors.clear();

        let result = self.client().create_application(&payload).await;

        let now = Instant::now();
        match result {
            Ok(created) => {
                info!(application_id = created.id, days = created.duration_days(), "leave application submitted");
                self.applications.push(created);
                self.form.reset();
                self.toasts.success("Leave application submitted", now);
                SubmitOutcome::Submitted
            }
            Err(e) => {
                warn!(error = %e, "leave application rejected");
                self.errors.merge(e.field_errors().only(&FORM_FIELDS));
                self.toasts.error(failure_message(&e, "Failed to submit leave application"), now);
                SubmitOutcome::Failed
            }
        }
    }

    /// Whether the withdraw action is offered for `app`.
    #[must_use]
    pub fn can_withdraw(&self, app: &LeaveApplication) -> bool {
        let owned = self.ctx.snapshot().user_id().is_some_and(|id| app.is_owned_by(id));
        owned && app.status == LeaveStatus::Pending
    }

    /// Withdraw (delete) one of the caller's Pending applications.
    pub async fn withdraw(&mut self, id: ApplicationId) -> WithdrawOutcome {
        let now = Instant::now();
        let Some(app) = self.applications.iter().find(|a| a.id == id) else {
            self.toasts.error("Leave application not found", now);
            return WithdrawOutcome::NotFound;
        };
        if !self.ctx.snapshot().user_id().is_some_and(|uid| app.is_owned_by(uid)) {
            self.toasts.error("You can only withdraw your own applications", now);
            return WithdrawOutcome::NotOwner;
        }
        if app.status != LeaveStatus::Pending {
            self.toasts.error("Only pending applications can be withdrawn", now);
            return WithdrawOutcome::NotPending;
        }

        match self.client().delete_application(id).await {
            Ok(()) => {
                info!(application_id = id, "leave application withdrawn");
                self.applications.retain(|a| a.id != id);
                self.toasts.success("Leave application withdrawn", now);
                WithdrawOutcome::Withdrawn
            }
            Err(e) => {
                warn!(error = %e, application_id = id, "withdraw failed");
                self.toasts.error(failure_message(&e, "Failed to withdraw leave application"), now);
                WithdrawOutcome::Failed
            }
        }
    }
}
