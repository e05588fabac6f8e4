use super::*;
use serde_json::json;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// =============================================================
// LeaveApplication
// =============================================================

#[test]
fn leave_application_parses_backend_row() {
    let raw = json!({
        "id": 7,
        "user": {"id": 3, "username": "jdoe", "name": "Jane", "email": "jane@example.com"},
        "leave_type": "Sick",
        "start_date": "2025-03-03",
        "end_date": "2025-03-05",
        "reason": "Flu and fever",
        "status": "Pending",
        "manager": 2
    });
    let app: LeaveApplication = serde_json::from_value(raw).unwrap();
    assert_eq!(app.id, 7);
    assert_eq!(app.leave_type, LeaveType::Sick);
    assert_eq!(app.start_date, date(2025, 3, 3));
    assert_eq!(app.status, LeaveStatus::Pending);
    assert_eq!(app.user.as_ref().map(|u| u.id), Some(3));
    assert_eq!(app.duration_days(), 3);
}

#[test]
fn leave_application_without_user_is_owned_by_caller() {
    let raw = json!({
        "id": 1, "leave_type": "Annual", "start_date": "2025-03-03", "end_date": "2025-03-03",
        "reason": "Family wedding", "status": "Approved", "manager": 2
    });
    let app: LeaveApplication = serde_json::from_value(raw).unwrap();
    assert!(app.user.is_none());
    assert!(app.is_owned_by(42));
}

#[test]
fn leave_application_owner_check_uses_nested_user() {
    let raw = json!({
        "id": 1, "user": {"id": 5, "name": "Sam"}, "leave_type": "Annual",
        "start_date": "2025-03-03", "end_date": "2025-03-03",
        "reason": "Family wedding", "status": "Pending", "manager": 2
    });
    let app: LeaveApplication = serde_json::from_value(raw).unwrap();
    assert!(app.is_owned_by(5));
    assert!(!app.is_owned_by(6));
}

#[test]
fn new_leave_application_serializes_wire_shape() {
    let payload = NewLeaveApplication {
        start_date: date(2025, 1, 10),
        end_date: date(2025, 1, 12),
        leave_type: LeaveType::Personal,
        reason: "Moving apartments".to_owned(),
        manager: 4,
        status: LeaveStatus::Pending,
    };
    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        json!({
            "start_date": "2025-01-10",
            "end_date": "2025-01-12",
            "leave_type": "Personal",
            "reason": "Moving apartments",
            "manager": 4,
            "status": "Pending"
        })
    );
}

// =============================================================
// Enums
// =============================================================

#[test]
fn leave_type_parses_case_insensitively() {
    assert_eq!("annual".parse::<LeaveType>(), Ok(LeaveType::Annual));
    assert_eq!(" Sick ".parse::<LeaveType>(), Ok(LeaveType::Sick));
    assert_eq!("Vacation".parse::<LeaveType>(), Err(UnknownVariant("Vacation".to_owned())));
}

#[test]
fn leave_status_rejected_is_inactive() {
    assert!(LeaveStatus::Pending.is_active());
    assert!(LeaveStatus::Approved.is_active());
    assert!(!LeaveStatus::Rejected.is_active());
    assert_eq!(LeaveStatus::default(), LeaveStatus::Pending);
}

#[test]
fn status_update_serializes_status_string() {
    let body = StatusUpdate { status: LeaveStatus::Rejected };
    assert_eq!(serde_json::to_value(body).unwrap(), json!({"status": "Rejected"}));
}

// =============================================================
// Auth payloads
// =============================================================

#[test]
fn refresh_response_tolerates_missing_rotation_fields() {
    let resp: RefreshResponse = serde_json::from_value(json!({"access": "a2"})).unwrap();
    assert_eq!(resp.access, "a2");
    assert!(resp.refresh.is_none());
    assert!(resp.user.is_none());
}

#[test]
fn signin_response_parses_user() {
    let resp: SignInResponse = serde_json::from_value(json!({
        "access": "a1",
        "refresh": "r1",
        "user": {"id": 1, "name": "Ada", "username": "ada", "email": "ada@example.com"}
    }))
    .unwrap();
    assert_eq!(resp.user.name, "Ada");
    assert_eq!(resp.refresh, "r1");
}

#[test]
fn token_requests_use_backend_keys() {
    assert_eq!(serde_json::to_value(RefreshRequest { refresh: "r" }).unwrap(), json!({"refresh": "r"}));
    assert_eq!(serde_json::to_value(VerifyRequest { token: "t" }).unwrap(), json!({"token": "t"}));
}

#[test]
fn report_row_parses() {
    let row: LeaveReportRow = serde_json::from_value(json!({
        "employee_name": "Jane", "leave_type": "Annual", "total_days": 5,
        "pending_days": 1, "approved_days": 3, "rejected_days": 1
    }))
    .unwrap();
    assert_eq!(row.total_days, 5);
}
