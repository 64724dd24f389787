//! CSV 导出
//!
//! 每个导出都带表头，空数据集只输出表头行。

use csv::Writer;
use shared::models::{AttendanceRecord, Employee, LeaveAnalytics, LeaveRequest};

use crate::utils::AppError;

pub const EMPLOYEE_HEADERS: &[&str] = &[
    "id",
    "name",
    "email",
    "position",
    "department",
    "salary",
    "status",
    "join_date",
    "phone",
];

pub const LEAVE_HEADERS: &[&str] = &[
    "id",
    "employee_id",
    "employee_name",
    "type",
    "start_date",
    "end_date",
    "days",
    "reason",
    "status",
    "applied_date",
];

pub const ATTENDANCE_HEADERS: &[&str] = &[
    "employee_id",
    "employee_name",
    "date",
    "check_in",
    "check_out",
    "status",
    "working_hours",
    "notes",
];

pub const PAYROLL_HEADERS: &[&str] = &[
    "employee_id",
    "name",
    "department",
    "position",
    "monthly_salary",
    "annual_salary",
];

pub const LEAVE_ANALYTICS_HEADERS: &[&str] = &[
    "employee_id",
    "employee_name",
    "total_requests",
    "approved",
    "pending",
    "rejected",
    "total_days",
    "approved_days",
    "sick",
    "vacation",
    "personal",
    "emergency",
];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn write_csv<I>(headers: &[&str], rows: I) -> Result<Vec<u8>, AppError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = Writer::from_writer(Vec::new());
    writer
        .write_record(headers)
        .map_err(|e| AppError::internal(format!("Failed to write CSV header: {e}")))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| AppError::internal(format!("Failed to write CSV row: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("Failed to flush CSV writer: {e}")))
}

pub fn employees_csv(employees: &[Employee]) -> Result<Vec<u8>, AppError> {
    write_csv(
        EMPLOYEE_HEADERS,
        employees.iter().map(|e| {
            vec![
                e.id.to_string(),
                e.name.clone(),
                e.email.clone(),
                e.position.clone(),
                e.department.clone(),
                e.salary.to_string(),
                if e.is_active() { "active" } else { "inactive" }.to_string(),
                e.join_date.clone(),
                e.phone.clone().unwrap_or_default(),
            ]
        }),
    )
}

pub fn leaves_csv(leaves: &[LeaveRequest]) -> Result<Vec<u8>, AppError> {
    write_csv(
        LEAVE_HEADERS,
        leaves.iter().map(|l| {
            vec![
                l.id.to_string(),
                l.employee_id.to_string(),
                l.employee_name.clone(),
                l.leave_type.to_string(),
                l.start_date.clone(),
                l.end_date.clone(),
                l.days.to_string(),
                l.reason.clone(),
                l.status.to_string(),
                l.applied_date.clone(),
            ]
        }),
    )
}

pub fn attendance_csv(records: &[AttendanceRecord]) -> Result<Vec<u8>, AppError> {
    write_csv(
        ATTENDANCE_HEADERS,
        records.iter().map(|r| {
            vec![
                r.employee_id.to_string(),
                r.employee_name.clone(),
                r.date.clone(),
                r.check_in.clone().unwrap_or_default(),
                r.check_out.clone().unwrap_or_default(),
                r.status.to_string(),
                r.working_hours.to_string(),
                r.notes.clone().unwrap_or_default(),
            ]
        }),
    )
}

/// Payroll view: monthly and annual salary per employee
pub fn payroll_csv(employees: &[Employee]) -> Result<Vec<u8>, AppError> {
    write_csv(
        PAYROLL_HEADERS,
        employees.iter().map(|e| {
            vec![
                e.id.to_string(),
                e.name.clone(),
                e.department.clone(),
                e.position.clone(),
                e.salary.to_string(),
                round2(e.salary * 12.0).to_string(),
            ]
        }),
    )
}

/// One row per employee of the analytics report, in report order
pub fn leave_analytics_csv(report: &LeaveAnalytics) -> Result<Vec<u8>, AppError> {
    write_csv(
        LEAVE_ANALYTICS_HEADERS,
        report.employees.iter().map(|r| {
            vec![
                r.employee_id.to_string(),
                r.employee_name.clone(),
                r.total_leaves.to_string(),
                r.approved_leaves.to_string(),
                r.pending_leaves.to_string(),
                r.rejected_leaves.to_string(),
                r.total_days.to_string(),
                r.approved_days.to_string(),
                r.by_type.sick.to_string(),
                r.by_type.vacation.to_string(),
                r.by_type.personal.to_string(),
                r.by_type.emergency.to_string(),
            ]
        }),
    )
}
