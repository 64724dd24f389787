//! 请假统计 (Leave Analytics)
//!
//! 按 `start_date` 所在的年 / 月归入统计窗口，每个员工一行，
//! 没有请假的员工也会列出 (全零)。

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use shared::models::{
    Employee, EmployeeLeaveAnalytics, LeaveAnalytics, LeaveAnalyticsQuery, LeaveAnalyticsSummary,
    LeavePeriod, LeaveRequest, LeaveStatus, LeaveTypeCounts, MonthlyLeave,
};
use sqlx::SqlitePool;

use crate::db::repository::{employee, leave as leave_repo};
use crate::utils::{AppError, AppResult, ErrorCode};

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 9999;

/// Resolved reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsWindow {
    pub period: LeavePeriod,
    pub year: i32,
    /// `None` for the yearly period
    pub month: Option<u32>,
}

impl AnalyticsWindow {
    /// Fill defaults from `today` and validate the year / month
    pub fn resolve(query: &LeaveAnalyticsQuery, today: NaiveDate) -> AppResult<Self> {
        let period = query.period.unwrap_or_default();
        let year = query.year.unwrap_or(today.year());
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(AppError::validation(format!(
                "year must be between {MIN_YEAR} and {MAX_YEAR}"
            )));
        }

        let month = match period {
            LeavePeriod::Yearly => None,
            LeavePeriod::Monthly => {
                let month = query.month.unwrap_or(today.month());
                if !(1..=12).contains(&month) {
                    return Err(AppError::validation("month must be between 1 and 12"));
                }
                Some(month)
            }
        };

        Ok(Self { period, year, month })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && self.month.is_none_or(|m| date.month() == m)
    }

    /// `start_date` prefix selecting this window in storage
    pub fn date_prefix(&self) -> String {
        match self.month {
            Some(month) => format!("{:04}-{:02}-", self.year, month),
            None => format!("{:04}-", self.year),
        }
    }
}

fn empty_row(window: AnalyticsWindow, employee: &Employee) -> EmployeeLeaveAnalytics {
    let monthly = match window.period {
        LeavePeriod::Yearly => (1..=12)
            .map(|month| MonthlyLeave {
                month,
                count: 0,
                days: 0,
            })
            .collect(),
        LeavePeriod::Monthly => Vec::new(),
    };
    EmployeeLeaveAnalytics {
        employee_id: employee.id,
        employee_name: employee.name.clone(),
        department: employee.department.clone(),
        total_leaves: 0,
        approved_leaves: 0,
        pending_leaves: 0,
        rejected_leaves: 0,
        total_days: 0,
        approved_days: 0,
        by_type: LeaveTypeCounts::default(),
        monthly,
    }
}

/// Build the report from already loaded rows
///
/// Leaves outside the window, or of employees not in `employees`, are
/// ignored. Rows are ordered by `total_days` descending (ties keep the
/// employee order) unless the report is narrowed to one employee.
pub fn compute(
    window: AnalyticsWindow,
    employees: &[Employee],
    leaves: &[LeaveRequest],
    employee_id: Option<i64>,
) -> LeaveAnalytics {
    let mut rows: Vec<EmployeeLeaveAnalytics> = employees
        .iter()
        .filter(|e| employee_id.is_none_or(|id| e.id == id))
        .map(|e| empty_row(window, e))
        .collect();
    let index: HashMap<i64, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.employee_id, i))
        .collect();

    for leave in leaves {
        let Some(&i) = index.get(&leave.employee_id) else {
            continue;
        };
        let Some(start) = shared::util::parse_date(&leave.start_date) else {
            tracing::warn!(leave_id = leave.id, start_date = %leave.start_date, "Skipping leave with unparsable start date");
            continue;
        };
        if !window.contains(start) {
            continue;
        }

        let row = &mut rows[i];
        row.total_leaves += 1;
        row.total_days += leave.days;
        match leave.status {
            LeaveStatus::Approved => {
                row.approved_leaves += 1;
                row.approved_days += leave.days;
            }
            LeaveStatus::Pending => row.pending_leaves += 1,
            LeaveStatus::Rejected => row.rejected_leaves += 1,
        }
        row.by_type.add(leave.leave_type);
        if let Some(slot) = row.monthly.get_mut(start.month0() as usize) {
            slot.count += 1;
            slot.days += leave.days;
        }
    }

    if employee_id.is_none() {
        rows.sort_by(|a, b| b.total_days.cmp(&a.total_days));
    }

    let total_employees = rows.len() as i64;
    let total_leave_requests: i64 = rows.iter().map(|r| r.total_leaves).sum();
    let total_leave_days: i64 = rows.iter().map(|r| r.total_days).sum();
    let avg_leave_days = if total_employees > 0 {
        total_leave_days as f64 / total_employees as f64
    } else {
        0.0
    };

    LeaveAnalytics {
        period: window.period,
        year: window.year,
        month: window.month,
        employees: rows,
        summary: LeaveAnalyticsSummary {
            total_employees,
            total_leave_requests,
            total_leave_days,
            avg_leave_days,
        },
    }
}

/// Load and build the report (admin only, enforced by the router)
pub async fn report(pool: &SqlitePool, query: LeaveAnalyticsQuery) -> AppResult<LeaveAnalytics> {
    let today = chrono::Utc::now().date_naive();
    let window = AnalyticsWindow::resolve(&query, today)?;

    if let Some(id) = query.employee_id
        && employee::find_by_id(pool, id).await?.is_none()
    {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }

    let employees = employee::find_all(pool).await?;
    let leaves = leave_repo::find_starting_with(pool, &window.date_prefix(), query.employee_id).await?;
    tracing::debug!(
        period = ?window.period,
        year = window.year,
        month = ?window.month,
        leaves = leaves.len(),
        "Building leave analytics"
    );
    Ok(compute(window, &employees, &leaves, query.employee_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures;
    use shared::models::{EmployeeStatus, LeaveType};

    fn date(s: &str) -> NaiveDate {
        shared::util::parse_date(s).unwrap()
    }

    fn person(id: i64, name: &str) -> Employee {
        Employee {
            id,
            name: name.into(),
            email: format!("{}@company.com", name.to_lowercase()),
            position: "Engineer".into(),
            department: "Engineering".into(),
            salary: 5000.0,
            status: EmployeeStatus::Active,
            join_date: "2024-01-15".into(),
            phone: None,
            address: None,
            date_of_birth: None,
            password_hash: String::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn leave(
        employee_id: i64,
        leave_type: LeaveType,
        start: &str,
        days: i64,
        status: LeaveStatus,
    ) -> LeaveRequest {
        LeaveRequest {
            id: employee_id * 100 + days,
            employee_id,
            employee_name: String::new(),
            leave_type,
            start_date: start.into(),
            end_date: start.into(),
            days,
            reason: "r".into(),
            status,
            applied_date: start.into(),
            decided_at: None,
            decided_by: None,
            created_at: 0,
        }
    }

    fn yearly(year: i32) -> AnalyticsWindow {
        AnalyticsWindow {
            period: LeavePeriod::Yearly,
            year,
            month: None,
        }
    }

    #[test]
    fn test_resolve_defaults_and_bounds() {
        let today = date("2024-03-18");
        let window = AnalyticsWindow::resolve(&LeaveAnalyticsQuery::default(), today).unwrap();
        assert_eq!(window.period, LeavePeriod::Monthly);
        assert_eq!((window.year, window.month), (2024, Some(3)));
        assert_eq!(window.date_prefix(), "2024-03-");

        let query = LeaveAnalyticsQuery {
            period: Some(LeavePeriod::Yearly),
            month: Some(44),
            ..Default::default()
        };
        let window = AnalyticsWindow::resolve(&query, today).unwrap();
        assert_eq!(window.month, None);
        assert_eq!(window.date_prefix(), "2024-");

        let query = LeaveAnalyticsQuery {
            month: Some(13),
            ..Default::default()
        };
        let err = AnalyticsWindow::resolve(&query, today).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let query = LeaveAnalyticsQuery {
            year: Some(12024),
            ..Default::default()
        };
        assert!(AnalyticsWindow::resolve(&query, today).is_err());
    }

    #[test]
    fn test_totals_by_status_and_type() {
        let employees = [person(1, "Jane"), person(2, "John")];
        let leaves = [
            leave(1, LeaveType::Sick, "2024-03-04", 2, LeaveStatus::Approved),
            leave(1, LeaveType::Vacation, "2024-03-11", 5, LeaveStatus::Pending),
            leave(1, LeaveType::Sick, "2024-03-25", 1, LeaveStatus::Rejected),
            // other month
            leave(1, LeaveType::Personal, "2024-04-02", 3, LeaveStatus::Approved),
            leave(2, LeaveType::Emergency, "2024-03-29", 1, LeaveStatus::Approved),
        ];
        let window = AnalyticsWindow {
            period: LeavePeriod::Monthly,
            year: 2024,
            month: Some(3),
        };

        let report = compute(window, &employees, &leaves, None);
        let jane = &report.employees[0];
        assert_eq!(jane.employee_name, "Jane");
        assert_eq!(
            (jane.total_leaves, jane.approved_leaves, jane.pending_leaves, jane.rejected_leaves),
            (3, 1, 1, 1)
        );
        assert_eq!((jane.total_days, jane.approved_days), (8, 2));
        assert_eq!(
            jane.by_type,
            LeaveTypeCounts {
                sick: 2,
                vacation: 1,
                personal: 0,
                emergency: 0
            }
        );
        assert!(jane.monthly.is_empty());

        assert_eq!(
            report.summary,
            LeaveAnalyticsSummary {
                total_employees: 2,
                total_leave_requests: 4,
                total_leave_days: 9,
                avg_leave_days: 4.5,
            }
        );
    }

    #[test]
    fn test_sorted_by_days_and_idle_employees_listed() {
        let employees = [person(1, "Idle"), person(2, "Busy"), person(3, "Some")];
        let leaves = [
            leave(2, LeaveType::Vacation, "2024-06-10", 10, LeaveStatus::Approved),
            leave(3, LeaveType::Sick, "2024-02-01", 2, LeaveStatus::Pending),
        ];
        let report = compute(yearly(2024), &employees, &leaves, None);
        let names: Vec<_> = report.employees.iter().map(|r| r.employee_name.as_str()).collect();
        assert_eq!(names, ["Busy", "Some", "Idle"]);
        assert_eq!(report.employees[2].total_leaves, 0);
    }

    #[test]
    fn test_yearly_monthly_breakdown() {
        let employees = [person(1, "Jane")];
        let leaves = [
            leave(1, LeaveType::Sick, "2024-01-08", 2, LeaveStatus::Approved),
            leave(1, LeaveType::Sick, "2024-01-22", 1, LeaveStatus::Rejected),
            leave(1, LeaveType::Vacation, "2024-12-23", 7, LeaveStatus::Pending),
            leave(1, LeaveType::Vacation, "2023-12-27", 4, LeaveStatus::Approved),
        ];
        let report = compute(yearly(2024), &employees, &leaves, Some(1));
        let monthly = &report.employees[0].monthly;

        assert_eq!(monthly.len(), 12);
        assert_eq!(monthly[0], MonthlyLeave { month: 1, count: 2, days: 3 });
        assert_eq!(monthly[5], MonthlyLeave { month: 6, count: 0, days: 0 });
        assert_eq!(monthly[11], MonthlyLeave { month: 12, count: 1, days: 7 });
        assert_eq!(report.summary.total_leave_days, 10);
        assert_eq!(report.summary.total_employees, 1);
    }

    #[test]
    fn test_empty_company() {
        let report = compute(yearly(2024), &[], &[], None);
        assert!(report.employees.is_empty());
        assert_eq!(report.summary.avg_leave_days, 0.0);
    }

    #[tokio::test]
    async fn test_report_from_storage() {
        let pool = fixtures::pool().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        fixtures::employee(&pool, "John", "Sales").await;
        leave_repo::insert(
            &pool,
            leave_repo::NewLeave {
                employee_id: jane.id,
                employee_name: &jane.name,
                leave_type: LeaveType::Personal,
                start_date: "2024-05-06",
                end_date: "2024-05-08",
                days: 3,
                reason: "moving",
                applied_date: "2024-05-01",
            },
        )
        .await
        .unwrap();

        let query = LeaveAnalyticsQuery {
            period: Some(LeavePeriod::Monthly),
            year: Some(2024),
            month: Some(5),
            employee_id: None,
        };
        let report = report(&pool, query).await.unwrap();
        assert_eq!(report.employees.len(), 2);
        assert_eq!(report.employees[0].employee_id, jane.id);
        assert_eq!(report.employees[0].by_type.personal, 1);
        assert_eq!(report.summary.total_leave_days, 3);

        let missing = LeaveAnalyticsQuery {
            employee_id: Some(jane.id + 999),
            ..Default::default()
        };
        let err = super::report(&pool, missing).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeNotFound);
    }
}
