//! Dashboard Handlers

use axum::extract::State;
use shared::models::{
    AdminDashboard, DashboardStats, EmployeeDashboard, SalaryQuery, SalarySummary,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{department, employee, leave};
use crate::utils::{AppError, AppResult, ErrorCode, Json, Query};

/// Number of newest employees on the admin overview
const RECENT_EMPLOYEES: i64 = 3;

/// Role-dependent overview
pub async fn stats(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<DashboardStats>> {
    let pool = state.pool();

    if user.is_admin() {
        let stats = AdminDashboard {
            total_employees: employee::count(pool).await?,
            total_departments: department::count(pool).await?,
            monthly_pay: employee::total_salary(pool).await?,
            leave_stats: leave::counts(pool, None).await?,
            recent_employees: employee::find_recent(pool, RECENT_EMPLOYEES).await?,
        };
        return Ok(Json(DashboardStats::Admin(stats)));
    }

    let me = employee::find_by_id(pool, user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;
    let leaves = leave::counts(pool, Some(me.id)).await?;
    Ok(Json(DashboardStats::Employee(EmployeeDashboard {
        employee: me,
        leaves,
    })))
}

/// Salary overview with the per-department breakdown (admin only)
///
/// `?department=` narrows the totals, the breakdown always lists every
/// department.
pub async fn salary(
    State(state): State<ServerState>,
    Query(query): Query<SalaryQuery>,
) -> AppResult<Json<SalarySummary>> {
    let pool = state.pool();
    let filter = query
        .department
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let (employee_count, total_salary) = employee::salary_totals(pool, filter.as_deref()).await?;
    let average_salary = if employee_count > 0 {
        total_salary / employee_count as f64
    } else {
        0.0
    };
    Ok(Json(SalarySummary {
        department: filter,
        employee_count,
        total_salary,
        average_salary,
        annual_cost: total_salary * 12.0,
        departments: department::salary_breakdown(pool).await?,
    }))
}
