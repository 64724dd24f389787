//! Dashboard statistics

use serde::{Deserialize, Serialize};

use super::Employee;

/// Leave counters by status
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaveCounts {
    pub total: i64,
    pub approved: i64,
    pub pending: i64,
    pub rejected: i64,
}

/// Admin overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub total_employees: i64,
    pub total_departments: i64,
    /// Sum of monthly salaries
    pub monthly_pay: f64,
    pub leave_stats: LeaveCounts,
    /// Three most recently created employees, newest first
    pub recent_employees: Vec<Employee>,
}

/// Employee overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDashboard {
    pub employee: Employee,
    pub leaves: LeaveCounts,
}

/// Role-dependent dashboard payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DashboardStats {
    Admin(AdminDashboard),
    Employee(EmployeeDashboard),
}

/// Salary totals of one department
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentSalary {
    pub department: String,
    pub employees: i64,
    /// Sum of monthly salaries
    pub total: f64,
    /// 0 for a department without employees
    pub average: f64,
}

/// Salary overview filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalaryQuery {
    pub department: Option<String>,
}

/// 薪资概览
///
/// 合计与平均值受 `department` 过滤影响；`departments` 始终列出全部部门。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalarySummary {
    pub department: Option<String>,
    pub employee_count: i64,
    /// Sum of monthly salaries
    pub total_salary: f64,
    pub average_salary: f64,
    /// `total_salary * 12`
    pub annual_cost: f64,
    pub departments: Vec<DepartmentSalary>,
}
