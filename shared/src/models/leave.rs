//! Leave Request Model (请假申请)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Leave type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum LeaveType {
    Sick,
    Vacation,
    Personal,
    Emergency,
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveType::Sick => write!(f, "sick"),
            LeaveType::Vacation => write!(f, "vacation"),
            LeaveType::Personal => write!(f, "personal"),
            LeaveType::Emergency => write!(f, "emergency"),
        }
    }
}

/// Leave status
///
/// `pending` is the only state with outgoing transitions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(LeaveStatus::Pending),
            "approved" => Ok(LeaveStatus::Approved),
            "rejected" => Ok(LeaveStatus::Rejected),
            other => Err(format!("Invalid leave status: {other}")),
        }
    }
}

/// Leave request record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeaveRequest {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    /// Inclusive day count
    pub days: i64,
    pub reason: String,
    pub status: LeaveStatus,
    /// `YYYY-MM-DD`
    pub applied_date: String,
    pub decided_at: Option<i64>,
    /// Admin id that made the decision
    pub decided_by: Option<i64>,
    pub created_at: i64,
}

/// Submit leave payload
///
/// `employee_id` is only honoured for admins; employees always submit for
/// themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveCreate {
    pub employee_id: Option<i64>,
    #[serde(rename = "type")]
    pub leave_type: Option<LeaveType>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub reason: Option<String>,
}

/// Decide leave payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveDecision {
    pub status: Option<String>,
}

/// Leave list filters (admin only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveQuery {
    pub status: Option<LeaveStatus>,
    pub employee_id: Option<i64>,
}

/// Analytics window granularity
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LeavePeriod {
    #[default]
    Monthly,
    Yearly,
}

/// Leave analytics filters (admin only)
///
/// `year` / `month` default to the current date; `month` is ignored for
/// the yearly period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveAnalyticsQuery {
    pub period: Option<LeavePeriod>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub employee_id: Option<i64>,
}

/// Request counts per leave type
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaveTypeCounts {
    pub sick: i64,
    pub vacation: i64,
    pub personal: i64,
    pub emergency: i64,
}

impl LeaveTypeCounts {
    pub fn add(&mut self, leave_type: LeaveType) {
        match leave_type {
            LeaveType::Sick => self.sick += 1,
            LeaveType::Vacation => self.vacation += 1,
            LeaveType::Personal => self.personal += 1,
            LeaveType::Emergency => self.emergency += 1,
        }
    }
}

/// One month of a yearly breakdown, all statuses
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyLeave {
    /// 1-12
    pub month: u32,
    pub count: i64,
    pub days: i64,
}

/// Per-employee leave totals inside the analytics window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployeeLeaveAnalytics {
    pub employee_id: i64,
    pub employee_name: String,
    pub department: String,
    pub total_leaves: i64,
    pub approved_leaves: i64,
    pub pending_leaves: i64,
    pub rejected_leaves: i64,
    pub total_days: i64,
    pub approved_days: i64,
    pub by_type: LeaveTypeCounts,
    /// Twelve entries for the yearly period, empty otherwise
    pub monthly: Vec<MonthlyLeave>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LeaveAnalyticsSummary {
    pub total_employees: i64,
    pub total_leave_requests: i64,
    pub total_leave_days: i64,
    /// `total_leave_days / total_employees`, 0 without employees
    pub avg_leave_days: f64,
}

/// Leave analytics report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaveAnalytics {
    pub period: LeavePeriod,
    pub year: i32,
    /// Set for the monthly period only
    pub month: Option<u32>,
    /// Sorted by `total_days` descending
    pub employees: Vec<EmployeeLeaveAnalytics>,
    pub summary: LeaveAnalyticsSummary,
}

impl LeaveAnalytics {
    /// `YYYY` for yearly reports, `YYYY-MM` for monthly ones
    pub fn period_label(&self) -> String {
        match self.month {
            Some(month) => format!("{:04}-{:02}", self.year, month),
            None => format!("{:04}", self.year),
        }
    }
}
