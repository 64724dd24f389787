//! 请假流程 (Leave Lifecycle)
//!
//! ```text
//!            submit               decide (admin)
//!   (none) ─────────▶ pending ─┬────────────────▶ approved
//!                              └────────────────▶ rejected
//! ```
//!
//! `approved` 与 `rejected` 是终态；再次审批返回 409。
//! 统计报表见 [`analytics`]。

pub mod analytics;

use chrono::NaiveDate;
use shared::models::{LeaveCreate, LeaveDecision, LeaveQuery, LeaveRequest, LeaveStatus};
use sqlx::SqlitePool;

use crate::auth::{CurrentUser, ensure_can_access};
use crate::db::repository::{employee, leave as leave_repo};
use crate::notify::{NotificationService, events};
use crate::utils::validation::{self, MAX_NOTE_LEN};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Inclusive number of calendar days covered by `[start, end]`
///
/// Same-day leave is one day. Argument order does not matter.
pub fn leave_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().abs() + 1
}

/// Submit a leave request
///
/// Employees always submit for themselves. Admins must name the employee.
pub async fn submit(
    pool: &SqlitePool,
    notifier: &NotificationService,
    user: &CurrentUser,
    data: LeaveCreate,
) -> AppResult<LeaveRequest> {
    let employee_id = if user.is_admin() {
        data.employee_id.ok_or_else(|| AppError::required("employee_id"))?
    } else {
        user.id
    };
    let leave_type = data.leave_type.ok_or_else(|| AppError::required("type"))?;
    let start = validation::required_date(data.start_date.as_deref(), "start_date")
        .map_err(AppError::validation)?;
    let end = validation::required_date(data.end_date.as_deref(), "end_date")
        .map_err(AppError::validation)?;
    let reason = validation::required_text(data.reason.as_deref(), "reason", MAX_NOTE_LEN)
        .map_err(AppError::validation)?;

    if end < start {
        return Err(AppError::with_message(
            ErrorCode::LeaveInvalidRange,
            format!("end_date {end} is before start_date {start}"),
        ));
    }

    let subject = employee::find_by_id(pool, employee_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

    let start_date = start.format(shared::util::DATE_FORMAT).to_string();
    let end_date = end.format(shared::util::DATE_FORMAT).to_string();
    let applied_date = shared::util::today();
    let leave = leave_repo::insert(
        pool,
        leave_repo::NewLeave {
            employee_id: subject.id,
            employee_name: &subject.name,
            leave_type,
            start_date: &start_date,
            end_date: &end_date,
            days: leave_days(start, end),
            reason: &reason,
            applied_date: &applied_date,
        },
    )
    .await?;

    tracing::info!(
        leave_id = leave.id,
        employee_id = leave.employee_id,
        days = leave.days,
        "Leave request submitted"
    );
    notifier.emit(events::leave_applied(&leave)).await;
    Ok(leave)
}

/// Approve or reject a pending leave (admin only)
pub async fn decide(
    pool: &SqlitePool,
    notifier: &NotificationService,
    user: &CurrentUser,
    id: i64,
    decision: LeaveDecision,
) -> AppResult<LeaveRequest> {
    if !user.is_admin() {
        crate::security_log!("WARN", "leave_decide_denied", user_id = user.id, leave_id = id);
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    let raw = decision.status.ok_or_else(|| AppError::required("status"))?;
    let status = raw
        .parse::<LeaveStatus>()
        .map_err(|e| AppError::with_message(ErrorCode::LeaveInvalidStatus, e))?;
    if status == LeaveStatus::Pending {
        return Err(AppError::with_message(
            ErrorCode::LeaveInvalidStatus,
            "status must be approved or rejected",
        ));
    }

    if !leave_repo::decide(pool, id, status, user.id).await? {
        return match leave_repo::find_by_id(pool, id).await? {
            None => Err(AppError::new(ErrorCode::LeaveNotFound)),
            Some(existing) => Err(AppError::with_message(
                ErrorCode::LeaveAlreadyDecided,
                format!("Leave request {id} is already {}", existing.status),
            )),
        };
    }

    let leave = leave_repo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LeaveNotFound))?;
    tracing::info!(leave_id = id, status = %status, decided_by = user.id, "Leave request decided");
    notifier.emit(events::leave_updated(&leave)).await;
    Ok(leave)
}

/// Admins see everything (filterable); employees see only their own
pub async fn list(
    pool: &SqlitePool,
    user: &CurrentUser,
    query: LeaveQuery,
) -> AppResult<Vec<LeaveRequest>> {
    let query = if user.is_admin() {
        query
    } else {
        LeaveQuery {
            status: query.status,
            employee_id: Some(user.id),
        }
    };
    Ok(leave_repo::find_all(pool, &query).await?)
}

pub async fn get(pool: &SqlitePool, user: &CurrentUser, id: i64) -> AppResult<LeaveRequest> {
    let leave = leave_repo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LeaveNotFound))?;
    ensure_can_access(user, leave.employee_id)?;
    Ok(leave)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{fixtures, notification};
    use crate::notify::NotificationBus;
    use shared::models::{Employee, LeaveType, NotificationType, UserRole};

    fn date(s: &str) -> NaiveDate {
        shared::util::parse_date(s).unwrap()
    }

    fn admin() -> CurrentUser {
        CurrentUser {
            id: 1,
            email: "admin@company.com".into(),
            name: "Admin".into(),
            role: UserRole::Admin,
        }
    }

    fn as_user(e: &Employee) -> CurrentUser {
        CurrentUser {
            id: e.id,
            email: e.email.clone(),
            name: e.name.clone(),
            role: UserRole::Employee,
        }
    }

    fn sick(start: &str, end: &str) -> LeaveCreate {
        LeaveCreate {
            employee_id: None,
            leave_type: Some(LeaveType::Sick),
            start_date: Some(start.into()),
            end_date: Some(end.into()),
            reason: Some("flu".into()),
        }
    }

    async fn setup() -> (SqlitePool, NotificationService) {
        let pool = fixtures::pool().await;
        let notifier = NotificationService::new(pool.clone(), NotificationBus::new());
        (pool, notifier)
    }

    #[test]
    fn test_leave_days() {
        assert_eq!(leave_days(date("2024-01-20"), date("2024-01-20")), 1);
        assert_eq!(leave_days(date("2024-01-20"), date("2024-01-25")), 6);
        assert_eq!(leave_days(date("2024-02-28"), date("2024-03-01")), 3);
        assert_eq!(leave_days(date("2023-12-31"), date("2024-01-01")), 2);
        assert_eq!(leave_days(date("2024-01-25"), date("2024-01-20")), 6);
    }

    #[test]
    fn test_leave_days_matches_span_for_every_pair() {
        let base = date("2024-01-01");
        for offset in 0..400 {
            let end = base + chrono::Duration::days(offset);
            assert_eq!(leave_days(base, end), offset + 1);
        }
    }

    #[tokio::test]
    async fn test_employee_submits_for_self() {
        let (pool, notifier) = setup().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        let john = fixtures::employee(&pool, "John", "Sales").await;

        let mut data = sick("2024-01-20", "2024-01-25");
        data.employee_id = Some(john.id);
        let leave = submit(&pool, &notifier, &as_user(&jane), data).await.unwrap();

        assert_eq!(leave.employee_id, jane.id);
        assert_eq!(leave.employee_name, "Jane");
        assert_eq!(leave.days, 6);
        assert_eq!(leave.status, LeaveStatus::Pending);
        assert_eq!(leave.applied_date, shared::util::today());

        let feed = notification::find_feed(
            &pool,
            notification::FeedScope::admin(),
            false,
            None,
        )
        .await
        .unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].notification_type, NotificationType::LeaveApplied);
        assert_eq!(feed[0].employee_id, jane.id);
    }

    #[tokio::test]
    async fn test_submit_validation() {
        let (pool, notifier) = setup().await;
        let jane = as_user(&fixtures::employee(&pool, "Jane", "Engineering").await);

        let err = submit(&pool, &notifier, &jane, sick("2024-01-25", "2024-01-20"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::LeaveInvalidRange);

        let err = submit(&pool, &notifier, &jane, sick("2024-01-20", "25/01/2024"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let mut missing = sick("2024-01-20", "2024-01-25");
        missing.start_date = None;
        let err = submit(&pool, &notifier, &jane, missing).await.unwrap_err();
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        // admin must name the employee
        let err = submit(&pool, &notifier, &admin(), sick("2024-01-20", "2024-01-25"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);

        let mut unknown = sick("2024-01-20", "2024-01-25");
        unknown.employee_id = Some(404);
        let err = submit(&pool, &notifier, &admin(), unknown).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeNotFound);
    }

    #[tokio::test]
    async fn test_decide_lifecycle() {
        let (pool, notifier) = setup().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        let leave = submit(&pool, &notifier, &as_user(&jane), sick("2024-01-20", "2024-01-20"))
            .await
            .unwrap();

        // employees cannot decide
        let err = decide(
            &pool,
            &notifier,
            &as_user(&jane),
            leave.id,
            LeaveDecision {
                status: Some("approved".into()),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);

        let err = decide(
            &pool,
            &notifier,
            &admin(),
            leave.id,
            LeaveDecision {
                status: Some("pending".into()),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::LeaveInvalidStatus);

        let approved = decide(
            &pool,
            &notifier,
            &admin(),
            leave.id,
            LeaveDecision {
                status: Some("approved".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(approved.status, LeaveStatus::Approved);
        assert_eq!(approved.decided_by, Some(1));

        let err = decide(
            &pool,
            &notifier,
            &admin(),
            leave.id,
            LeaveDecision {
                status: Some("rejected".into()),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::LeaveAlreadyDecided);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);

        let err = decide(
            &pool,
            &notifier,
            &admin(),
            404,
            LeaveDecision {
                status: Some("rejected".into()),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::LeaveNotFound);

        let feed = notification::find_feed(
            &pool,
            notification::FeedScope::employee(jane.id),
            false,
            None,
        )
        .await
        .unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].title, "Leave Approved");
    }

    #[tokio::test]
    async fn test_visibility() {
        let (pool, notifier) = setup().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        let john = fixtures::employee(&pool, "John", "Sales").await;
        let janes = submit(&pool, &notifier, &as_user(&jane), sick("2024-01-20", "2024-01-21"))
            .await
            .unwrap();
        submit(&pool, &notifier, &as_user(&john), sick("2024-02-01", "2024-02-02"))
            .await
            .unwrap();

        // employee_id filter from an employee is ignored
        let mine = list(
            &pool,
            &as_user(&john),
            LeaveQuery {
                status: None,
                employee_id: Some(jane.id),
            },
        )
        .await
        .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].employee_id, john.id);

        assert_eq!(list(&pool, &admin(), LeaveQuery::default()).await.unwrap().len(), 2);

        let err = get(&pool, &as_user(&john), janes.id).await.unwrap_err();
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
        assert!(get(&pool, &as_user(&jane), janes.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_block() {
        let (pool, notifier) = setup().await;
        let jane = fixtures::employee(&pool, "Jane", "Engineering").await;
        sqlx::query("DROP TABLE notification").execute(&pool).await.unwrap();

        let leave = submit(&pool, &notifier, &as_user(&jane), sick("2024-01-20", "2024-01-25"))
            .await
            .unwrap();
        let decided = decide(
            &pool,
            &notifier,
            &admin(),
            leave.id,
            LeaveDecision {
                status: Some("rejected".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(decided.status, LeaveStatus::Rejected);
    }
}
