//! 仓储错误到 API 错误的转换
//!
//! 仓储层只知道 NotFound / Duplicate，具体资源的错误码在这里补上。

use crate::db::repository::RepoError;
use crate::utils::{AppError, ErrorCode};

/// Map a repository error onto resource-specific codes
pub fn repo_error(err: RepoError, not_found: ErrorCode, duplicate: ErrorCode) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(not_found, msg),
        RepoError::Duplicate(msg) => AppError::with_message(duplicate, msg),
        other => other.into(),
    }
}

pub fn employee_error(err: RepoError) -> AppError {
    repo_error(err, ErrorCode::EmployeeNotFound, ErrorCode::EmployeeEmailExists)
}

pub fn department_error(err: RepoError) -> AppError {
    repo_error(err, ErrorCode::DepartmentNotFound, ErrorCode::DepartmentNameExists)
}

pub fn office_location_error(err: RepoError) -> AppError {
    repo_error(
        err,
        ErrorCode::OfficeLocationNotFound,
        ErrorCode::OfficeLocationNameExists,
    )
}

pub fn task_error(err: RepoError) -> AppError {
    repo_error(err, ErrorCode::TaskNotFound, ErrorCode::AlreadyExists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_resource_specific_codes() {
        let err = employee_error(RepoError::Duplicate("Employee email 'a@b.c' already exists".into()));
        assert_eq!(err.code, ErrorCode::EmployeeEmailExists);
        assert_eq!(err.http_status(), StatusCode::CONFLICT);

        let err = department_error(RepoError::NotFound("Department 7 not found".into()));
        assert_eq!(err.code, ErrorCode::DepartmentNotFound);
        assert_eq!(err.message, "Department 7 not found");

        let err = office_location_error(RepoError::Validation("radius must be positive".into()));
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = task_error(RepoError::Database("disk I/O error".into()));
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
