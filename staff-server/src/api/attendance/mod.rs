//! Attendance API Module
//!
//! | 路径 | 方法 | 说明 | 角色 |
//! |------|------|------|------|
//! | /api/attendance/location | POST | 定位打卡 (地理围栏检查) | 员工 |
//! | /api/attendance/location | GET | 定位记录 | 任意 (员工仅本人) |
//! | /api/attendance/location/summary | GET | 当日在岗统计 | 管理员 |
//! | /api/attendance | GET | 考勤记录 | 任意 (员工仅本人) |
//! | /api/attendance | PUT | 写入考勤记录 | 管理员 |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/attendance", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list_records))
        .route(
            "/location",
            get(handler::list_locations).post(handler::check_location),
        );

    let manage_routes = Router::new()
        .route("/", put(handler::upsert_record))
        .route("/location/summary", get(handler::location_summary))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
