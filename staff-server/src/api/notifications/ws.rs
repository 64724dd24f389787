//! Notification WebSocket endpoint - 实时通知推送
//!
//! GET /api/notifications/ws?token=<JWT>&employee_id=<id>
//! Auth: `Authorization` 头或 `token` query (浏览器 WebSocket 不支持自定义 headers)
//!
//! 协议: 服务端推送 `BusMessage` JSON 文本帧，客户端消息被忽略。
//!
//! - 管理员订阅 admin 频道，可用 `employee_id` 只看某个员工
//! - 员工只收到发给自己的 employee 频道通知 (`employee_id` 参数被忽略)

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{HeaderMap, Uri};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use shared::message::BusMessage;
use shared::models::NotificationAudience;
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::auth::CurrentUser;
use crate::auth::middleware::authenticate;
use crate::core::ServerState;
use crate::utils::{AppError, Query};

const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Default, Deserialize)]
pub struct WsQuery {
    token: Option<String>,
    employee_id: Option<i64>,
}

/// 订阅过滤条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Subscription {
    audience: NotificationAudience,
    employee_id: Option<i64>,
}

impl Subscription {
    fn for_user(user: &CurrentUser, requested_employee: Option<i64>) -> Self {
        if user.is_admin() {
            Self {
                audience: NotificationAudience::Admin,
                employee_id: requested_employee,
            }
        } else {
            Self {
                audience: NotificationAudience::Employee,
                employee_id: Some(user.id),
            }
        }
    }

    fn accepts(&self, msg: &BusMessage) -> bool {
        msg.is_visible_to(self.audience, self.employee_id)
    }
}

pub async fn subscribe(
    State(state): State<ServerState>,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
    uri: Uri,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    let bearer = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned)
        .or_else(|| query.token.as_ref().map(|t| format!("Bearer {t}")));
    let user = authenticate(state.get_jwt_service(), bearer.as_deref(), &uri)?;

    let subscription = Subscription::for_user(&user, query.employee_id);
    Ok(ws.on_upgrade(move |socket| notification_session(socket, state, user, subscription)))
}

async fn notification_session(
    socket: WebSocket,
    state: ServerState,
    user: CurrentUser,
    subscription: Subscription,
) {
    let (mut sink, mut stream) = socket.split();
    let mut rx = state.bus().subscribe();
    let shutdown = state.bus().shutdown_token().clone();

    tracing::info!(user_id = user.id, role = %user.role, "Notification WS connected");

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }

            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }

            event = rx.recv() => {
                match event {
                    Ok(msg) => {
                        if subscription.accepts(&msg) && send_message(&mut sink, &msg).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(user_id = user.id, lagged = n, "Notification subscriber lagged, skipping");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(user_id = user.id, error = %e, "Notification WS read error");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::info!(user_id = user.id, "Notification WS disconnected");
}

async fn send_message<S>(sink: &mut S, msg: &BusMessage) -> Result<(), ()>
where
    S: SinkExt<Message> + Unpin,
{
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize bus message");
            return Ok(());
        }
    };
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
