use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Order lifecycle codes, kept numerically compatible with the
/// `order_status.status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatusCode {
    WaitPay,
    Paid,
    WaitReceive,
    Success,
    Closed,
}

impl OrderStatusCode {
    pub fn as_i16(self) -> i16 {
        match self {
            OrderStatusCode::WaitPay => 10,
            OrderStatusCode::Paid => 20,
            OrderStatusCode::WaitReceive => 30,
            OrderStatusCode::Success => 40,
            OrderStatusCode::Closed => 50,
        }
    }

    pub fn from_i16(code: i16) -> Option<Self> {
        match code {
            10 => Some(OrderStatusCode::WaitPay),
            20 => Some(OrderStatusCode::Paid),
            30 => Some(OrderStatusCode::WaitReceive),
            40 => Some(OrderStatusCode::Success),
            50 => Some(OrderStatusCode::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: String,
    pub user_id: Uuid,
    pub receiver_name: String,
    pub receiver_mobile: String,
    pub receiver_address: String,
    pub total_amount: i64,
    pub real_pay_amount: i64,
    pub post_amount: i64,
    pub pay_method: i16,
    pub left_msg: Option<String>,
    pub is_comment: i16,
    pub is_delete: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderLineItem {
    pub id: String,
    pub order_id: String,
    pub item_id: Uuid,
    pub item_name: String,
    pub item_img: String,
    pub spec_id: Uuid,
    pub spec_name: String,
    pub quantity: i32,
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderStatusInfo {
    pub order_id: String,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub pay_time: Option<DateTime<Utc>>,
    pub close_time: Option<DateTime<Utc>>,
}

/// User record as it leaves this service. There is deliberately no
/// password field on this type, so the stored credential cannot leak.
#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub nickname: Option<String>,
    pub face: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub sex: i16,
    pub birthday: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
