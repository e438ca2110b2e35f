use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderLineItem};

/// Checkout form as submitted by the storefront. `item_spec_ids` is the
/// comma-delimited list of spec ids the user ticked in the cart.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitOrderRequest {
    pub user_id: Uuid,
    pub address_id: Uuid,
    pub item_spec_ids: String,
    pub pay_method: i16,
    pub left_msg: Option<String>,
}

/// One (spec, quantity) pair from the caller's cart snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub spec_id: Uuid,
    pub quantity: i32,
}

/// Payload assembled for the external payment center.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentHandoff {
    pub merchant_order_id: String,
    pub merchant_user_id: Uuid,
    pub amount: i64,
    pub pay_method: i16,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub payment_handoff: PaymentHandoff,
    /// Cart lines consumed by this order; the caller clears these from
    /// the cart after the order commits.
    pub removed_cart_lines: Vec<CartLine>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: i16,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderLineItem>,
}
