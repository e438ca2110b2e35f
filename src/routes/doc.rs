use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::orders::{
        CartLine, OrderConfirmation, OrderList, OrderWithItems, PaymentHandoff,
        SubmitOrderRequest, UpdateOrderStatusRequest,
    },
    models::{Order, OrderLineItem, OrderStatusCode, OrderStatusInfo, UserInfo},
    response::{ApiResponse, Meta},
    routes::{health, orders, params, users},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::order_status,
        orders::update_order_status,
        users::get_user,
    ),
    components(
        schemas(
            Order,
            OrderLineItem,
            OrderStatusCode,
            OrderStatusInfo,
            UserInfo,
            CartLine,
            PaymentHandoff,
            SubmitOrderRequest,
            UpdateOrderStatusRequest,
            OrderConfirmation,
            OrderList,
            OrderWithItems,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ApiResponse<OrderConfirmation>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderStatusInfo>,
            ApiResponse<UserInfo>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Order creation and lifecycle"),
        (name = "Users", description = "User center lookups"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
