use chrono::Utc;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{
        CartLine, OrderConfirmation, OrderList, OrderWithItems, PaymentHandoff, SubmitOrderRequest,
    },
    entity::{
        order_items::{
            ActiveModel as LineActive, Column as LineCol, Entity as OrderItems,
            Model as LineModel,
        },
        order_status::{
            ActiveModel as StatusActive, Column as StatusCol, Entity as OrderStatusRows,
            Model as StatusModel,
        },
        orders::{
            self, ActiveModel as OrderActive, Column as OrderCol, Entity as Orders,
            Model as OrderModel,
        },
    },
    error::{AppError, AppResult},
    models::{Order, OrderLineItem, OrderStatusCode, OrderStatusInfo},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{address_service, item_service},
    state::AppState,
};

/// Flat postage; every order currently ships free.
const POST_AMOUNT_FREE: i64 = 0;

const FLAG_NO: i16 = 0;

/// Unpaid orders older than this many whole days get closed by the sweep.
const CLOSE_AFTER_DAYS: i64 = 1;

/// Create an order from the caller's cart snapshot plus the checkout
/// submission. Address resolution, line snapshots, stock decrements, the
/// order row and its status row all commit or roll back together.
///
/// The returned confirmation carries the payment handoff for the external
/// payment center and the cart lines the caller should now clear; the
/// cart itself is not touched here.
pub async fn create_order(
    state: &AppState,
    cart_lines: &[CartLine],
    submission: &SubmitOrderRequest,
) -> AppResult<OrderConfirmation> {
    let spec_ids = parse_spec_ids(&submission.item_spec_ids)?;

    let txn = state.orm.begin().await?;

    let address =
        address_service::query_user_address(&txn, submission.user_id, submission.address_id)
            .await?;

    let order_id = state.ids.next_short();
    let now = Utc::now();

    let mut total_amount: i64 = 0;
    let mut real_pay_amount: i64 = 0;
    let mut matched_lines: Vec<CartLine> = Vec::with_capacity(spec_ids.len());
    let mut line_rows: Vec<LineActive> = Vec::with_capacity(spec_ids.len());

    // Duplicated spec ids in the submission are processed independently,
    // each occurrence against the same cart line.
    for spec_id in spec_ids {
        let line = find_cart_line(cart_lines, spec_id)
            .ok_or(AppError::CartLineMissing(spec_id))?;
        if line.quantity <= 0 {
            return Err(AppError::InvalidSubmission(format!(
                "cart line for spec {spec_id} has non-positive quantity"
            )));
        }
        matched_lines.push(line);

        let spec = item_service::query_item_spec(&txn, spec_id).await?;
        let item = item_service::query_item(&txn, spec.item_id).await?;

        let qty = line.quantity as i64;
        total_amount += spec.price_normal * qty;
        real_pay_amount += spec.price_discount * qty;

        line_rows.push(LineActive {
            id: Set(state.ids.next_short()),
            order_id: Set(order_id.clone()),
            item_id: Set(item.id),
            item_name: Set(item.item_name),
            item_img: Set(item.main_img),
            spec_id: Set(spec.id),
            spec_name: Set(spec.name),
            quantity: Set(line.quantity),
            price: Set(spec.price_discount),
            created_at: Set(now.into()),
        });

        item_service::decrease_spec_stock(&txn, spec_id, line.quantity).await?;
    }

    OrderActive {
        id: Set(order_id.clone()),
        user_id: Set(submission.user_id),
        receiver_name: Set(address.receiver.clone()),
        receiver_mobile: Set(address.mobile.clone()),
        receiver_address: Set(address_service::compose_address(&address)),
        total_amount: Set(total_amount),
        real_pay_amount: Set(real_pay_amount),
        post_amount: Set(POST_AMOUNT_FREE),
        pay_method: Set(submission.pay_method),
        left_msg: Set(submission.left_msg.clone()),
        is_comment: Set(FLAG_NO),
        is_delete: Set(FLAG_NO),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    OrderItems::insert_many(line_rows).exec(&txn).await?;

    StatusActive {
        order_id: Set(order_id.clone()),
        status: Set(OrderStatusCode::WaitPay.as_i16()),
        created_at: Set(now.into()),
        pay_time: Set(None),
        close_time: Set(None),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(submission.user_id),
        "order_created",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order_id, "real_pay_amount": real_pay_amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(OrderConfirmation {
        payment_handoff: PaymentHandoff {
            merchant_order_id: order_id.clone(),
            merchant_user_id: submission.user_id,
            amount: real_pay_amount + POST_AMOUNT_FREE,
            pay_method: submission.pay_method,
        },
        removed_cart_lines: matched_lines,
        order_id,
    })
}

/// Move an order's status row to `status_code`.
///
/// The paid transition only succeeds from awaiting-payment; losing that
/// race (e.g. the close sweep got there first) is a `StatusConflict`.
/// `pay_time` is stamped on the paid transition and nowhere else.
pub async fn update_order_status(
    state: &AppState,
    order_id: &str,
    status_code: i16,
) -> AppResult<()> {
    let new_status = OrderStatusCode::from_i16(status_code).ok_or_else(|| {
        AppError::InvalidSubmission(format!("unknown order status code {status_code}"))
    })?;
    if new_status == OrderStatusCode::WaitPay {
        return Err(AppError::InvalidSubmission(
            "an order cannot be reset to awaiting payment".into(),
        ));
    }

    let now = Utc::now();

    if new_status == OrderStatusCode::Paid {
        let result = OrderStatusRows::update_many()
            .col_expr(StatusCol::Status, Expr::value(new_status.as_i16()))
            .col_expr(StatusCol::PayTime, Expr::value(DateTimeWithTimeZone::from(now)))
            .filter(StatusCol::OrderId.eq(order_id))
            .filter(StatusCol::Status.eq(OrderStatusCode::WaitPay.as_i16()))
            .exec(&state.orm)
            .await?;

        if result.rows_affected == 0 {
            return match OrderStatusRows::find_by_id(order_id.to_string())
                .one(&state.orm)
                .await?
            {
                Some(_) => Err(AppError::StatusConflict),
                None => Err(AppError::OrderNotFound),
            };
        }
    } else {
        let txn = state.orm.begin().await?;
        let row = OrderStatusRows::find_by_id(order_id.to_string())
            .lock(LockType::Update)
            .one(&txn)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        let mut active: StatusActive = row.into();
        active.status = Set(new_status.as_i16());
        if new_status == OrderStatusCode::Closed {
            active.close_time = Set(Some(now.into()));
        }
        active.update(&txn).await?;
        txn.commit().await?;
    }

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "order_status_updated",
        Some("order_status"),
        Some(serde_json::json!({ "order_id": order_id, "status": status_code })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

pub async fn query_order_status_info(
    state: &AppState,
    order_id: &str,
) -> AppResult<Option<OrderStatusInfo>> {
    let row = OrderStatusRows::find_by_id(order_id.to_string())
        .one(&state.orm)
        .await?;
    Ok(row.map(status_from_entity))
}

/// Close every awaiting-payment order older than a whole day. Each order
/// closes in its own transaction; one failure is logged and skipped so
/// the rest of the sweep still runs. Returns how many orders closed.
pub async fn close_stale_orders(state: &AppState) -> AppResult<u64> {
    let wait_pay = OrderStatusRows::find()
        .filter(StatusCol::Status.eq(OrderStatusCode::WaitPay.as_i16()))
        .all(&state.orm)
        .await?;

    let now = Utc::now();
    let mut closed: u64 = 0;

    for row in wait_pay {
        let age_days = now
            .signed_duration_since(row.created_at.with_timezone(&Utc))
            .num_days();
        if age_days < CLOSE_AFTER_DAYS {
            continue;
        }

        match close_one(state, &row.order_id, now).await {
            Ok(true) => {
                closed += 1;
                if let Err(err) = log_audit(
                    &state.pool,
                    None,
                    "order_closed",
                    Some("order_status"),
                    Some(serde_json::json!({ "order_id": row.order_id })),
                )
                .await
                {
                    tracing::warn!(error = %err, "audit log failed");
                }
            }
            Ok(false) => {
                tracing::debug!(order_id = %row.order_id, "order left awaiting payment, skipping");
            }
            Err(err) => {
                tracing::warn!(error = %err, order_id = %row.order_id, "failed to close stale order");
            }
        }
    }

    if closed > 0 {
        tracing::info!(closed, "close sweep finished");
    }
    Ok(closed)
}

/// One order's close transition. Guarded on the current status so a
/// payment landing between scan and close wins the race.
async fn close_one(
    state: &AppState,
    order_id: &str,
    now: chrono::DateTime<Utc>,
) -> AppResult<bool> {
    let txn = state.orm.begin().await?;
    let result = OrderStatusRows::update_many()
        .col_expr(
            StatusCol::Status,
            Expr::value(OrderStatusCode::Closed.as_i16()),
        )
        .col_expr(
            StatusCol::CloseTime,
            Expr::value(DateTimeWithTimeZone::from(now)),
        )
        .filter(StatusCol::OrderId.eq(order_id))
        .filter(StatusCol::Status.eq(OrderStatusCode::WaitPay.as_i16()))
        .exec(&txn)
        .await?;
    txn.commit().await?;

    Ok(result.rows_affected > 0)
}

pub async fn list_user_orders(
    state: &AppState,
    user_id: Uuid,
    query: &OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut finder = Orders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .filter(OrderCol::IsDelete.eq(FLAG_NO));
    if let Some(status) = query.status {
        finder = finder
            .join(JoinType::InnerJoin, orders::Relation::OrderStatus.def())
            .filter(StatusCol::Status.eq(status));
    }

    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub async fn get_order(state: &AppState, order_id: &str) -> AppResult<OrderWithItems> {
    let order = Orders::find_by_id(order_id.to_string())
        .filter(OrderCol::IsDelete.eq(FLAG_NO))
        .one(&state.orm)
        .await?
        .ok_or(AppError::OrderNotFound)?;

    let items = OrderItems::find()
        .filter(LineCol::OrderId.eq(order.id.clone()))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(line_from_entity)
        .collect();

    Ok(OrderWithItems {
        order: order_from_entity(order),
        items,
    })
}

fn parse_spec_ids(raw: &str) -> AppResult<Vec<Uuid>> {
    if raw.trim().is_empty() {
        return Err(AppError::InvalidSubmission(
            "item_spec_ids must not be empty".into(),
        ));
    }
    raw.split(',')
        .map(|token| {
            let token = token.trim();
            Uuid::parse_str(token).map_err(|_| {
                AppError::InvalidSubmission(format!("'{token}' is not a valid spec id"))
            })
        })
        .collect()
}

fn find_cart_line(cart_lines: &[CartLine], spec_id: Uuid) -> Option<CartLine> {
    cart_lines.iter().copied().find(|line| line.spec_id == spec_id)
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        receiver_name: model.receiver_name,
        receiver_mobile: model.receiver_mobile,
        receiver_address: model.receiver_address,
        total_amount: model.total_amount,
        real_pay_amount: model.real_pay_amount,
        post_amount: model.post_amount,
        pay_method: model.pay_method,
        left_msg: model.left_msg,
        is_comment: model.is_comment,
        is_delete: model.is_delete,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn line_from_entity(model: LineModel) -> OrderLineItem {
    OrderLineItem {
        id: model.id,
        order_id: model.order_id,
        item_id: model.item_id,
        item_name: model.item_name,
        item_img: model.item_img,
        spec_id: model.spec_id,
        spec_name: model.spec_name,
        quantity: model.quantity,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn status_from_entity(model: StatusModel) -> OrderStatusInfo {
    OrderStatusInfo {
        order_id: model.order_id,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
        pay_time: model.pay_time.map(|dt| dt.with_timezone(&Utc)),
        close_time: model.close_time.map(|dt| dt.with_timezone(&Utc)),
    }
}
