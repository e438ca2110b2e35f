use std::sync::Arc;

use axum_mall_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::orders::{CartLine, SubmitOrderRequest},
    entity::{
        item_specs::{ActiveModel as SpecActive, Entity as ItemSpecs},
        items::ActiveModel as ItemActive,
        order_items::{Column as LineCol, Entity as OrderItems},
        order_status::Entity as OrderStatusRows,
        orders::{Column as OrderCol, Entity as Orders},
        user_addresses::ActiveModel as AddressActive,
        users::ActiveModel as UserActive,
    },
    error::AppError,
    ids::ShortIdGenerator,
    models::OrderStatusCode,
    services::{cart_service, order_service},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

// Integration flow over a real Postgres instance. Each test seeds its own
// users and catalog rows, so tests can run in parallel without truncation.
#[tokio::test]
async fn create_order_computes_totals_and_creates_status_row() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state).await?;
    let address_id = create_address(&state, user_id).await?;
    // S1: qty 2, normal 1000, discount 800. S2: qty 1, normal 500, discount 400.
    let s1 = create_item_with_spec(&state, "Widget", 1000, 800, 10).await?;
    let s2 = create_item_with_spec(&state, "Gadget", 500, 400, 10).await?;
    let s3 = create_item_with_spec(&state, "Left behind", 100, 90, 10).await?;
    add_cart_line(&state, user_id, s1, 2).await?;
    add_cart_line(&state, user_id, s2, 1).await?;
    add_cart_line(&state, user_id, s3, 4).await?;

    let cart = cart_service::list_cart_lines(&state.pool, user_id).await?;
    let submission = SubmitOrderRequest {
        user_id,
        address_id,
        item_spec_ids: format!("{s1},{s2}"),
        pay_method: 1,
        left_msg: Some("ring the bell".into()),
    };

    let confirmation = order_service::create_order(&state, &cart, &submission).await?;

    let order = Orders::find_by_id(confirmation.order_id.clone())
        .one(&state.orm)
        .await?
        .expect("order row");
    assert_eq!(order.total_amount, 2 * 1000 + 500);
    assert_eq!(order.real_pay_amount, 2 * 800 + 400);
    assert_eq!(order.post_amount, 0);
    assert_eq!(order.receiver_name, "Tester");

    let handoff = &confirmation.payment_handoff;
    assert_eq!(handoff.amount, order.real_pay_amount + order.post_amount);
    assert_eq!(handoff.merchant_order_id, confirmation.order_id);
    assert_eq!(handoff.merchant_user_id, user_id);

    let lines = OrderItems::find()
        .filter(LineCol::OrderId.eq(confirmation.order_id.clone()))
        .all(&state.orm)
        .await?;
    assert_eq!(lines.len(), 2);
    let line1 = lines.iter().find(|l| l.spec_id == s1).expect("s1 line");
    assert_eq!(line1.quantity, 2);
    assert_eq!(line1.price, 800, "line price is the per-unit discount price");
    let line2 = lines.iter().find(|l| l.spec_id == s2).expect("s2 line");
    assert_eq!(line2.price, 400);

    let status = OrderStatusRows::find_by_id(confirmation.order_id.clone())
        .one(&state.orm)
        .await?
        .expect("status row");
    assert_eq!(status.status, OrderStatusCode::WaitPay.as_i16());
    assert!(status.pay_time.is_none());
    assert!(status.close_time.is_none());

    // Stock went down for the purchased specs only.
    assert_eq!(spec_stock(&state, s1).await?, 8);
    assert_eq!(spec_stock(&state, s2).await?, 9);
    assert_eq!(spec_stock(&state, s3).await?, 10);

    // The confirmation names the matched lines; clearing them leaves the
    // unrequested line in the cart.
    assert_eq!(
        confirmation.removed_cart_lines,
        vec![
            CartLine { spec_id: s1, quantity: 2 },
            CartLine { spec_id: s2, quantity: 1 },
        ]
    );
    cart_service::remove_cart_lines(&state.pool, user_id, &confirmation.removed_cart_lines)
        .await?;
    let remaining = cart_service::list_cart_lines(&state.pool, user_id).await?;
    assert_eq!(remaining, vec![CartLine { spec_id: s3, quantity: 4 }]);

    Ok(())
}

#[tokio::test]
async fn create_order_rejects_spec_missing_from_cart() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state).await?;
    let address_id = create_address(&state, user_id).await?;
    let in_cart = create_item_with_spec(&state, "Widget", 1000, 800, 10).await?;
    let not_in_cart = create_item_with_spec(&state, "Gadget", 500, 400, 10).await?;
    add_cart_line(&state, user_id, in_cart, 1).await?;

    let cart = cart_service::list_cart_lines(&state.pool, user_id).await?;
    let submission = SubmitOrderRequest {
        user_id,
        address_id,
        item_spec_ids: format!("{in_cart},{not_in_cart}"),
        pay_method: 1,
        left_msg: None,
    };

    let err = order_service::create_order(&state, &cart, &submission)
        .await
        .expect_err("missing cart line must reject the order");
    assert!(matches!(err, AppError::CartLineMissing(id) if id == not_in_cart));

    // Nothing persisted, nothing decremented.
    let orders = Orders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .all(&state.orm)
        .await?;
    assert!(orders.is_empty());
    assert_eq!(spec_stock(&state, in_cart).await?, 10);

    Ok(())
}

#[tokio::test]
async fn create_order_rolls_back_on_insufficient_stock() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state).await?;
    let address_id = create_address(&state, user_id).await?;
    let plenty = create_item_with_spec(&state, "Widget", 1000, 800, 5).await?;
    let scarce = create_item_with_spec(&state, "Gadget", 500, 400, 1).await?;
    add_cart_line(&state, user_id, plenty, 2).await?;
    add_cart_line(&state, user_id, scarce, 3).await?;

    let cart = cart_service::list_cart_lines(&state.pool, user_id).await?;
    let submission = SubmitOrderRequest {
        user_id,
        address_id,
        item_spec_ids: format!("{plenty},{scarce}"),
        pay_method: 1,
        left_msg: None,
    };

    let err = order_service::create_order(&state, &cart, &submission)
        .await
        .expect_err("overselling must fail");
    assert!(matches!(err, AppError::InsufficientStock(id) if id == scarce));

    // The earlier line's decrement rolled back with everything else.
    assert_eq!(spec_stock(&state, plenty).await?, 5);
    assert_eq!(spec_stock(&state, scarce).await?, 1);
    let orders = Orders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .all(&state.orm)
        .await?;
    assert!(orders.is_empty());

    Ok(())
}

#[tokio::test]
async fn paying_an_order_stamps_pay_time_once() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let order_id = place_simple_order(&state).await?;

    order_service::update_order_status(&state, &order_id, OrderStatusCode::Paid.as_i16())
        .await?;

    let status = order_service::query_order_status_info(&state, &order_id)
        .await?
        .expect("status row");
    assert_eq!(status.status, OrderStatusCode::Paid.as_i16());
    assert!(status.pay_time.is_some());
    assert!(status.close_time.is_none());

    // A second paid transition no longer finds the awaiting-payment row.
    let err = order_service::update_order_status(&state, &order_id, OrderStatusCode::Paid.as_i16())
        .await
        .expect_err("double payment must conflict");
    assert!(matches!(err, AppError::StatusConflict));

    Ok(())
}

#[tokio::test]
async fn updating_status_of_unknown_order_fails() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let err = order_service::update_order_status(&state, "no-such-order", 20)
        .await
        .expect_err("unknown order id");
    assert!(matches!(err, AppError::OrderNotFound));

    assert!(
        order_service::query_order_status_info(&state, "no-such-order")
            .await?
            .is_none()
    );

    Ok(())
}

#[tokio::test]
async fn close_sweep_closes_only_stale_unpaid_orders() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let stale_id = place_simple_order(&state).await?;
    let fresh_id = place_simple_order(&state).await?;
    backdate_status(&state, &stale_id, "2 days").await?;
    backdate_status(&state, &fresh_id, "2 hours").await?;

    let closed = order_service::close_stale_orders(&state).await?;
    assert!(closed >= 1);

    let stale = order_service::query_order_status_info(&state, &stale_id)
        .await?
        .expect("status row");
    assert_eq!(stale.status, OrderStatusCode::Closed.as_i16());
    assert!(stale.close_time.is_some());

    let fresh = order_service::query_order_status_info(&state, &fresh_id)
        .await?
        .expect("status row");
    assert_eq!(fresh.status, OrderStatusCode::WaitPay.as_i16());
    assert!(fresh.close_time.is_none());

    // Payment arriving after the close loses the race.
    let err = order_service::update_order_status(&state, &stale_id, OrderStatusCode::Paid.as_i16())
        .await
        .expect_err("closed order cannot be paid");
    assert!(matches!(err, AppError::StatusConflict));

    Ok(())
}

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    Ok(Some(AppState {
        pool,
        orm,
        ids: Arc::new(ShortIdGenerator),
    }))
}

async fn create_user(state: &AppState) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(format!("tester-{}", Uuid::new_v4().simple())),
        password: Set("dummy-hash".into()),
        nickname: Set(Some("Tester".into())),
        face: Set(None),
        mobile: Set(None),
        email: Set(None),
        sex: Set(0),
        birthday: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(user.id)
}

async fn create_address(state: &AppState, user_id: Uuid) -> anyhow::Result<Uuid> {
    let address = AddressActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        receiver: Set("Tester".into()),
        mobile: Set("13000000000".into()),
        province: Set("Guangdong".into()),
        city: Set("Shenzhen".into()),
        district: Set("Nanshan".into()),
        detail: Set("1 Test Road".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(address.id)
}

async fn create_item_with_spec(
    state: &AppState,
    name: &str,
    price_normal: i64,
    price_discount: i64,
    stock: i32,
) -> anyhow::Result<Uuid> {
    let item = ItemActive {
        id: Set(Uuid::new_v4()),
        item_name: Set(name.into()),
        main_img: Set(format!("https://img.example.com/{name}.jpg")),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let spec = SpecActive {
        id: Set(Uuid::new_v4()),
        item_id: Set(item.id),
        name: Set("default".into()),
        price_normal: Set(price_normal),
        price_discount: Set(price_discount),
        stock: Set(stock),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(spec.id)
}

async fn add_cart_line(
    state: &AppState,
    user_id: Uuid,
    spec_id: Uuid,
    quantity: i32,
) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO cart_items (id, user_id, spec_id, quantity) VALUES ($1, $2, $3, $4)")
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(spec_id)
        .bind(quantity)
        .execute(&state.pool)
        .await?;
    Ok(())
}

async fn spec_stock(state: &AppState, spec_id: Uuid) -> anyhow::Result<i32> {
    let spec = ItemSpecs::find_by_id(spec_id)
        .one(&state.orm)
        .await?
        .expect("spec row");
    Ok(spec.stock)
}

/// One user, one address, one single-line order. Returns the order id.
async fn place_simple_order(state: &AppState) -> anyhow::Result<String> {
    let user_id = create_user(state).await?;
    let address_id = create_address(state, user_id).await?;
    let spec = create_item_with_spec(state, "Widget", 1000, 800, 10).await?;
    add_cart_line(state, user_id, spec, 1).await?;

    let cart = cart_service::list_cart_lines(&state.pool, user_id).await?;
    let submission = SubmitOrderRequest {
        user_id,
        address_id,
        item_spec_ids: spec.to_string(),
        pay_method: 1,
        left_msg: None,
    };
    let confirmation = order_service::create_order(state, &cart, &submission).await?;
    Ok(confirmation.order_id)
}

async fn backdate_status(
    state: &AppState,
    order_id: &str,
    interval: &str,
) -> anyhow::Result<()> {
    sqlx::query("UPDATE order_status SET created_at = now() - $1::interval WHERE order_id = $2")
        .bind(interval)
        .bind(order_id)
        .execute(&state.pool)
        .await?;
    Ok(())
}
