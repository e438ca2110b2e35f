use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity::{
        item_specs::{Column as SpecCol, Entity as ItemSpecs, Model as SpecModel},
        items::{Entity as Items, Model as ItemModel},
    },
    error::{AppError, AppResult},
};

pub async fn query_item_spec<C: ConnectionTrait>(conn: &C, spec_id: Uuid) -> AppResult<SpecModel> {
    ItemSpecs::find_by_id(spec_id)
        .one(conn)
        .await?
        .ok_or(AppError::SpecNotFound)
}

pub async fn query_item<C: ConnectionTrait>(conn: &C, item_id: Uuid) -> AppResult<ItemModel> {
    Items::find_by_id(item_id)
        .one(conn)
        .await?
        .ok_or(AppError::ItemNotFound)
}

/// Take `quantity` units off the spec's stock. The decrement and the
/// floor check are a single statement, so concurrent checkouts of the
/// same spec serialize on the row and the counter can never go negative.
pub async fn decrease_spec_stock<C: ConnectionTrait>(
    conn: &C,
    spec_id: Uuid,
    quantity: i32,
) -> AppResult<()> {
    let result = ItemSpecs::update_many()
        .col_expr(SpecCol::Stock, Expr::col(SpecCol::Stock).sub(quantity))
        .filter(SpecCol::Id.eq(spec_id))
        .filter(SpecCol::Stock.gte(quantity))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::InsufficientStock(spec_id));
    }
    Ok(())
}
