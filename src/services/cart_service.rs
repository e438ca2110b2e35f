use sqlx::FromRow;
use uuid::Uuid;

use crate::{db::DbPool, dto::orders::CartLine, error::AppResult};

#[derive(FromRow)]
struct CartRow {
    spec_id: Uuid,
    quantity: i32,
}

/// Current cart snapshot for the user, oldest line first. The order
/// workflow only reads this; clearing happens after the order commits.
pub async fn list_cart_lines(pool: &DbPool, user_id: Uuid) -> AppResult<Vec<CartLine>> {
    let rows = sqlx::query_as::<_, CartRow>(
        r#"
        SELECT spec_id, quantity
        FROM cart_items
        WHERE user_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| CartLine {
            spec_id: row.spec_id,
            quantity: row.quantity,
        })
        .collect())
}

/// Drop the cart rows consumed by a submitted order. Returns the number
/// of rows removed.
pub async fn remove_cart_lines(
    pool: &DbPool,
    user_id: Uuid,
    lines: &[CartLine],
) -> AppResult<u64> {
    if lines.is_empty() {
        return Ok(0);
    }
    let spec_ids: Vec<Uuid> = lines.iter().map(|line| line.spec_id).collect();
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND spec_id = ANY($2)")
        .bind(user_id)
        .bind(&spec_ids)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
