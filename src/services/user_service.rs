use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, AppResult},
    models::UserInfo,
};

/// Look up a user for the account-center pages. The password column is
/// never selected; `UserInfo` has no field that could carry it.
pub async fn query_user_info(pool: &DbPool, user_id: Uuid) -> AppResult<UserInfo> {
    let user = sqlx::query_as::<_, UserInfo>(
        r#"
        SELECT id, username, nickname, face, mobile, email, sex, birthday,
               created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    user.ok_or(AppError::UserNotFound)
}
