use axum_mall_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let user_id = ensure_user(&pool, "demo").await?;
    let address_id = ensure_address(&pool, user_id).await?;
    let spec_ids = seed_catalog(&pool).await?;
    seed_cart(&pool, user_id, &spec_ids).await?;

    println!("Seed completed. User: {user_id}, Address: {address_id}");
    Ok(())
}

async fn ensure_user(pool: &sqlx::PgPool, username: &str) -> anyhow::Result<Uuid> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = row {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO users (id, username, password, nickname, sex)
        VALUES ($1, $2, $3, $4, 0)
        "#,
    )
    .bind(id)
    .bind(username)
    .bind("not-a-real-hash")
    .bind("Demo User")
    .execute(pool)
    .await?;
    Ok(id)
}

async fn ensure_address(pool: &sqlx::PgPool, user_id: Uuid) -> anyhow::Result<Uuid> {
    let row: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM user_addresses WHERE user_id = $1 LIMIT 1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    if let Some((id,)) = row {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO user_addresses (id, user_id, receiver, mobile, province, city, district, detail)
        VALUES ($1, $2, 'Demo User', '13000000000', 'Guangdong', 'Shenzhen', 'Nanshan', '1 Demo Road')
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(id)
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<Vec<Uuid>> {
    let mut spec_ids = Vec::new();
    for (name, spec_name, normal, discount, stock) in [
        ("Oolong tea", "250g tin", 5800_i64, 4900_i64, 100),
        ("Dried mango", "500g bag", 2500, 1990, 200),
    ] {
        let item_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO items (id, item_name, main_img) VALUES ($1, $2, $3)",
        )
        .bind(item_id)
        .bind(name)
        .bind(format!("https://img.example.com/{item_id}.jpg"))
        .execute(pool)
        .await?;

        let spec_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO item_specs (id, item_id, name, price_normal, price_discount, stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(spec_id)
        .bind(item_id)
        .bind(spec_name)
        .bind(normal)
        .bind(discount)
        .bind(stock)
        .execute(pool)
        .await?;
        spec_ids.push(spec_id);
    }
    Ok(spec_ids)
}

async fn seed_cart(pool: &sqlx::PgPool, user_id: Uuid, spec_ids: &[Uuid]) -> anyhow::Result<()> {
    for (i, spec_id) in spec_ids.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO cart_items (id, user_id, spec_id, quantity)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, spec_id) DO UPDATE SET quantity = EXCLUDED.quantity
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(spec_id)
        .bind((i + 1) as i32)
        .execute(pool)
        .await?;
    }
    Ok(())
}
