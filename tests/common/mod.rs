#![allow(dead_code)]

use food_delivery_api::{
    db::{create_orm_conn, run_migrations},
    entity::{
        items::ActiveModel as ItemActive, restaurants::ActiveModel as RestaurantActive,
        users::ActiveModel as UserActive,
    },
    middleware::auth::AuthUser,
    state::{AppState, JwtKeys},
};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Statement};
use uuid::Uuid;

pub const TEST_SECRET: &[u8] = b"test-secret";

/// State backed by a handle that never reaches a database; for paths rejected before any query.
pub fn offline_state() -> AppState {
    AppState {
        orm: DatabaseConnection::Disconnected,
        jwt: JwtKeys::from_secret(TEST_SECRET, 1),
    }
}

pub fn database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

pub async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE cart_items, carts, items, restaurants, audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState {
        orm,
        jwt: JwtKeys::from_secret(TEST_SECRET, 1),
    })
}

pub async fn create_user(state: &AppState, name: &str, role: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(format!("{}@example.com", name.to_lowercase())),
        phone: Set(None),
        password_hash: Set("dummy".into()),
        role: Set(role.into()),
        is_active: Set(true),
        is_blocked: Set(false),
        blocked_reason: Set(String::new()),
        otp: Set(None),
        otp_expiry: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}

pub async fn create_restaurant(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let restaurant = RestaurantActive {
        id: Set(Uuid::new_v4()),
        owner_id: Set(None),
        name: Set(name.to_string()),
        description: Set(None),
        address: Set(None),
        phone: Set(None),
        image: Set(None),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(restaurant.id)
}

pub async fn create_item(
    state: &AppState,
    restaurant_id: Uuid,
    name: &str,
    price: i64,
) -> anyhow::Result<Uuid> {
    let item = ItemActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(restaurant_id),
        name: Set(name.to_string()),
        description: Set(Some(format!("{name} from the test kitchen"))),
        price: Set(price),
        image: Set(None),
        category: Set(Some("Mains".into())),
        is_available: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(item.id)
}
