use food_delivery_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        items::{ActiveModel as ItemActive, Column as ItemCol, Entity as Items},
        restaurants::{ActiveModel as RestaurantActive, Column as RestaurantCol, Entity as Restaurants},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    models::{ROLE_ADMIN, ROLE_RESTAURANT, ROLE_USER},
    services::auth_service::hash_password,
};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "Admin", "admin@example.com", "admin123", ROLE_ADMIN).await?;
    let user_id = ensure_user(&orm, "Test User", "user@example.com", "user123", ROLE_USER).await?;
    let owner_id =
        ensure_user(&orm, "Owner", "owner@example.com", "owner123", ROLE_RESTAURANT).await?;
    let restaurant_id = seed_restaurant(&orm, owner_id).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, User ID: {user_id}, Restaurant ID: {restaurant_id}"
    );
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(orm)
        .await?
    {
        println!("User {email} already exists");
        return Ok(existing.id);
    }

    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        phone: Set(None),
        password_hash: Set(password_hash),
        role: Set(role.to_string()),
        is_active: Set(true),
        is_blocked: Set(false),
        blocked_reason: Set(String::new()),
        otp: Set(None),
        otp_expiry: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user.id)
}

async fn seed_restaurant(orm: &DatabaseConnection, owner_id: Uuid) -> anyhow::Result<Uuid> {
    const NAME: &str = "Spice Route Kitchen";

    let restaurant = match Restaurants::find()
        .filter(RestaurantCol::Name.eq(NAME))
        .one(orm)
        .await?
    {
        Some(existing) => existing,
        None => {
            RestaurantActive {
                id: Set(Uuid::new_v4()),
                owner_id: Set(Some(owner_id)),
                name: Set(NAME.to_string()),
                description: Set(Some("Home-style curries and breads".into())),
                address: Set(Some("12 Market Street".into())),
                phone: Set(Some("+1-555-0100".into())),
                image: Set(None),
                is_active: Set(true),
                created_at: NotSet,
                updated_at: NotSet,
            }
            .insert(orm)
            .await?
        }
    };

    let menu = [
        ("Butter Chicken", "Creamy tomato gravy", 1250_i64, "Mains"),
        ("Paneer Tikka", "Char-grilled cottage cheese", 950, "Starters"),
        ("Garlic Naan", "Tandoor-baked flatbread", 300, "Breads"),
        ("Mango Lassi", "Sweet yogurt drink", 400, "Drinks"),
    ];

    for (name, description, price, category) in menu {
        let exists = Items::find()
            .filter(ItemCol::RestaurantId.eq(restaurant.id))
            .filter(ItemCol::Name.eq(name))
            .one(orm)
            .await?;
        if exists.is_some() {
            continue;
        }
        ItemActive {
            id: Set(Uuid::new_v4()),
            restaurant_id: Set(restaurant.id),
            name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
            price: Set(price),
            image: Set(None),
            category: Set(Some(category.to_string())),
            is_available: Set(true),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(orm)
        .await?;
        println!("Seeded item {name}");
    }

    Ok(restaurant.id)
}
