use chrono::Utc;
use sea_orm::sea_query::{LockType, OnConflict};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::cart::{AddToCartRequest, UpdateCartItemRequest},
    entity::{
        cart_items::{ActiveModel as LineActive, Column as LineCol, Entity as CartItems, Model as LineModel},
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts, Model as CartModel},
        items::Entity as Items,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Cart, CartLine},
    response::ApiResponse,
    services::catalog_service::item_from_entity,
    state::AppState,
};

/// Looks up the cart for a `(user, restaurant)` pair. `None` means the caller has to create one.
pub async fn find_active_cart<C>(
    conn: &C,
    user_id: Uuid,
    restaurant_id: Uuid,
) -> AppResult<Option<Cart>>
where
    C: ConnectionTrait,
{
    tracing::debug!(%user_id, %restaurant_id, "finding active cart");
    let cart = Carts::find()
        .filter(CartCol::UserId.eq(user_id))
        .filter(CartCol::RestaurantId.eq(restaurant_id))
        .one(conn)
        .await?;

    match cart {
        Some(cart) => {
            let lines = load_lines(conn, cart.id).await?;
            Ok(Some(cart_from_entity(cart, lines)))
        }
        None => Ok(None),
    }
}

pub async fn get_cart(
    state: &AppState,
    user: &AuthUser,
    restaurant_id: Uuid,
) -> AppResult<ApiResponse<Cart>> {
    let cart = find_active_cart(&state.orm, user.user_id, restaurant_id)
        .await?
        .ok_or_else(cart_not_found)?;
    Ok(ApiResponse::success("Cart", cart, None))
}

pub async fn add_item(
    state: &AppState,
    user: &AuthUser,
    restaurant_id: Uuid,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<Cart>> {
    if payload.quantity < 1 {
        return Err(AppError::bad_request("Quantity must be at least 1"));
    }

    let item = Items::find_by_id(payload.item_id)
        .one(&state.orm)
        .await?
        .map(item_from_entity)
        .ok_or_else(|| AppError::not_found("Item not found"))?;
    if item.restaurant_id != restaurant_id {
        return Err(AppError::bad_request("Item does not belong to this restaurant"));
    }
    if !item.is_available {
        return Err(AppError::bad_request("Item is not available"));
    }

    let txn = state.orm.begin().await?;
    let mut cart = lock_or_create_cart(&txn, user.user_id, restaurant_id).await?;
    cart.add_item(CartLine::from_item(&item, payload.quantity))?;
    persist_cart(&txn, &mut cart).await?;
    txn.commit().await?;

    audit::record(
        state,
        Some(user.user_id),
        "cart_add_item",
        "carts",
        serde_json::json!({ "cart_id": cart.id, "item_id": item.id, "quantity": payload.quantity }),
    )
    .await;

    Ok(ApiResponse::success("Item added to cart", cart, None))
}

pub async fn update_item_quantity(
    state: &AppState,
    user: &AuthUser,
    restaurant_id: Uuid,
    item_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<Cart>> {
    let txn = state.orm.begin().await?;
    let mut cart = lock_cart(&txn, user.user_id, restaurant_id)
        .await?
        .ok_or_else(cart_not_found)?;
    cart.update_item_quantity(item_id, payload.quantity)?;
    persist_cart(&txn, &mut cart).await?;
    txn.commit().await?;

    audit::record(
        state,
        Some(user.user_id),
        "cart_update_item",
        "carts",
        serde_json::json!({ "cart_id": cart.id, "item_id": item_id, "quantity": payload.quantity }),
    )
    .await;

    let message = if payload.quantity <= 0 {
        "Item removed from cart"
    } else {
        "Cart updated"
    };
    Ok(ApiResponse::success(message, cart, None))
}

pub async fn remove_item(
    state: &AppState,
    user: &AuthUser,
    restaurant_id: Uuid,
    item_id: Uuid,
) -> AppResult<ApiResponse<Cart>> {
    update_item_quantity(
        state,
        user,
        restaurant_id,
        item_id,
        UpdateCartItemRequest { quantity: 0 },
    )
    .await
}

pub async fn clear_cart(
    state: &AppState,
    user: &AuthUser,
    restaurant_id: Uuid,
) -> AppResult<ApiResponse<Cart>> {
    let txn = state.orm.begin().await?;
    let mut cart = lock_cart(&txn, user.user_id, restaurant_id)
        .await?
        .ok_or_else(cart_not_found)?;
    cart.clear();
    persist_cart(&txn, &mut cart).await?;
    txn.commit().await?;

    audit::record(
        state,
        Some(user.user_id),
        "cart_clear",
        "carts",
        serde_json::json!({ "cart_id": cart.id }),
    )
    .await;

    Ok(ApiResponse::success("Cart cleared", cart, None))
}

async fn lock_cart(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    restaurant_id: Uuid,
) -> AppResult<Option<Cart>> {
    let cart = Carts::find()
        .filter(CartCol::UserId.eq(user_id))
        .filter(CartCol::RestaurantId.eq(restaurant_id))
        .lock(LockType::Update)
        .one(txn)
        .await?;

    match cart {
        Some(cart) => {
            let lines = load_lines(txn, cart.id).await?;
            Ok(Some(cart_from_entity(cart, lines)))
        }
        None => Ok(None),
    }
}

async fn lock_or_create_cart(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    restaurant_id: Uuid,
) -> AppResult<Cart> {
    // A concurrent request may create the same cart; the unique pair makes the loser a no-op.
    let created = Carts::insert(CartActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        restaurant_id: Set(restaurant_id),
        subtotal: Set(0),
        total: Set(0),
        created_at: NotSet,
        updated_at: NotSet,
    })
    .on_conflict(
        OnConflict::columns([CartCol::UserId, CartCol::RestaurantId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(txn)
    .await?;
    if created > 0 {
        tracing::info!(%user_id, %restaurant_id, "cart created");
    }

    lock_cart(txn, user_id, restaurant_id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("cart vanished after insert")))
}

async fn load_lines<C>(conn: &C, cart_id: Uuid) -> AppResult<Vec<LineModel>>
where
    C: ConnectionTrait,
{
    let lines = CartItems::find()
        .filter(LineCol::CartId.eq(cart_id))
        .order_by_asc(LineCol::Position)
        .all(conn)
        .await?;
    Ok(lines)
}

/// Rewrites the cart's lines and totals. Totals are recalculated first so the stored
/// aggregates always match the stored lines.
async fn persist_cart(txn: &DatabaseTransaction, cart: &mut Cart) -> AppResult<()> {
    cart.calculate_totals();
    let now = Utc::now();

    CartItems::delete_many()
        .filter(LineCol::CartId.eq(cart.id))
        .exec(txn)
        .await?;

    if !cart.items.is_empty() {
        let lines = cart.items.iter().enumerate().map(|(position, line)| LineActive {
            id: Set(Uuid::new_v4()),
            cart_id: Set(cart.id),
            position: Set(position as i32),
            item_id: Set(line.item_id),
            name: Set(line.name.clone()),
            description: Set(line.description.clone()),
            price: Set(line.price),
            quantity: Set(line.quantity),
            image: Set(line.image.clone()),
            category: Set(line.category.clone()),
            item_total: Set(line.item_total),
            created_at: NotSet,
            updated_at: NotSet,
        });
        CartItems::insert_many(lines)
            .exec_without_returning(txn)
            .await?;
    }

    CartActive {
        id: Set(cart.id),
        subtotal: Set(cart.subtotal),
        total: Set(cart.total),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .update(txn)
    .await?;

    cart.updated_at = now;
    tracing::debug!(cart_id = %cart.id, lines = cart.items.len(), total = cart.total, "cart persisted");
    Ok(())
}

fn cart_from_entity(model: CartModel, lines: Vec<LineModel>) -> Cart {
    let items = lines
        .into_iter()
        .map(|line| CartLine {
            item_id: line.item_id,
            name: line.name,
            description: line.description,
            price: line.price,
            quantity: line.quantity,
            image: line.image,
            category: line.category,
            item_total: line.item_total,
        })
        .collect::<Vec<_>>();
    let item_count = items.iter().map(|line| i64::from(line.quantity)).sum();

    Cart {
        id: model.id,
        user_id: model.user_id,
        restaurant_id: model.restaurant_id,
        items,
        subtotal: model.subtotal,
        total: model.total,
        item_count,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn cart_not_found() -> AppError {
    AppError::not_found("Cart not found")
}
