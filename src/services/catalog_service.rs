use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    dto::catalog::{ItemList, RestaurantList},
    entity::{
        items::{Column as ItemCol, Entity as Items, Model as ItemModel},
        restaurants::{Column as RestaurantCol, Entity as Restaurants, Model as RestaurantModel},
    },
    error::{AppError, AppResult},
    models::{Item, Restaurant},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_restaurants(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<RestaurantList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Restaurants::find()
        .filter(RestaurantCol::IsActive.eq(true))
        .order_by_desc(RestaurantCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items: Vec<Restaurant> = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(restaurant_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total, items.len() as i64);
    Ok(ApiResponse::success("Restaurants", RestaurantList { items }, Some(meta)))
}

pub async fn get_restaurant(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Restaurant>> {
    let restaurant = Restaurants::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Restaurant not found"))?;

    Ok(ApiResponse::success(
        "Restaurant found",
        restaurant_from_entity(restaurant),
        None,
    ))
}

pub async fn list_restaurant_items(
    state: &AppState,
    restaurant_id: Uuid,
    pagination: Pagination,
) -> AppResult<ApiResponse<ItemList>> {
    let exists = Restaurants::find_by_id(restaurant_id).one(&state.orm).await?;
    if exists.is_none() {
        return Err(AppError::not_found("Restaurant not found"));
    }

    let (page, limit, offset) = pagination.normalize();
    let finder = Items::find()
        .filter(ItemCol::RestaurantId.eq(restaurant_id))
        .filter(ItemCol::IsAvailable.eq(true))
        .order_by_asc(ItemCol::Category)
        .order_by_asc(ItemCol::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items: Vec<Item> = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(item_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total, items.len() as i64);
    Ok(ApiResponse::success("Items", ItemList { items }, Some(meta)))
}

pub fn restaurant_from_entity(model: RestaurantModel) -> Restaurant {
    Restaurant {
        id: model.id,
        owner_id: model.owner_id,
        name: model.name,
        description: model.description,
        address: model.address,
        phone: model.phone,
        image: model.image,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub fn item_from_entity(model: ItemModel) -> Item {
    Item {
        id: model.id,
        restaurant_id: model.restaurant_id,
        name: model.name,
        description: model.description,
        price: model.price,
        image: model.image,
        category: model.category,
        is_available: model.is_available,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
