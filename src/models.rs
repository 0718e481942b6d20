use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
pub const ROLE_RESTAURANT: &str = "restaurant";

pub const BLOCK_REASON_MIN_LEN: usize = 10;

/// Public view of a user. Password hash and one-time-password fields never leave the service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub is_blocked: bool,
    pub blocked_reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account state filter for the admin user list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatusFilter {
    /// Active and not blocked.
    Active,
    Blocked,
    Inactive,
}

impl UserStatusFilter {
    /// Unknown values mean "no filter".
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "active" => Some(Self::Active),
            "blocked" => Some(Self::Blocked),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Returns the trimmed reason when it is long enough to block a user.
pub fn validate_block_reason(reason: Option<&str>) -> Result<String, AppError> {
    let reason = reason.map(str::trim).unwrap_or_default();
    if reason.chars().count() < BLOCK_REASON_MIN_LEN {
        return Err(AppError::bad_request(format!(
            "Block reason must be at least {BLOCK_REASON_MIN_LEN} characters"
        )));
    }
    Ok(reason.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: i64,
    pub active: i64,
    pub blocked: i64,
    pub inactive: i64,
    pub new_today: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub image: Option<String>,
    pub category: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

/// A line in a cart. Item details are copied at the time the item is added.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub item_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub quantity: i32,
    pub image: Option<String>,
    pub category: Option<String>,
    pub item_total: i64,
}

impl CartLine {
    pub fn from_item(item: &Item, quantity: i32) -> Self {
        let mut line = Self {
            item_id: item.id,
            name: item.name.trim().to_string(),
            description: item.description.as_deref().map(|d| d.trim().to_string()),
            price: item.price,
            quantity,
            image: item.image.clone(),
            category: item.category.clone(),
            item_total: 0,
        };
        line.recalculate();
        line
    }

    fn recalculate(&mut self) {
        self.item_total = self.price.saturating_mul(i64::from(self.quantity));
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Item not found in cart")]
    ItemNotFound,
    #[error("Quantity is too large")]
    QuantityTooLarge,
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ItemNotFound => AppError::NotFound(err.to_string()),
            CartError::QuantityTooLarge => AppError::BadRequest(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub items: Vec<CartLine>,
    pub subtotal: i64,
    pub total: i64,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(id: Uuid, user_id: Uuid, restaurant_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            restaurant_id,
            items: Vec::new(),
            subtotal: 0,
            total: 0,
            item_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Recomputes line totals, then the cart aggregates. No fees or taxes: total equals subtotal.
    pub fn calculate_totals(&mut self) {
        for line in &mut self.items {
            line.recalculate();
        }
        self.subtotal = self
            .items
            .iter()
            .fold(0i64, |acc, line| acc.saturating_add(line.item_total));
        self.total = self.subtotal;
        self.item_count = self.items.iter().map(|line| i64::from(line.quantity)).sum();
        tracing::debug!(
            cart_id = %self.id,
            subtotal = self.subtotal,
            total = self.total,
            "cart totals calculated"
        );
    }

    /// Adds a line, merging into an existing line for the same item.
    /// A merge that would overflow the line quantity leaves the cart untouched.
    pub fn add_item(&mut self, line: CartLine) -> Result<(), CartError> {
        let cart_id = self.id;
        match self.items.iter_mut().find(|l| l.item_id == line.item_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or(CartError::QuantityTooLarge)?;
                tracing::debug!(
                    %cart_id,
                    item_id = %existing.item_id,
                    quantity = existing.quantity,
                    "merged item into existing cart line"
                );
            }
            None => {
                tracing::debug!(cart_id = %self.id, item_id = %line.item_id, "appended cart line");
                self.items.push(line);
            }
        }
        self.calculate_totals();
        Ok(())
    }

    /// Sets a line's quantity; zero or negative removes the line.
    pub fn update_item_quantity(&mut self, item_id: Uuid, quantity: i32) -> Result<(), CartError> {
        let index = self
            .items
            .iter()
            .position(|line| line.item_id == item_id)
            .ok_or(CartError::ItemNotFound)?;

        if quantity <= 0 {
            self.items.remove(index);
            tracing::debug!(cart_id = %self.id, %item_id, "removed cart line");
        } else if let Some(line) = self.items.get_mut(index) {
            line.quantity = quantity;
        }
        self.calculate_totals();
        Ok(())
    }

    pub fn clear(&mut self) {
        tracing::debug!(cart_id = %self.id, "clearing cart");
        self.items.clear();
        self.subtotal = 0;
        self.total = 0;
        self.item_count = 0;
    }
}
