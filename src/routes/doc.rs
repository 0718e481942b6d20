use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, UpdateCartItemRequest},
        catalog::{ItemList, RestaurantList},
        users::{BlockUserRequest, UserList, UserListQuery},
    },
    models::{Cart, CartLine, Item, Restaurant, UserProfile, UserStats},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, health, params, restaurants},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::root,
        auth::register,
        auth::login,
        admin::list_users,
        admin::user_stats,
        admin::get_user,
        admin::block_user,
        admin::unblock_user,
        admin::toggle_user_status,
        restaurants::list_restaurants,
        restaurants::get_restaurant,
        restaurants::list_items,
        cart::get_cart,
        cart::add_item,
        cart::update_item,
        cart::remove_item,
        cart::clear_cart
    ),
    components(
        schemas(
            UserProfile,
            UserStats,
            Restaurant,
            Item,
            Cart,
            CartLine,
            UserList,
            UserListQuery,
            BlockUserRequest,
            RestaurantList,
            ItemList,
            AddToCartRequest,
            UpdateCartItemRequest,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            params::Pagination,
            health::HealthData,
            health::ServiceInfo,
            Meta,
            ApiResponse<UserProfile>,
            ApiResponse<UserList>,
            ApiResponse<UserStats>,
            ApiResponse<Cart>,
            ApiResponse<RestaurantList>,
            ApiResponse<ItemList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and service banner"),
        (name = "Auth", description = "Registration and login"),
        (name = "Admin", description = "Admin user management"),
        (name = "Restaurants", description = "Restaurant catalog"),
        (name = "Cart", description = "Per-restaurant shopping cart"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_admin_user_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/admin/users",
            "/api/admin/users/stats",
            "/api/admin/users/{id}",
            "/api/admin/users/{id}/block",
            "/api/admin/users/{id}/unblock",
            "/api/admin/users/{id}/toggle-status",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
