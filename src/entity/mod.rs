pub mod audit_logs;
pub mod cart_items;
pub mod carts;
pub mod items;
pub mod restaurants;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use carts::Entity as Carts;
pub use items::Entity as Items;
pub use restaurants::Entity as Restaurants;
pub use users::Entity as Users;
