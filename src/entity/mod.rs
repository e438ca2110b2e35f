pub mod cart_items;
pub mod item_specs;
pub mod items;
pub mod order_items;
pub mod order_status;
pub mod orders;
pub mod user_addresses;
pub mod users;

pub use cart_items::Entity as CartItems;
pub use item_specs::Entity as ItemSpecs;
pub use items::Entity as Items;
pub use order_items::Entity as OrderItems;
pub use order_status::Entity as OrderStatus;
pub use orders::Entity as Orders;
pub use user_addresses::Entity as UserAddresses;
pub use users::Entity as Users;
