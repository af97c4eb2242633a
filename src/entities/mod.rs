//! Database entities for the counter's order store.

pub mod deleted_order;
pub mod deleted_order_item;
pub mod discounted_order;
pub mod held_order;
pub mod held_order_item;
pub mod menu_item;
pub mod order;
pub mod order_item;

pub use deleted_order::Entity as DeletedOrder;
pub use deleted_order_item::Entity as DeletedOrderItem;
pub use discounted_order::Entity as DiscountedOrder;
pub use held_order::Entity as HeldOrder;
pub use held_order_item::Entity as HeldOrderItem;
pub use menu_item::Entity as MenuItem;
pub use order::Entity as Order;
pub use order_item::Entity as OrderItem;
