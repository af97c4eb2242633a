//! Plain domain types shared by the services, the session and the HTTP layer.

pub mod discount;
pub mod line_item;
pub mod money;
pub mod order_line;
pub mod summary;

pub use discount::{DiscountOutcome, DiscountSpec};
pub use line_item::LineItem;
pub use money::{round_money, TaxTotals};
pub use order_line::OrderLine;
pub use summary::{
    DeletedOrderSummary, DiscountedOrderSummary, HeldOrderSummary, OrderDetails, OrderItemDetail,
    OrderSummary,
};
