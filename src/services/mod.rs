// Order and bill lifecycle services
pub mod bill;
pub mod catalog;
pub mod discount;
pub mod held_orders;
pub mod orders;
pub mod pricing;
pub mod receipt;

pub use bill::Bill;
pub use catalog::{CatalogEntry, CatalogLookup, DbCatalog, StaticCatalog};
pub use held_orders::{HeldOrderService, HoldBillInput};
pub use orders::{CommitOrderInput, OrderService};
