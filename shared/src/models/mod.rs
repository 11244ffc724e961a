//! Entity models shared between the backend wire format and the client stores

mod dining_table;
mod menu_item;
mod order;
mod payment;

pub use dining_table::{DiningTable, ReservationPayload, TableStatus, TableUpdate};
pub use menu_item::{MenuCategory, MenuItem};
pub use order::{Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus};
pub use payment::{OrderClosed, PaymentInput, PaymentMethod, PaymentRecord};
