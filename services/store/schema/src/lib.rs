//! sea-orm entities for the store database.

pub mod cart_items;
pub mod chat_sessions;
pub mod chat_turns;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod users;
