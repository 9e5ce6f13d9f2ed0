pub mod api;
pub mod events;
pub mod startup;
pub mod store;
