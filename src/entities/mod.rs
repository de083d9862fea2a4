pub mod manager;
pub mod warehouse;
pub mod warehouse_manager;
