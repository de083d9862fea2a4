pub mod warehouses;

pub use warehouses::WarehouseService;
