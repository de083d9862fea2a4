//! Bodega API Library
//!
//! Warehouse ("bodega") master-data administration: CRUD over warehouses and
//! their assigned managers, exposed as a JSON API plus one server-rendered
//! admin page.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod services;
pub mod validation;

pub use handlers::AppState;
