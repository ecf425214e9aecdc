// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod mail;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

#[cfg(test)]
mod testing;

pub use routes::create_router;
