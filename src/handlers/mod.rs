// src/handlers/mod.rs

pub mod applications;
pub mod auth;
pub mod departments;
pub mod jobs;
pub mod offers;
pub mod reports;
pub mod users;
