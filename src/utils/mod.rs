// src/utils/mod.rs

pub mod digest;
pub mod hash;
pub mod html;
pub mod jwt;
