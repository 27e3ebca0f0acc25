//! Core types shared by every Guidepost crate: configuration, errors,
//! route constants, and the normalized busy-interval model.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
