//! Logic Module - Lead Scoring Core
//!
//! - `features/` - raw lead to fixed-width vector
//! - `model/` - artifacts, scaling, inference, fallback
//! - `config` / `error` - environment settings and the crate error type

pub mod config;
pub mod error;
pub mod features;
pub mod model;
