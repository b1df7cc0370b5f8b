//! Recommendation service for rural producers.
//!
//! Matches consumers with nearby producers through four signals:
//! geographic proximity, declared product preferences, seasonal
//! availability, and a user-based nearest-neighbor collaborative
//! filter over producer ratings.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
