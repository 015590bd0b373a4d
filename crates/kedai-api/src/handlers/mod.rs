//! HTTP handlers for kedai-api.

pub mod auth;
pub mod feedbacks;
pub mod merchant_types;
pub mod merchants;
pub mod users;
pub mod utils;
