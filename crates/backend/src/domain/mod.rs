//! Domain types - input record shapes and configuration
//!
//! These types describe the positional CSV inputs and the settings that drive a
//! ranking run.

pub mod config;
pub mod record;
