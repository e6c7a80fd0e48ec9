//! Weather service for SkyTodo
//!
//! Fetches current conditions for a city from weatherapi.com and classifies
//! the condition text for theming.

pub mod classify;
pub mod provider;
pub mod types;

pub use classify::{display_condition, gradient_for, icon_for, ConditionBucket, Gradient, WeatherIcon};
pub use provider::{WeatherProvider, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
pub use types::*;
