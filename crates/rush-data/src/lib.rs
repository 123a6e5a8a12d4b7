//! Data files for rush restaurants.
//!
//! A restaurant directory holds an optional balance file
//! (`restaurant.ron`, `.toml` or `.json`, deserialized into
//! [`rush_core::config::RestaurantConfig`]) and a required floor plan
//! (`floor.*`, see [`schema::FloorPlan`]). [`load_restaurant_dir`] reads
//! both and builds a ready-to-step restaurant with fixture names resolved to
//! ids.

pub mod builder;
pub mod loader;
pub mod schema;

pub use builder::{BuiltRestaurant, build_restaurant};
pub use loader::{DataLoadError, load_config, load_restaurant_dir};
pub use schema::FloorPlan;
