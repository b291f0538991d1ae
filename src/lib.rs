//! Menu Lens: photograph a restaurant menu, send it to an analysis service
//! and browse the dishes and drinks it finds.

pub mod config;
pub mod controller;
pub mod error;
pub mod intake;
pub mod logging;
pub mod model;
pub mod page;
pub mod render;
pub mod server;
pub mod service;

pub use config::Config;
pub use controller::{Controller, FlowState, Panel, PendingUpload};
pub use error::MenuError;
pub use intake::SelectedFile;
pub use model::{Beverage, Dish, Menu};
pub use service::{HttpMenuService, MenuService};
