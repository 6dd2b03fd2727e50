pub mod app;
pub mod default_route;
pub mod lead_route;

pub use app::*;
