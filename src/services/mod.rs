pub mod gemini_client;
pub mod lead_finder;

pub use gemini_client::*;
pub use lead_finder::*;
