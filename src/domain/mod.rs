pub mod lead;
pub mod search;
