pub mod cache;
pub mod fixtures;
pub mod report;
pub mod season;
pub mod settings;
