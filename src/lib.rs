pub mod aggregators;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod selection;
