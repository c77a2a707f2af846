//! Sales dashboard engine: load a coffee-shop sales file once, then filter
//! and summarise it for every interaction.

pub mod cache;
pub mod data;
pub mod format;
pub mod report;
pub mod settings;
pub mod state;
pub mod view;
