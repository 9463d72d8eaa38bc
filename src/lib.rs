pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod lesson;
pub mod lookup;
pub mod quiz;
pub mod store;
pub mod ui;
