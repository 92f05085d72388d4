pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod store;
pub mod task;
pub mod ui;
