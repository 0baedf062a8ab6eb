pub mod app;
pub mod client;
pub mod config;
pub mod form;
pub mod state;
pub mod uploads;
pub mod users;
