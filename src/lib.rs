pub mod app;
pub mod auction;
pub mod config;
pub mod database;
pub mod handlers;
pub mod repository;
pub mod store;
