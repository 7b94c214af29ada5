//! Stores current-weather lookups under generated ids.
//!
//! `POST /weather` asks the weather provider about a location and keeps the
//! answer along with the caller's date and notes. `GET /weather/{id}` hands
//! the stored record back.

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod provider;
pub mod weather;
pub mod weather_routes;
