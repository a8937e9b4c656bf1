//! Controllers de la API
//!
//! Orquestan validación, repositorios y servicios por recurso.

pub mod auth_controller;
pub mod booking_controller;
pub mod vehicle_controller;
