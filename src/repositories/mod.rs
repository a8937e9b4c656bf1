//! Capa de acceso a datos
//!
//! Repositorios SQLx sobre PostgreSQL, uno por agregado.

pub mod booking_repository;
pub mod user_repository;
pub mod vehicle_repository;
