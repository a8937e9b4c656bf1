//! Servicios del dominio
//!
//! Lógica central de las reservas: validación, cálculo del depósito y
//! el procesador de pagos mock.

pub mod booking_validator;
pub mod deposit;
pub mod payments;
