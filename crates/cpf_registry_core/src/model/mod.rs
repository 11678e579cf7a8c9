//! Domain model for persisted registrations.
//!
//! # Responsibility
//! - Define the canonical record stored per CPF.
//! - Carry validated newtypes so invalid values cannot reach storage.
//!
//! # Invariants
//! - A `Cpf` always holds 11 ASCII digits that pass the check-digit rules.
//! - A `RegistrationCode` always has exactly 11 decimal digits.

pub mod record;
