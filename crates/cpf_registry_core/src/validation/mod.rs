//! Pure input validation for registration requests.
//!
//! # Responsibility
//! - Reduce free-form identifier input to a digit-only canonical string.
//! - Verify CPF check digits and registration code shape.
//!
//! # Invariants
//! - Functions here never touch storage and never block.
//! - Validators operate on already-normalized input only.

pub mod code;
pub mod cpf;
pub mod normalize;

pub use code::{is_valid_code, validate_code, CodeValidationError, CODE_DIGITS};
pub use cpf::{is_valid_cpf, validate_cpf, CpfValidationError, CPF_DIGITS};
pub use normalize::normalize;
