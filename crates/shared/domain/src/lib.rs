//! # Domain Vocabulary
//!
//! Pure types shared by every runtime crate, with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O and no graph logic, just the words the other crates speak.

pub mod config;
pub mod constants;
pub mod roles;
