//! # Types
//!
//! Plain data holders for what a crash report contains: addresses, register
//! values and loaded modules.

pub mod address;
pub mod module;
pub mod registers;

// Re-export all public types
pub use address::Address;
pub use module::Module;
pub use registers::{Register, RegisterId};
