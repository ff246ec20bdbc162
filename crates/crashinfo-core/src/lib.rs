//! # crashinfo-core
//!
//! Crash report parsing for SA-MP server crash dumps.
//!
//! When the server faults it writes a plain text report containing its
//! version, the CPU registers, a raw dump of the stack and the table of
//! loaded modules. This crate provides:
//! - A single-pass parser turning that text into a [`CrashInfo`]
//! - Module lookup and call stack resolution (which stack words point into
//!   which module)
//! - A [`FunctionResolver`](symbols::FunctionResolver) seam for naming the
//!   functions on the call stack
//! - Plain text report rendering
//!
//! ## Example
//!
//! ```rust
//! use crashinfo_core::parse_str;
//!
//! let info = parse_str(
//!     "Registers:\nEAX: 0x00000001 EBX: 0x00000002 ECX: 0x00000003 EDX: 0x00000004\n",
//! )?;
//! let names: Vec<_> = info.registers().iter().map(|reg| reg.name()).collect();
//! assert_eq!(names, ["eax", "ebx", "ecx", "edx"]);
//! # Ok::<(), crashinfo_core::CrashInfoError>(())
//! ```

pub mod crash_info;
pub mod error;
pub mod parser;
pub mod report;
pub mod symbols;
pub mod types;

pub use crash_info::CrashInfo;
// Re-export commonly used types
pub use error::{CrashInfoError, CrashInfoResult};
pub use parser::{parse, parse_file, parse_reader, parse_str};
pub use types::{Address, Module, Register, RegisterId};
