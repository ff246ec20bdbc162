//! # Error Types
//!
//! Error handling for crash report parsing.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for crash report operations
///
/// ## Error Categories
///
/// 1. **Format errors**: InvalidHex (a value that must be hexadecimal is not)
/// 2. **Input errors**: FileNotFound, Io
/// 3. **Symbol errors**: SymbolMap (malformed symbol map line)
///
/// Lines that simply do not have the shape a section expects are skipped by
/// the parser and never produce an error. Only a line that has the right
/// shape but carries a corrupt value fails the parse.
#[derive(Error, Debug)]
pub enum CrashInfoError
{
    /// A token that must be a hexadecimal 32-bit value is not
    ///
    /// This happens when:
    /// - A stack dump line contains a non-hex word (`+0000: ZZZZZZZZ`)
    /// - A value is hexadecimal but does not fit in 32 bits
    #[error("Invalid hexadecimal literal '{value}' on line {line}: {source}")]
    InvalidHex
    {
        /// 1-based line number in the input
        line: usize,
        /// The offending token
        value: String,
        /// Underlying integer parse failure
        source: ParseIntError,
    },

    /// The crash report file does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Malformed line in a symbol map file
    #[error("Invalid symbol map entry on line {line}: {reason}")]
    SymbolMap
    {
        /// 1-based line number in the symbol map
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// I/O error while reading input
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, CrashInfoError>`
///
/// ```rust
/// use crashinfo_core::error::CrashInfoResult;
/// fn foo() -> CrashInfoResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type CrashInfoResult<T> = std::result::Result<T, CrashInfoError>;
