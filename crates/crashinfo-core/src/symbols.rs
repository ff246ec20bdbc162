//! Function name resolution for call stack addresses.
//!
//! A crash report only says which module an address belongs to. Naming the
//! function needs outside knowledge: a disassembler database, debug info, or
//! a linker map. [`FunctionResolver`] is the seam for that knowledge and
//! [`SymbolMap`] is a simple file-backed implementation of it.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{CrashInfoError, CrashInfoResult};
use crate::types::Address;

/// Something that can name the function containing an address.
pub trait FunctionResolver
{
    /// Name of the function containing `address`, or `None` if unknown.
    fn resolve_function_name(&self, address: Address) -> Option<String>;
}

impl<F> FunctionResolver for F
where
    F: Fn(Address) -> Option<String>,
{
    fn resolve_function_name(&self, address: Address) -> Option<String>
    {
        self(address)
    }
}

/// Sorted table of function start addresses
///
/// Loaded from a text file with one `<hex address> <name>` pair per line.
/// Blank lines and lines starting with `#` are ignored. An address resolves
/// to the closest symbol at or below it.
///
/// ```text
/// # samp-server.exe
/// 0x00401000 main
/// 0x00402000 amx_Exec
/// ```
///
/// ## Example
///
/// ```rust
/// use crashinfo_core::symbols::{FunctionResolver, SymbolMap};
/// use crashinfo_core::types::Address;
///
/// let map: SymbolMap = "0x00401000 main\n0x00402000 amx_Exec\n".parse()?;
/// assert_eq!(map.resolve_function_name(Address::from(0x0040_2010)), Some("amx_Exec".to_string()));
/// assert_eq!(map.resolve_function_name(Address::from(0x0040_0fff)), None);
/// # Ok::<(), crashinfo_core::CrashInfoError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolMap
{
    symbols: BTreeMap<Address, String>,
}

impl SymbolMap
{
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Add a symbol starting at `address`, replacing any previous one there.
    pub fn insert(&mut self, address: Address, name: impl Into<String>)
    {
        self.symbols.insert(address, name.into());
    }

    #[must_use]
    pub fn len(&self) -> usize
    {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.symbols.is_empty()
    }

    /// Load a symbol map file.
    ///
    /// ## Errors
    ///
    /// Returns [`CrashInfoError::FileNotFound`] if `path` does not exist,
    /// [`CrashInfoError::SymbolMap`] for a malformed line.
    pub fn from_file(path: impl AsRef<Path>) -> CrashInfoResult<Self>
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => CrashInfoError::FileNotFound(path.to_path_buf()),
            _ => CrashInfoError::Io(err),
        })?;
        let map: SymbolMap = text.parse()?;
        debug!("Loaded {} symbols from {}", map.len(), path.display());
        Ok(map)
    }
}

impl std::str::FromStr for SymbolMap
{
    type Err = CrashInfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        let mut map = SymbolMap::new();

        for (index, line) in s.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (address, name) = line.split_once(char::is_whitespace).ok_or_else(|| CrashInfoError::SymbolMap {
                line: line_no,
                reason: "expected '<address> <name>'".to_string(),
            })?;

            let digits = address
                .strip_prefix("0x")
                .or_else(|| address.strip_prefix("0X"))
                .unwrap_or(address);
            let address = u32::from_str_radix(digits, 16).map_err(|err| CrashInfoError::SymbolMap {
                line: line_no,
                reason: format!("bad address '{address}': {err}"),
            })?;

            map.insert(Address::from(address), name.trim());
        }

        Ok(map)
    }
}

impl FunctionResolver for SymbolMap
{
    fn resolve_function_name(&self, address: Address) -> Option<String>
    {
        self.symbols
            .range(..=address)
            .next_back()
            .map(|(_, name)| name.clone())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_symbol_map_skips_comments_and_blank_lines()
    {
        let map: SymbolMap = "# header\n\n0x00401000 main\n".parse().unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_symbol_map_rejects_missing_name()
    {
        let err = "0x00401000\n".parse::<SymbolMap>().unwrap_err();
        assert!(matches!(err, CrashInfoError::SymbolMap { line: 1, .. }));
    }

    #[test]
    fn test_symbol_map_rejects_bad_address()
    {
        let err = "main 0x00401000\n".parse::<SymbolMap>().unwrap_err();
        assert!(matches!(err, CrashInfoError::SymbolMap { line: 1, .. }));
    }

    #[test]
    fn test_closure_resolver()
    {
        let resolver = |address: Address| (address.value() == 0x1000).then(|| "entry".to_string());
        assert_eq!(resolver.resolve_function_name(Address::from(0x1000)), Some("entry".to_string()));
        assert_eq!(resolver.resolve_function_name(Address::from(0x2000)), None);
    }
}
