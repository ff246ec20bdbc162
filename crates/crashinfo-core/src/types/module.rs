//! Loaded module (executable or plugin image) types.

use std::fmt;

use super::Address;

/// An executable or library image that was loaded when the server crashed
///
/// Modules come from the `Loaded Modules:` section of a crash report, one
/// per line:
///
/// ```text
/// samp-server.exe	A: 0x00400000 - 0x004F4FFF	(C:\server\samp-server.exe)
/// ```
///
/// The address range is inclusive at both ends, matching how the server
/// writes it.
///
/// ## Example
///
/// ```rust
/// use crashinfo_core::types::{Address, Module};
///
/// let module = Module::new(
///     "samp-server.exe".to_string(),
///     Address::from(0x0040_0000),
///     Address::from(0x0041_0000),
///     "C:\\samp-server.exe".to_string(),
/// );
///
/// assert!(module.contains(Address::from(0x0040_1000)));
/// assert!(module.contains(Address::from(0x0041_0000))); // end is inclusive
/// assert!(!module.contains(Address::from(0x0050_0000)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module
{
    filename: String,
    start: Address,
    end: Address,
    path: String,
}

impl Module
{
    /// Create a module entry
    ///
    /// The bounds are not validated. A module whose `end` is below its
    /// `start` contains no address and has size 0.
    #[must_use]
    pub fn new(filename: String, start: Address, end: Address, path: String) -> Self
    {
        Self {
            filename,
            start,
            end,
            path,
        }
    }

    /// File name of the image, e.g. `"streamer.dll"`.
    #[must_use]
    pub fn filename(&self) -> &str
    {
        &self.filename
    }

    /// First address of the image.
    #[must_use]
    pub const fn start(&self) -> Address
    {
        self.start
    }

    /// Last address of the image (inclusive).
    #[must_use]
    pub const fn end(&self) -> Address
    {
        self.end
    }

    /// `(start, end)` pair, both inclusive.
    #[must_use]
    pub const fn location(&self) -> (Address, Address)
    {
        (self.start, self.end)
    }

    /// Full on-disk path of the image.
    #[must_use]
    pub fn path(&self) -> &str
    {
        &self.path
    }

    /// Returns `true` if `address` lies within `[start, end]`.
    #[must_use]
    pub fn contains(&self, address: Address) -> bool
    {
        self.start <= address && address <= self.end
    }

    /// Number of bytes covered by the inclusive range, or 0 if `end < start`.
    #[must_use]
    pub fn size(&self) -> u64
    {
        match self.end.offset_from(self.start) {
            Some(distance) => u64::from(distance) + 1,
            None => 0,
        }
    }
}

impl fmt::Display for Module
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{} [{}, {}] ({})", self.filename, self.start, self.end, self.path)
    }
}
