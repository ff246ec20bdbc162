//! Memory address type.

use std::fmt;
use std::ops::{Add, Sub};

/// Strongly typed 32-bit memory address
///
/// Crash reports are written by a 32-bit server process, so every address in
/// them (register values, stack words, module bounds) fits in a `u32`. This
/// wrapper keeps addresses from being mixed up with other integers such as
/// sizes or line numbers.
///
/// ## Example
///
/// ```rust
/// use crashinfo_core::types::Address;
///
/// let addr = Address::from(0x0040_1000);
/// let next_addr = addr + 0x100; // Add offset
/// assert_eq!(next_addr.value(), 0x0040_1100);
/// assert_eq!(addr.to_string(), "00401000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(u32);

impl Address
{
    /// The null address (0x0)
    pub const ZERO: Self = Address(0);

    /// Create a new address from a `u32` value
    ///
    /// This is equivalent to `Address::from(value)` but can be used in const contexts.
    ///
    /// ```rust
    /// use crashinfo_core::types::Address;
    ///
    /// const IMAGE_BASE: Address = Address::new(0x0040_0000);
    /// assert_eq!(IMAGE_BASE.value(), 0x0040_0000);
    /// ```
    #[must_use]
    pub const fn new(value: u32) -> Self
    {
        Address(value)
    }

    /// Get the raw `u32` value of this address
    #[must_use]
    pub const fn value(self) -> u32
    {
        self.0
    }

    /// Add an offset to this address, checking for overflow
    ///
    /// ```rust
    /// use crashinfo_core::types::Address;
    ///
    /// let addr = Address::from(0x1000);
    /// assert_eq!(addr.checked_add(0x100), Some(Address::from(0x1100)));
    /// assert_eq!(addr.checked_add(u32::MAX), None); // Overflow
    /// ```
    #[must_use]
    pub fn checked_add(self, offset: u32) -> Option<Self>
    {
        self.0.checked_add(offset).map(Address)
    }

    /// Subtract an offset from this address, checking for underflow
    #[must_use]
    pub fn checked_sub(self, offset: u32) -> Option<Self>
    {
        self.0.checked_sub(offset).map(Address)
    }

    /// Distance in bytes from `base` up to this address, if `base` is not above it
    ///
    /// ```rust
    /// use crashinfo_core::types::Address;
    ///
    /// let base = Address::from(0x0040_0000);
    /// assert_eq!(Address::from(0x0040_1234).offset_from(base), Some(0x1234));
    /// assert_eq!(base.offset_from(Address::from(0x0050_0000)), None);
    /// ```
    #[must_use]
    pub fn offset_from(self, base: Address) -> Option<u32>
    {
        self.0.checked_sub(base.0)
    }
}

impl From<u32> for Address
{
    fn from(value: u32) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u32
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

/// Formats as 8 lower-case hex digits with no prefix, the way the report
/// printer lays out every address column.
impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{:08x}", self.0)
    }
}

impl fmt::LowerHex for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl Add<u32> for Address
{
    type Output = Address;

    fn add(self, rhs: u32) -> Self::Output
    {
        Address(self.0.wrapping_add(rhs))
    }
}

impl Sub<u32> for Address
{
    type Output = Address;

    fn sub(self, rhs: u32) -> Self::Output
    {
        Address(self.0.wrapping_sub(rhs))
    }
}
