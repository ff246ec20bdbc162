//! CPU register types.

use std::fmt;
use std::str::FromStr;

/// Identifier for a 32-bit x86 register recorded in a crash report
///
/// The server writes its register dump on three lines:
///
/// ```text
/// EAX: 0x00000001 EBX: 0x00000002 ECX: 0x00000003 EDX: 0x00000004
/// ESI: 0x00000005 EDI: 0x00000006 EBP: 0x0019FF70 ESP: 0x0019FF40
/// EFLAGS: 0x00010246
/// ```
///
/// Each variant knows the label it is written under (`EAX`) and the
/// lower-case name it is reported as (`eax`).
///
/// ## Example
///
/// ```rust
/// use crashinfo_core::types::RegisterId;
///
/// assert_eq!(RegisterId::Esp.name(), "esp");
/// assert_eq!(RegisterId::Esp.label(), "ESP");
/// assert_eq!("eflags".parse::<RegisterId>(), Ok(RegisterId::Eflags));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterId
{
    /// EAX - Accumulator register
    Eax,
    /// EBX - Base register
    Ebx,
    /// ECX - Counter register
    Ecx,
    /// EDX - Data register
    Edx,
    /// ESI - Source index register
    Esi,
    /// EDI - Destination index register
    Edi,
    /// EBP - Frame (base) pointer
    Ebp,
    /// ESP - Stack pointer
    Esp,
    /// EFLAGS - Status/flags register
    Eflags,
}

impl RegisterId
{
    /// All registers in the order a crash report lists them.
    pub const ALL: [RegisterId; 9] = [
        RegisterId::Eax,
        RegisterId::Ebx,
        RegisterId::Ecx,
        RegisterId::Edx,
        RegisterId::Esi,
        RegisterId::Edi,
        RegisterId::Ebp,
        RegisterId::Esp,
        RegisterId::Eflags,
    ];

    /// Lower-case name used when reporting the register.
    #[must_use]
    pub const fn name(self) -> &'static str
    {
        match self {
            RegisterId::Eax => "eax",
            RegisterId::Ebx => "ebx",
            RegisterId::Ecx => "ecx",
            RegisterId::Edx => "edx",
            RegisterId::Esi => "esi",
            RegisterId::Edi => "edi",
            RegisterId::Ebp => "ebp",
            RegisterId::Esp => "esp",
            RegisterId::Eflags => "eflags",
        }
    }

    /// Upper-case label the register is written under in the report.
    #[must_use]
    pub const fn label(self) -> &'static str
    {
        match self {
            RegisterId::Eax => "EAX",
            RegisterId::Ebx => "EBX",
            RegisterId::Ecx => "ECX",
            RegisterId::Edx => "EDX",
            RegisterId::Esi => "ESI",
            RegisterId::Edi => "EDI",
            RegisterId::Ebp => "EBP",
            RegisterId::Esp => "ESP",
            RegisterId::Eflags => "EFLAGS",
        }
    }
}

impl fmt::Display for RegisterId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.name())
    }
}

impl FromStr for RegisterId
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        RegisterId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown register: {s}"))
    }
}

/// A single register value captured in a crash report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register
{
    id: RegisterId,
    value: u32,
}

impl Register
{
    /// Create a register entry.
    #[must_use]
    pub const fn new(id: RegisterId, value: u32) -> Self
    {
        Self { id, value }
    }

    #[must_use]
    pub const fn id(&self) -> RegisterId
    {
        self.id
    }

    /// Lower-case register name, e.g. `"eax"`.
    #[must_use]
    pub const fn name(&self) -> &'static str
    {
        self.id.name()
    }

    #[must_use]
    pub const fn value(&self) -> u32
    {
        self.value
    }
}

impl fmt::Display for Register
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{} = {:08x}", self.name(), self.value)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_register_id_from_str()
    {
        assert_eq!(RegisterId::from_str("eax").unwrap(), RegisterId::Eax);
        assert_eq!(RegisterId::from_str("EFLAGS").unwrap(), RegisterId::Eflags);
        assert!(RegisterId::from_str("rax").is_err());
    }

    #[test]
    fn test_register_display()
    {
        let reg = Register::new(RegisterId::Ebp, 0x0019_ff70);
        assert_eq!(reg.to_string(), "ebp = 0019ff70");
    }
}
