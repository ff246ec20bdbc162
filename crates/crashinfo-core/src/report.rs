//! Plain text rendering of a parsed crash report.

use std::io::{self, Write};

use crate::crash_info::CrashInfo;
use crate::symbols::FunctionResolver;

/// Which parts of a crash report to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Sections
{
    pub version: bool,
    pub registers: bool,
    pub stack: bool,
    pub modules: bool,
    pub call_stack: bool,
}

impl Sections
{
    /// Every section enabled.
    #[must_use]
    pub const fn all() -> Self
    {
        Self {
            version: true,
            registers: true,
            stack: true,
            modules: true,
            call_stack: true,
        }
    }

    /// Returns `true` if no section is selected.
    #[must_use]
    pub const fn is_empty(&self) -> bool
    {
        !(self.version || self.registers || self.stack || self.modules || self.call_stack)
    }
}

/// Write the selected sections of `info` to `out`
///
/// Sections are always written in the same order: version, registers,
/// stack, modules, call stack. When a `resolver` is given, the call stack
/// lists only frames it can name, as `address in module!function`.
///
/// ## Example
///
/// ```rust
/// use crashinfo_core::parse_str;
/// use crashinfo_core::report::{write_report, Sections};
///
/// let info = parse_str("SA-MP Server: 0.3.7-R2\n")?;
/// let sections = Sections { version: true, ..Sections::default() };
///
/// let mut out = Vec::new();
/// write_report(&info, sections, None, &mut out)?;
/// assert_eq!(String::from_utf8(out).unwrap(), "Server version:\n  0.3.7-R2\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// ## Errors
///
/// Returns any error from writing to `out`.
pub fn write_report<W: Write>(
    info: &CrashInfo,
    sections: Sections,
    resolver: Option<&dyn FunctionResolver>,
    out: &mut W,
) -> io::Result<()>
{
    if sections.version {
        writeln!(out, "Server version:")?;
        writeln!(out, "  {}", info.version().unwrap_or("unknown"))?;
    }

    if sections.registers {
        writeln!(out, "Registers:")?;
        for reg in info.registers() {
            writeln!(out, "  {} = {:08x}", reg.name(), reg.value())?;
        }
    }

    if sections.stack {
        writeln!(out, "Stack:")?;
        for word in info.stack() {
            writeln!(out, "  {word:08x}")?;
        }
    }

    if sections.modules {
        writeln!(out, "Modules:")?;
        for module in info.modules() {
            writeln!(out, "  {module}")?;
        }
    }

    if sections.call_stack {
        writeln!(out, "Call stack:")?;
        match resolver {
            Some(resolver) => {
                for (address, module, name) in info.symbolicate(resolver) {
                    writeln!(out, "  {address} in {}!{name}", module.filename())?;
                }
            }
            None => {
                for (address, module) in info.call_stack() {
                    writeln!(out, "  {address} in {}", module.filename())?;
                }
            }
        }
    }

    Ok(())
}
