//! Single-pass crash report scanner.
//!
//! A crash report is plain text split into sections by header lines:
//!
//! ```text
//! SA-MP Server: 0.3.7-R2
//! ...
//! Registers:
//! EAX: 0x00000001 EBX: 0x00000002 ECX: 0x00000003 EDX: 0x00000004
//! ESI: 0x00000005 EDI: 0x00000006 EBP: 0x0019FF70 ESP: 0x0019FF40
//! EFLAGS: 0x00010246
//! Stack:
//! +0000: 00401000 00402000 0019FF70 004A1B2C
//! Loaded Modules:
//! samp-server.exe	A: 0x00400000 - 0x004F4FFF	(C:\server\samp-server.exe)
//! ```
//!
//! The scanner remembers which section it is in and hands each line to that
//! section's parser. Lines that do not have the shape a section expects are
//! skipped. A line that has the right shape but carries a value that is not
//! hexadecimal fails the whole parse with [`CrashInfoError::InvalidHex`].

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::crash_info::CrashInfo;
use crate::error::{CrashInfoError, CrashInfoResult};
use crate::types::{Address, Module, Register, RegisterId};

/// Prefix of the line identifying the server build; also ends any section.
pub const VERSION_PREFIX: &str = "SA-MP Server:";
const REGISTERS_HEADER: &str = "Registers:";
const STACK_HEADER: &str = "Stack:";
const MODULES_HEADER: &str = "Loaded Modules:";

/// Width of the `+XXXX:` offset marker that starts a stack line.
const STACK_MARKER_WIDTH: usize = 6;

static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^SA-MP Server: (?P<version>[0-9A-Za-z.-]+)").expect("version pattern is valid"));

static STACK_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[0-9a-fA-F]{4}:").expect("stack pattern is valid"));

static MODULE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.+)\tA: (?P<start>0x[0-9A-F]{8}) - (?P<end>0x[0-9A-F]{8})\t\((?P<path>.+)\)")
        .expect("module pattern is valid")
});

static REGISTER_PATTERNS: Lazy<Vec<(RegisterId, Regex)>> = Lazy::new(|| {
    RegisterId::ALL
        .into_iter()
        .map(|id| {
            let pattern = format!(r"{}: (?P<value>0x[0-9A-F]{{8}})", id.label());
            (id, Regex::new(&pattern).expect("register pattern is valid"))
        })
        .collect()
});

/// Registers written on each of the three register dump lines, keyed by the
/// line's leading label.
const REGISTER_LINES: &[(&str, &[RegisterId])] = &[
    (
        "EAX:",
        &[RegisterId::Eax, RegisterId::Ebx, RegisterId::Ecx, RegisterId::Edx],
    ),
    (
        "ESI:",
        &[RegisterId::Esi, RegisterId::Edi, RegisterId::Ebp, RegisterId::Esp],
    ),
    ("EFLAGS", &[RegisterId::Eflags]),
];

/// Section of the report the scanner is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section
{
    /// Outside any recognised section (start of file, or after a version line)
    None,
    /// Register dump lines
    Registers,
    /// Raw stack words
    Stack,
    /// Loaded module table
    Modules,
}

impl Section
{
    /// Section entered by `line`, if it is a header
    ///
    /// The second element is `true` when the header line itself carries no
    /// data. The version line resets the section but is still parsed for the
    /// version token.
    #[must_use]
    pub fn transition(line: &str) -> Option<(Section, bool)>
    {
        if line.starts_with(VERSION_PREFIX) {
            Some((Section::None, false))
        } else if line.starts_with(REGISTERS_HEADER) {
            Some((Section::Registers, true))
        } else if line.starts_with(STACK_HEADER) {
            Some((Section::Stack, true))
        } else if line.starts_with(MODULES_HEADER) {
            Some((Section::Modules, true))
        } else {
            None
        }
    }
}

/// Parse a crash report from a sequence of lines
///
/// Accepts anything that yields string-like lines: a `Vec<String>`, the
/// result of `str::lines()`, and so on. Trailing newlines are tolerated.
///
/// ## Errors
///
/// Returns [`CrashInfoError::InvalidHex`] if a stack word, register value or
/// module address that must be hexadecimal is not, or does not fit in 32 bits.
pub fn parse<I, S>(lines: I) -> CrashInfoResult<CrashInfo>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut info = CrashInfo::new();
    let mut section = Section::None;

    for (index, line) in lines.into_iter().enumerate() {
        let line_no = index + 1;
        let line = line.as_ref().trim_end_matches(['\r', '\n']);

        if let Some((next, is_header)) = Section::transition(line) {
            if next != section {
                debug!("Line {line_no}: entering section {next:?}");
            }
            section = next;
            if is_header {
                continue;
            }
        }

        match section {
            Section::None => parse_version(&mut info, line),
            Section::Registers => parse_registers(&mut info, line, line_no)?,
            Section::Stack => parse_stack(&mut info, line, line_no)?,
            Section::Modules => parse_module(&mut info, line, line_no)?,
        }
    }

    debug!(
        "Parsed crash report: version={:?}, {} registers, {} stack words, {} modules",
        info.version(),
        info.registers().len(),
        info.stack().len(),
        info.modules().len()
    );

    Ok(info)
}

/// Parse a crash report held in memory.
///
/// ## Errors
///
/// See [`parse`].
pub fn parse_str(report: &str) -> CrashInfoResult<CrashInfo>
{
    parse(report.lines())
}

/// Parse a crash report from any reader
///
/// The whole input is read up front. Bytes that are not valid UTF-8 (module
/// paths are often written in the server's ANSI code page) are replaced
/// rather than rejected.
///
/// ## Errors
///
/// Returns [`CrashInfoError::Io`] if reading fails, otherwise see [`parse`].
pub fn parse_reader<R: Read>(mut reader: R) -> CrashInfoResult<CrashInfo>
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_str(&String::from_utf8_lossy(&bytes))
}

/// Open and parse a crash report file.
///
/// ## Errors
///
/// Returns [`CrashInfoError::FileNotFound`] if `path` does not exist,
/// [`CrashInfoError::Io`] for other read failures, otherwise see [`parse`].
pub fn parse_file(path: impl AsRef<Path>) -> CrashInfoResult<CrashInfo>
{
    let path = path.as_ref();
    debug!("Reading crash report from {}", path.display());

    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => CrashInfoError::FileNotFound(path.to_path_buf()),
        _ => CrashInfoError::Io(err),
    })?;
    parse_reader(file)
}

impl FromStr for CrashInfo
{
    type Err = CrashInfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        parse_str(s)
    }
}

/// Parse a hexadecimal 32-bit value, with or without a `0x` prefix.
fn parse_hex(token: &str, line_no: usize) -> CrashInfoResult<u32>
{
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);

    u32::from_str_radix(digits, 16).map_err(|source| CrashInfoError::InvalidHex {
        line: line_no,
        value: token.to_string(),
        source,
    })
}

fn parse_version(info: &mut CrashInfo, line: &str)
{
    if let Some(captures) = VERSION_PATTERN.captures(line) {
        let version = &captures["version"];
        trace!("Server version: {version}");
        info.set_version(version.to_string());
    }
}

fn parse_registers(info: &mut CrashInfo, line: &str, line_no: usize) -> CrashInfoResult<()>
{
    let Some((_, ids)) = REGISTER_LINES.iter().find(|(prefix, _)| line.starts_with(prefix)) else {
        return Ok(());
    };

    for &id in *ids {
        // A register missing from its line is left out rather than defaulted.
        if let Some(value) = search_register(id, line) {
            let value = parse_hex(value, line_no)?;
            trace!("Register {id} = {value:08x}");
            info.add_register(Register::new(id, value));
        }
    }

    Ok(())
}

fn search_register(id: RegisterId, line: &str) -> Option<&str>
{
    let (_, pattern) = REGISTER_PATTERNS.iter().find(|(candidate, _)| *candidate == id)?;
    pattern
        .captures(line)
        .and_then(|captures| captures.name("value"))
        .map(|value| value.as_str())
}

fn parse_stack(info: &mut CrashInfo, line: &str, line_no: usize) -> CrashInfoResult<()>
{
    if !STACK_PATTERN.is_match(line) {
        return Ok(());
    }

    let words = line.get(STACK_MARKER_WIDTH..).unwrap_or_default();
    for word in words.split_whitespace() {
        let value = parse_hex(word, line_no)?;
        trace!("Stack word {value:08x}");
        info.add_stack(value);
    }

    Ok(())
}

fn parse_module(info: &mut CrashInfo, line: &str, line_no: usize) -> CrashInfoResult<()>
{
    let Some(captures) = MODULE_PATTERN.captures(line) else {
        return Ok(());
    };

    let start = parse_hex(&captures["start"], line_no)?;
    let end = parse_hex(&captures["end"], line_no)?;
    let module = Module::new(
        captures["name"].to_string(),
        Address::from(start),
        Address::from(end),
        captures["path"].to_string(),
    );
    trace!("Module {module}");
    info.add_module(module);

    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_section_transition()
    {
        assert_eq!(Section::transition("Registers:"), Some((Section::Registers, true)));
        assert_eq!(Section::transition("Stack:"), Some((Section::Stack, true)));
        assert_eq!(Section::transition("Loaded Modules:"), Some((Section::Modules, true)));
        assert_eq!(
            Section::transition("SA-MP Server: 0.3.7-R2"),
            Some((Section::None, false))
        );
        assert_eq!(Section::transition("EAX: 0x00000000"), None);
    }

    #[test]
    fn test_parse_hex()
    {
        assert_eq!(parse_hex("00401000", 1).unwrap(), 0x0040_1000);
        assert_eq!(parse_hex("0x0019FF70", 1).unwrap(), 0x0019_ff70);
        assert_eq!(parse_hex("deadbeef", 1).unwrap(), 0xdead_beef);
        assert!(parse_hex("ZZZZZZZZ", 1).is_err());
        assert!(parse_hex("100000000", 1).is_err());
        assert!(parse_hex("0x", 1).is_err());
    }

    #[test]
    fn test_search_register()
    {
        let line = "ESI: 0x00000005 EDI: 0x00000006 EBP: 0x0019FF70 ESP: 0x0019FF40";
        assert_eq!(search_register(RegisterId::Ebp, line), Some("0x0019FF70"));
        assert_eq!(search_register(RegisterId::Eax, line), None);
    }

    #[test]
    fn test_stack_marker_requires_four_hex_digits()
    {
        let info = parse(["Stack:", "+00G0: 00401000", "+001: 00401000"]).unwrap();
        assert!(info.stack().is_empty());
    }
}
