//! The aggregate record built from one crash report.

use crate::symbols::FunctionResolver;
use crate::types::{Address, Module, Register, RegisterId};

/// Everything extracted from a single crash report
///
/// A `CrashInfo` is filled in line by line by the parser and is read-only
/// afterwards. All sequences keep the order in which they appear in the
/// report.
///
/// ## Example
///
/// ```rust
/// use crashinfo_core::parse_str;
///
/// let report = "\
/// Stack:
/// +0000: 00401000 00500000
/// Loaded Modules:
/// samp-server.exe\tA: 0x00400000 - 0x00410000\t(C:\\samp-server.exe)
/// ";
///
/// let info = parse_str(report)?;
/// let frames: Vec<_> = info.call_stack().collect();
/// assert_eq!(frames.len(), 1);
/// assert_eq!(frames[0].0.value(), 0x0040_1000);
/// assert_eq!(frames[0].1.filename(), "samp-server.exe");
/// # Ok::<(), crashinfo_core::CrashInfoError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrashInfo
{
    version: Option<String>,
    registers: Vec<Register>,
    stack: Vec<u32>,
    modules: Vec<Module>,
}

impl CrashInfo
{
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    pub(crate) fn set_version(&mut self, version: String)
    {
        self.version = Some(version);
    }

    pub(crate) fn add_register(&mut self, register: Register)
    {
        self.registers.push(register);
    }

    pub(crate) fn add_stack(&mut self, word: u32)
    {
        self.stack.push(word);
    }

    pub(crate) fn add_module(&mut self, module: Module)
    {
        self.modules.push(module);
    }

    /// Server version string, if the report contained one.
    #[must_use]
    pub fn version(&self) -> Option<&str>
    {
        self.version.as_deref()
    }

    /// Registers in report order (eax, ebx, ecx, edx, esi, edi, ebp, esp, eflags
    /// when present).
    #[must_use]
    pub fn registers(&self) -> &[Register]
    {
        &self.registers
    }

    /// Value of a single register, if it was recorded.
    #[must_use]
    pub fn register(&self, id: RegisterId) -> Option<u32>
    {
        self.registers.iter().find(|reg| reg.id() == id).map(Register::value)
    }

    /// Raw stack words, top of the dump first.
    #[must_use]
    pub fn stack(&self) -> &[u32]
    {
        &self.stack
    }

    /// Loaded modules in declaration order.
    #[must_use]
    pub fn modules(&self) -> &[Module]
    {
        &self.modules
    }

    /// First module, in declaration order, whose inclusive range contains `address`
    ///
    /// Overlapping ranges are not an error: the earliest declared module wins.
    #[must_use]
    pub fn find_module(&self, address: Address) -> Option<&Module>
    {
        self.modules.iter().find(|module| module.contains(address))
    }

    /// Stack words that point into a loaded module, paired with that module
    ///
    /// Words that fall outside every module are skipped. The iterator is lazy
    /// and borrows the record, so calling this again starts over from the top
    /// of the stack.
    pub fn call_stack(&self) -> impl Iterator<Item = (Address, &Module)> + '_
    {
        self.stack.iter().filter_map(move |&word| {
            let address = Address::from(word);
            self.find_module(address).map(|module| (address, module))
        })
    }

    /// Call stack frames whose function name `resolver` can resolve
    ///
    /// Frames the resolver knows nothing about are skipped.
    pub fn symbolicate<'a, R>(&'a self, resolver: &'a R) -> impl Iterator<Item = (Address, &'a Module, String)> + 'a
    where
        R: FunctionResolver + ?Sized,
    {
        self.call_stack().filter_map(move |(address, module)| {
            resolver
                .resolve_function_name(address)
                .map(|name| (address, module, name))
        })
    }
}
