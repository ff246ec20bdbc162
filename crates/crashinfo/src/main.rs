use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use crashinfo_core::report::{write_report, Sections};
use crashinfo_core::symbols::{FunctionResolver, SymbolMap};
use crashinfo_core::{parse_file, CrashInfoError};
use crashinfo_utils::{debug, init_logging, init_logging_with_level, log_format_from_env, LogLevel};

/// Print the contents of a SA-MP server crash report.
#[derive(Parser, Debug)]
#[command(name = "crashinfo")]
#[command(version)]
#[command(about = "Print version, registers, stack, modules and call stack from a server crash report", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Cli
{
    /// Crash report to read
    #[arg(short = 'f', long = "file", default_value = "crashinfo.txt")]
    file: PathBuf,
    /// Print server version
    #[arg(short = 'v', long = "server-version")]
    server_version: bool,
    /// Print registers
    #[arg(short = 'r', long)]
    registers: bool,
    /// Print raw stack
    #[arg(short = 's', long)]
    stack: bool,
    /// Print loaded modules
    #[arg(short = 'm', long)]
    modules: bool,
    /// Print call stack
    #[arg(short = 'c', long)]
    callstack: bool,
    /// Print all sections (the default when no section is selected)
    #[arg(short = 'a', long)]
    all: bool,
    /// Symbol map (`<hex address> <name>` per line) used to name call stack functions
    #[arg(long, value_name = "MAP")]
    symbols: Option<PathBuf>,
    /// Log level (overrides RUST_LOG)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

impl Cli
{
    fn sections(&self) -> Sections
    {
        let selected = Sections {
            version: self.server_version,
            registers: self.registers,
            stack: self.stack,
            modules: self.modules,
            call_stack: self.callstack,
        };

        if self.all || selected.is_empty() {
            Sections::all()
        } else {
            selected
        }
    }
}

fn main()
{
    let cli = Cli::parse();

    // Logs go to stderr; the guard flushes CRASHINFO_LOG_FILE on exit
    let logging = match cli.log_level {
        Some(level) => log_format_from_env().and_then(|format| init_logging_with_level(Some(level), format)),
        None => init_logging(),
    };
    let _guard = match logging {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CrashInfoError>
{
    let info = parse_file(&cli.file)?;
    debug!("Parsed {}", cli.file.display());

    let symbols = cli.symbols.as_ref().map(|path| SymbolMap::from_file(path)).transpose()?;
    let resolver = symbols.as_ref().map(|map| map as &dyn FunctionResolver);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&info, cli.sections(), resolver, &mut out)?;
    out.flush()?;

    Ok(())
}
