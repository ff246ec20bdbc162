//! Tests for crash report parsing and call stack resolution

use crashinfo_core::types::{Address, RegisterId};
use crashinfo_core::{parse, parse_file, parse_reader, parse_str, CrashInfo, CrashInfoError};

const SAMPLE: &str = include_str!("data/crashinfo.txt");

const MODULE_LINE: &str = "samp-server.exe\tA: 0x00400000 - 0x00410000\t(C:\\samp-server.exe)";

fn sample() -> CrashInfo
{
    parse_str(SAMPLE).expect("sample report parses")
}

#[test]
fn test_sample_version()
{
    assert_eq!(sample().version(), Some("0.3.7-R2"));
}

#[test]
fn test_sample_registers_in_order()
{
    let info = sample();
    let registers: Vec<_> = info.registers().iter().map(|reg| (reg.name(), reg.value())).collect();

    assert_eq!(
        registers,
        [
            ("eax", 0x0000_0000),
            ("ebx", 0x0019_ff2c),
            ("ecx", 0x0a3b_1c40),
            ("edx", 0x0000_0004),
            ("esi", 0x0a3b_1c40),
            ("edi", 0x0019_fe60),
            ("ebp", 0x0019_fe98),
            ("esp", 0x0019_fe50),
            ("eflags", 0x0001_0246),
        ]
    );
    assert_eq!(info.register(RegisterId::Esp), Some(0x0019_fe50));
}

#[test]
fn test_sample_stack_in_file_order()
{
    let info = sample();
    assert_eq!(info.stack().len(), 10);
    assert_eq!(info.stack()[0], 0x0a3b_1c40);
    assert_eq!(info.stack()[4], 0x0046_d1e0);
    assert_eq!(info.stack()[9], 0x0000_0000);
}

#[test]
fn test_sample_modules_in_order()
{
    let info = sample();
    let names: Vec<_> = info.modules().iter().map(|module| module.filename()).collect();
    assert_eq!(names, ["samp-server.exe", "streamer.dll", "kernel32.dll"]);

    let streamer = &info.modules()[1];
    assert_eq!(streamer.start(), Address::from(0x1000_0000));
    assert_eq!(streamer.end(), Address::from(0x1005_cfff));
    assert_eq!(streamer.path(), "C:\\samp03\\plugins\\streamer.dll");
}

#[test]
fn test_sample_call_stack()
{
    let info = sample();
    let frames: Vec<_> = info
        .call_stack()
        .map(|(address, module)| (address.value(), module.filename()))
        .collect();

    assert_eq!(
        frames,
        [
            (0x1000_5b11, "streamer.dll"),
            (0x0046_d1e0, "samp-server.exe"),
            (0x0046_c2a8, "samp-server.exe"),
            (0x7c80_b729, "kernel32.dll"),
        ]
    );
}

#[test]
fn test_eax_line_yields_four_registers()
{
    let info = parse([
        "Registers:",
        "EAX: 0x00000001 EBX: 0x00000002 ECX: 0x00000003 EDX: 0x00000004",
    ])
    .unwrap();

    let registers: Vec<_> = info.registers().iter().map(|reg| (reg.name(), reg.value())).collect();
    assert_eq!(registers, [("eax", 1), ("ebx", 2), ("ecx", 3), ("edx", 4)]);
}

#[test]
fn test_missing_register_is_omitted()
{
    let info = parse(["Registers:", "EAX: 0x00000001 ECX: 0x00000003 EDX: zzzz"]).unwrap();

    let names: Vec<_> = info.registers().iter().map(|reg| reg.name()).collect();
    assert_eq!(names, ["eax", "ecx"]);
}

#[test]
fn test_register_values_must_be_upper_case()
{
    let info = parse(["Registers:", "EFLAGS: 0x0001024a"]).unwrap();
    assert!(info.registers().is_empty());
}

#[test]
fn test_other_register_lines_ignored()
{
    let info = parse(["Registers:", "EIP: 0x00401000", "EBX: 0x00000002"]).unwrap();
    assert!(info.registers().is_empty());
}

#[test]
fn test_stack_line()
{
    let info = parse(["Stack:", "+0000: 00401000 00402000"]).unwrap();
    assert_eq!(info.stack(), [0x0040_1000, 0x0040_2000]);
}

#[test]
fn test_stack_skips_lines_without_marker()
{
    let info = parse(["Stack:", "", "+0000: 00401000", "end of dump", "+0004: 00402000"]).unwrap();
    assert_eq!(info.stack(), [0x0040_1000, 0x0040_2000]);
}

#[test]
fn test_module_line()
{
    let info = parse(["Loaded Modules:", MODULE_LINE, "not a module"]).unwrap();

    assert_eq!(info.modules().len(), 1);
    let module = &info.modules()[0];
    assert_eq!(module.filename(), "samp-server.exe");
    assert_eq!(module.location(), (Address::from(0x0040_0000), Address::from(0x0041_0000)));
    assert_eq!(module.path(), "C:\\samp-server.exe");
}

#[test]
fn test_find_module()
{
    let info = parse(["Stack:", "+0000: 00401000", "Loaded Modules:", MODULE_LINE]).unwrap();

    let module = info.find_module(Address::from(0x0040_1000)).unwrap();
    assert_eq!(module.filename(), "samp-server.exe");
    assert!(info.find_module(Address::from(0x0050_0000)).is_none());
}

#[test]
fn test_call_stack_skips_unmapped_words()
{
    let info = parse(["Stack:", "+0000: 00401000 00500000", "Loaded Modules:", MODULE_LINE]).unwrap();

    let frames: Vec<_> = info.call_stack().collect();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].0, Address::from(0x0040_1000));
    assert_eq!(frames[0].1, &info.modules()[0]);
}

#[test]
fn test_call_stack_is_restartable()
{
    let info = sample();
    let first: Vec<_> = info.call_stack().collect();
    let second: Vec<_> = info.call_stack().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[test]
fn test_invalid_stack_word_fails()
{
    let err = parse(["Stack:", "+0000: ZZZZZZZZ"]).unwrap_err();
    match err {
        CrashInfoError::InvalidHex { line, value, .. } => {
            assert_eq!(line, 2);
            assert_eq!(value, "ZZZZZZZZ");
        }
        other => panic!("Expected InvalidHex, got {other:?}"),
    }
}

#[test]
fn test_oversized_stack_word_fails()
{
    let err = parse(["Stack:", "+0000: 100000000"]).unwrap_err();
    assert!(matches!(err, CrashInfoError::InvalidHex { line: 2, .. }));
}

#[test]
fn test_section_order_does_not_matter()
{
    let info = parse([
        "Loaded Modules:",
        MODULE_LINE,
        "Stack:",
        "+0000: 00401000",
        "Registers:",
        "EFLAGS: 0x00000202",
    ])
    .unwrap();

    assert_eq!(info.modules().len(), 1);
    assert_eq!(info.stack(), [0x0040_1000]);
    assert_eq!(info.register(RegisterId::Eflags), Some(0x202));
}

#[test]
fn test_version_line_ends_section()
{
    let info = parse([
        "Stack:",
        "+0000: 00401000",
        "SA-MP Server: 0.3z-R4",
        "+0004: 00402000",
    ])
    .unwrap();

    assert_eq!(info.version(), Some("0.3z-R4"));
    assert_eq!(info.stack(), [0x0040_1000]);
}

#[test]
fn test_later_version_wins()
{
    let info = parse(["SA-MP Server: 0.3.7", "SA-MP Server: 0.3.7-R2"]).unwrap();
    assert_eq!(info.version(), Some("0.3.7-R2"));
}

#[test]
fn test_version_requires_token()
{
    let info = parse(["SA-MP Server:"]).unwrap();
    assert_eq!(info.version(), None);
}

#[test]
fn test_header_line_is_not_parsed()
{
    let info = parse(["Stack: +0000: 00401000"]).unwrap();
    assert!(info.stack().is_empty());
}

#[test]
fn test_crlf_line_endings()
{
    let report = SAMPLE.replace('\n', "\r\n");
    let info = parse_str(&report).unwrap();
    assert_eq!(info, sample());
}

#[test]
fn test_parse_reader_and_from_str_agree()
{
    let from_reader = parse_reader(SAMPLE.as_bytes()).unwrap();
    let from_str: CrashInfo = SAMPLE.parse().unwrap();
    assert_eq!(from_reader, from_str);
}

#[test]
fn test_parse_file()
{
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/crashinfo.txt");
    assert_eq!(parse_file(path).unwrap(), sample());
}

#[test]
fn test_parse_file_not_found()
{
    let err = parse_file("does/not/exist/crashinfo.txt").unwrap_err();
    assert!(matches!(err, CrashInfoError::FileNotFound(_)));
}

#[test]
fn test_empty_input()
{
    let info = parse_str("").unwrap();
    assert_eq!(info, CrashInfo::new());
}
