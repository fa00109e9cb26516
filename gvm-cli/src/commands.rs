//! CLI command implementations.

use std::fs;

use gvm_common::Program;
use gvm_vm::{Machine, DEFAULT_OP_LIMIT, IO_SIZE, REG_COUNT};

/// Execute a bytecode file against a zeroed memory.
pub fn run(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: run requires a bytecode file");
        eprintln!("Usage: gvm run <bytecode-file> [--limit N]");
        return Err(1);
    }

    let input = &args[0];
    let limit = parse_limit_flag(&args[1..])?;
    let program = read_program(input)?;

    let mut code = program.into_bytes();
    let mut io = [0u64; IO_SIZE];
    let mut vm = Machine::new(&mut code, &mut io);

    let result = vm.run(limit);
    let status = vm.status_code();
    let count = vm.count();
    let opcode = vm.last_opcode();
    drop(vm);

    match result {
        Ok(()) => println!("ok: {count} instructions, last opcode {opcode:#04x}"),
        Err(e) => eprintln!("runtime error: {e}"),
    }
    print!("{}", format_memory(&io));

    if status == 0 {
        Ok(())
    } else {
        Err(status as i32)
    }
}

/// Compile an infix expression to a symbolic stack program.
///
/// The expression may span multiple argv entries; they are joined with
/// spaces.
pub fn expr(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: expr requires an expression");
        eprintln!("Usage: gvm expr <expression>");
        return Err(1);
    }

    let source = args.join(" ");
    let program = gvm_expr::compile(&source).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    print!("{}", gvm_expr::render(&program, gvm_expr::Separator::Newline));
    Ok(())
}

/// Disassemble a bytecode file to labeled text.
pub fn disasm(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: disasm requires a bytecode file");
        eprintln!("Usage: gvm disasm <bytecode-file>");
        return Err(1);
    }

    let input = &args[0];
    let program = read_program(input)?;

    let text = gvm_disasm::disassemble(program.as_bytes()).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    print!("{text}");
    Ok(())
}

// --- Helpers ---

/// Read and validate a bytecode file.
fn read_program(path: &str) -> Result<Program, i32> {
    let bytes = fs::read(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;

    Program::from_bytes(bytes).map_err(|e| {
        eprintln!("error: invalid bytecode: {e}");
        1
    })
}

/// Parse the --limit flag (default 50,000 instructions).
fn parse_limit_flag(args: &[String]) -> Result<u64, i32> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--limit" {
            if i + 1 < args.len() {
                return args[i + 1].parse::<u64>().map_err(|_| {
                    eprintln!("error: --limit value must be a non-negative integer");
                    1
                });
            }
            eprintln!("error: --limit requires a value");
            return Err(1);
        }
        i += 1;
    }
    Ok(DEFAULT_OP_LIMIT)
}

/// Render the post-run memory: registers always (starred), other cells only
/// when non-zero, elided zero runs shown as `...`.
fn format_memory(io: &[u64; IO_SIZE]) -> String {
    let mut out = String::new();
    let mut skipped = false;

    for (i, &v) in io.iter().enumerate() {
        if v > 0 || i < REG_COUNT {
            if skipped {
                skipped = false;
                out.push_str("...\n");
            }
            let star = if i < REG_COUNT { "*" } else { "" };
            if v == u64::MAX {
                out.push_str(&format!("{star}io[{i}] = (u64::MAX)\n"));
            } else {
                out.push_str(&format!("{star}io[{i}] = {v}\n"));
            }
        } else {
            skipped = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- parse_limit_flag ---

    #[test]
    fn limit_defaults() {
        assert_eq!(parse_limit_flag(&[]), Ok(DEFAULT_OP_LIMIT));
    }

    #[test]
    fn limit_parses_value() {
        let args = vec!["--limit".to_string(), "123".to_string()];
        assert_eq!(parse_limit_flag(&args), Ok(123));
    }

    #[test]
    fn limit_rejects_garbage() {
        let args = vec!["--limit".to_string(), "many".to_string()];
        assert_eq!(parse_limit_flag(&args), Err(1));
    }

    #[test]
    fn limit_requires_value() {
        let args = vec!["--limit".to_string()];
        assert_eq!(parse_limit_flag(&args), Err(1));
    }

    // --- format_memory ---

    #[test]
    fn registers_always_print_starred() {
        let io = [0u64; IO_SIZE];
        let text = format_memory(&io);
        assert!(text.starts_with("*io[0] = 0\n"));
        assert!(text.contains("*io[7] = 0\n"));
        assert!(!text.contains("io[8]"));
    }

    #[test]
    fn nonzero_cells_print_with_elision_marker() {
        let mut io = [0u64; IO_SIZE];
        io[100] = 42;
        let text = format_memory(&io);
        assert!(text.contains("...\nio[100] = 42\n"));
    }

    #[test]
    fn trailing_zero_run_prints_nothing() {
        let mut io = [0u64; IO_SIZE];
        io[100] = 42;
        let text = format_memory(&io);
        assert!(text.ends_with("io[100] = 42\n"));
    }

    #[test]
    fn u64_max_prints_symbolically() {
        let mut io = [0u64; IO_SIZE];
        io[0] = u64::MAX;
        let text = format_memory(&io);
        assert!(text.starts_with("*io[0] = (u64::MAX)\n"));
    }
}
