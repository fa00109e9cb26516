//! GVM CLI — execute bytecode, compile expressions, disassemble.
//!
//! Exit codes:
//! - 0: Success (for `run`: the machine terminated with status OK)
//! - 1: Input/compile/decode error
//! - 1..=8: For `run`, the machine's fault status code

mod commands;

use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "expr" => commands::expr(&args[2..]),
        "disasm" => commands::disasm(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: gvm <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <bytecode-file> [--limit N]   Execute bytecode (default limit 50000)");
    eprintln!("  expr <expression>                 Compile an infix expression to a stack program");
    eprintln!("  disasm <bytecode-file>            Disassemble bytecode to labeled text");
}
