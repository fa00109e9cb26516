//! Integration tests for the GVM CLI.
//!
//! These tests invoke the `gvm` binary as a subprocess and check exit
//! codes, stdout, and stderr.

use assert_cmd::Command;
use gvm_common::{CodeBuilder, Opcode};
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn gvm() -> Command {
    Command::cargo_bin("gvm").unwrap()
}

/// Write bytecode into the temp dir and return its path.
fn write_bytecode(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

// ---- No-args / help ----

#[test]
fn no_args_prints_usage_and_exits_1() {
    gvm()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage: gvm"));
}

#[test]
fn help_flag_exits_0() {
    gvm()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Commands:"));
}

#[test]
fn unknown_command_exits_1() {
    gvm()
        .arg("frobnicate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown command"));
}

// ---- expr ----

#[test]
fn expr_compiles_to_newline_separated_program() {
    gvm()
        .args(["expr", "1+2*3"])
        .assert()
        .success()
        .stdout("PUSH 1\nPUSH 2\nPUSH 3\nMUL\nADD\n");
}

#[test]
fn expr_joins_multiple_arguments_with_spaces() {
    gvm()
        .args(["expr", "1", "+", "2"])
        .assert()
        .success()
        .stdout("PUSH 1\nPUSH 2\nADD\n");
}

#[test]
fn expr_cell_reference() {
    gvm()
        .args(["expr", "~@4"])
        .assert()
        .success()
        .stdout("PUSH @4\nNEG\n");
}

#[test]
fn expr_parse_error_exits_1() {
    gvm()
        .args(["expr", "-1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn expr_without_arguments_exits_1() {
    gvm()
        .arg("expr")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("requires an expression"));
}

// ---- run ----

#[test]
fn run_arithmetic_program() {
    let dir = TempDir::new().unwrap();
    let mut b = CodeBuilder::new();
    b.op(Opcode::Set).value(3).value(5);
    b.op(Opcode::Set).value(4).value(7);
    b.op(Opcode::Add).cell(3).cell(4);
    let path = write_bytecode(&dir, "sum.gbc", &b.finish());

    gvm()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 3 instructions"))
        .stdout(predicate::str::contains("*io[1] = 12"));
}

#[test]
fn run_term_shows_parked_pc() {
    let dir = TempDir::new().unwrap();
    let path = write_bytecode(&dir, "term.gbc", &[Opcode::Term as u8]);

    gvm()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("*io[0] = (u64::MAX)"));
}

#[test]
fn run_division_by_zero_exits_with_status_3() {
    let dir = TempDir::new().unwrap();
    let mut b = CodeBuilder::new();
    b.op(Opcode::Div).value(1).value(0);
    let path = write_bytecode(&dir, "div0.gbc", &b.finish());

    gvm()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("division by zero"));
}

#[test]
fn run_respects_the_limit_flag() {
    let dir = TempDir::new().unwrap();
    let mut b = CodeBuilder::new();
    b.op(Opcode::Jmp).target(0);
    let path = write_bytecode(&dir, "loop.gbc", &b.finish());

    gvm()
        .args(["run", path.to_str().unwrap(), "--limit", "5"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("instruction limit"));
}

#[test]
fn run_missing_file_exits_1() {
    gvm()
        .args(["run", "nonexistent.gbc"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn run_oversized_file_exits_1() {
    let dir = TempDir::new().unwrap();
    let path = write_bytecode(&dir, "big.gbc", &vec![0u8; 65_537]);

    gvm()
        .args(["run", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid bytecode"));
}

// ---- disasm ----

#[test]
fn disasm_prints_labeled_program() {
    let dir = TempDir::new().unwrap();
    let mut b = CodeBuilder::new();
    b.op(Opcode::Push).value(2);
    b.op(Opcode::Push).value(3);
    b.stack_op(Opcode::Add);
    let path = write_bytecode(&dir, "add.gbc", &b.finish());

    gvm()
        .args(["disasm", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout("L00000: PUSH 2\nL00002: PUSH 3\nL00004: ADD\n");
}

#[test]
fn disasm_renders_jump_labels() {
    let dir = TempDir::new().unwrap();
    let mut b = CodeBuilder::new();
    b.op(Opcode::Jmp).target(3);
    b.op(Opcode::Term);
    let path = write_bytecode(&dir, "jmp.gbc", &b.finish());

    gvm()
        .args(["disasm", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout("L00000: JMP L00003\nL00003: TERM\n");
}

#[test]
fn disasm_truncated_program_exits_1() {
    let dir = TempDir::new().unwrap();
    // PUSH declaring a 2-byte payload with nothing after it.
    let path = write_bytecode(&dir, "bad.gbc", &[Opcode::Push as u8, 0x02]);

    gvm()
        .args(["disasm", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unexpected end of code"));
}
