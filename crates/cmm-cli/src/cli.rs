//! Command-line definition for `cmm`.
//!
//! Shared arg builders keep the subcommands consistent: every command takes
//! the source file as its positional argument.

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};

/// C-- source file (positional).
fn input_arg() -> Arg {
    Arg::new("input")
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("C-- source file")
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("cmm")
        .about("C-- compiler targeting MIPS (SPIM) assembly")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(build_command())
        .subcommand(check_command())
        .subcommand(ast_command())
        .subcommand(names_command())
        .subcommand(symbols_command())
}

fn build_command() -> Command {
    Command::new("build")
        .about("Compile a program to MIPS assembly")
        .arg(input_arg())
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUT")
                .value_parser(value_parser!(PathBuf))
                .help("Write assembly to OUT instead of stdout"),
        )
}

fn check_command() -> Command {
    Command::new("check")
        .about("Parse and analyze without emitting code")
        .arg(input_arg())
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .action(ArgAction::SetTrue)
                .help("Render diagnostics as annotated source snippets"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Emit a machine-readable diagnostic summary"),
        )
}

fn ast_command() -> Command {
    Command::new("ast")
        .about("Pretty-print the parsed program")
        .arg(input_arg())
}

fn names_command() -> Command {
    Command::new("names")
        .about("Name-resolution report: the program with identifier uses annotated by type")
        .arg(input_arg())
}

fn symbols_command() -> Command {
    Command::new("symbols")
        .about("Dump the global symbol table")
        .arg(input_arg())
}
