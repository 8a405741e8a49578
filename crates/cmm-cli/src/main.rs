mod cli;
mod commands;

use cli::build_cli;

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("build", m)) => {
            commands::build::run(commands::build::BuildArgs::from_matches(m));
        }
        Some(("check", m)) => {
            commands::check::run(commands::check::CheckArgs::from_matches(m));
        }
        Some(("ast", m)) => {
            commands::ast::run(commands::ast::AstArgs::from_matches(m));
        }
        Some(("names", m)) => {
            commands::names::run(commands::names::NamesArgs::from_matches(m));
        }
        Some(("symbols", m)) => {
            commands::symbols::run(commands::symbols::SymbolsArgs::from_matches(m));
        }
        _ => unreachable!("clap should have caught this"),
    }
}
