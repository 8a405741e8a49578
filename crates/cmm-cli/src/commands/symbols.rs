use std::path::PathBuf;

use clap::ArgMatches;

pub struct SymbolsArgs {
    pub input: PathBuf,
}

impl SymbolsArgs {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: m.get_one::<PathBuf>("input").cloned().expect("required"),
        }
    }
}

pub fn run(args: SymbolsArgs) {
    let src = super::load_source(&args.input);
    let analyzed = super::analyze_or_exit(&src);

    if !analyzed.diagnostics().is_empty() {
        eprint!("{}", analyzed.diagnostics().printer().render());
    }
    print!("{}", analyzed.dump_symbols());

    if !analyzed.is_valid() {
        std::process::exit(1);
    }
}
