use std::path::PathBuf;

use clap::ArgMatches;

pub struct NamesArgs {
    pub input: PathBuf,
}

impl NamesArgs {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: m.get_one::<PathBuf>("input").cloned().expect("required"),
        }
    }
}

pub fn run(args: NamesArgs) {
    let src = super::load_source(&args.input);
    let analyzed = super::analyze_or_exit(&src);

    // The report is still useful with errors present; diagnostics go to
    // stderr, the annotated program to stdout.
    if !analyzed.diagnostics().is_empty() {
        eprint!("{}", analyzed.diagnostics().printer().render());
    }
    print!("{}", analyzed.unparse_annotated());

    if !analyzed.is_valid() {
        std::process::exit(1);
    }
}
