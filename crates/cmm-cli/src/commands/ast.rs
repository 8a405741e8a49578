use std::path::PathBuf;

use clap::ArgMatches;

pub struct AstArgs {
    pub input: PathBuf,
}

impl AstArgs {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: m.get_one::<PathBuf>("input").cloned().expect("required"),
        }
    }
}

pub fn run(args: AstArgs) {
    let src = super::load_source(&args.input);
    let parsed = super::parse_or_exit(&src);
    print!("{}", parsed.unparse());
}
