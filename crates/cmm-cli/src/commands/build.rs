use std::path::PathBuf;

use clap::ArgMatches;

pub struct BuildArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
}

impl BuildArgs {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: m.get_one::<PathBuf>("input").cloned().expect("required"),
            output: m.get_one::<PathBuf>("output").cloned(),
        }
    }
}

pub fn run(args: BuildArgs) {
    let src = super::load_source(&args.input);
    let mut analyzed = super::analyze_or_exit(&src);

    if !analyzed.diagnostics().is_empty() {
        eprint!("{}", analyzed.diagnostics().printer().render());
    }
    if !analyzed.is_valid() {
        std::process::exit(1);
    }

    let asm = match analyzed.codegen() {
        Ok(asm) => asm,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, asm) {
                eprintln!("error: cannot write {}: {e}", path.display());
                std::process::exit(1);
            }
        }
        None => print!("{asm}"),
    }
}
