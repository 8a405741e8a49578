use std::path::PathBuf;

use clap::ArgMatches;
use serde_json::json;

pub struct CheckArgs {
    pub input: PathBuf,
    pub pretty: bool,
    pub json: bool,
}

impl CheckArgs {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: m.get_one::<PathBuf>("input").cloned().expect("required"),
            pretty: m.get_flag("pretty"),
            json: m.get_flag("json"),
        }
    }
}

pub fn run(args: CheckArgs) {
    let src = super::load_source(&args.input);
    let analyzed = super::analyze_or_exit(&src);
    let diagnostics = analyzed.diagnostics();

    if args.json {
        let summary = json!({
            "valid": analyzed.is_valid(),
            "diagnostics": diagnostics.iter().collect::<Vec<_>>(),
        });
        println!("{summary}");
        if !analyzed.is_valid() {
            std::process::exit(1);
        }
        return;
    }

    if !diagnostics.is_empty() {
        if args.pretty {
            let path = args.input.display().to_string();
            eprintln!(
                "{}",
                diagnostics.printer().source(&src).path(&path).render()
            );
        } else {
            eprint!("{}", diagnostics.printer().render());
        }
    }

    if !analyzed.is_valid() {
        std::process::exit(1);
    }
    // Silent on success.
}
