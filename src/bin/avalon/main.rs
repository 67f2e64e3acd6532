mod cli;

use clap::Parser as ClapParser;
use log::error;

use avalon::driver;

use cli::Cli;

/// Resolves `AVALON_HOME` (spec.md §6 "Environment"): the env var if set,
/// else `~/.avalon` following the teacher's own `home::home_dir()` fallback
/// pattern (`loader::load_modules`'s default search directory).
fn avalon_home() -> Option<std::path::PathBuf> {
    if let Ok(dir) = std::env::var("AVALON_HOME") {
        return Some(std::path::PathBuf::from(dir));
    }
    home::home_dir().map(|home| home.join(".avalon"))
}

fn main() {
    let args = Cli::parse();
    simple_logger::init_with_level(args.log_level.into()).expect("logger initializes once");

    match driver::compile(&args.file, avalon_home()) {
        Ok(table) => {
            if table.entry.is_none() {
                error!("no entry function was found after a successful compile");
                std::process::exit(1);
            }
            // Running the checked program is the evaluator's job (out of
            // scope for this crate, `avalon::evaluator`); nothing left to do.
        }
        Err(diagnostics) => {
            for diagnostic in &diagnostics.errors {
                error!("{}", diagnostic);
            }
            std::process::exit(1);
        }
    }
}
