use std::process;

use glyphfield::cli;
use glyphfield::logging;
use glyphfield::run;

fn main() {
    let args = cli::parse();
    logging::init(args.verbose);
    if let Err(e) = run::cmd(args) {
        eprintln!("Application error: {e}");
        process::exit(1);
    }
}
