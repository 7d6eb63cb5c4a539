//! stackdash: terminal dashboard for infrastructure modules.

use stackdash_lib::{app, config, errors};

fn main() {
    let config = config::AppConfig::parse();
    let code = match app::run(&config) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            errors::exit_code(&err)
        }
    };
    std::process::exit(code);
}
