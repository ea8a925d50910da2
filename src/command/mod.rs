mod analyze;

use colored::{Colorize, ColoredString};
use crate::{Error, err::error};

const PKG_NAME: &'static str = env!("CARGO_PKG_NAME");

/// Print tool version and authors.
fn print_version() {
    println!("{} {}", PKG_NAME.underline(), format!("v{}", env!("CARGO_PKG_VERSION")).green());
    let authors: Vec<_> = env!("CARGO_PKG_AUTHORS").split(':').collect();
    let n = authors.len();
    if n == 0 {
        return;
    }
    print!("Created by ");
    for (i, author) in authors.iter().enumerate() {
        if i == 0 {
            print!("{}", author.bright_blue());
        } else if i < n - 1 {
            print!(", {}", author.bright_blue());
        } else {
            print!(" and {}", author.bright_blue());
        }
    }
    println!();
}

/// Placeholder for flags in the help messages.
fn flag() -> ColoredString {
    "    ".normal()
}

fn print_help() {
    print_version();
    println!("\n{} {} command [arguments]",
        "Usage:".bold(), PKG_NAME);

    println!("\n{}", "[ Analysis ]".bold());
    println!("    {:<7}  Calculate GC-content, sliding windows and CpG islands.", "analyze".red());

    println!("\n{}", "[ General help ]".bold());
    println!("    {:<7}  Show this help message.", "help".red());
    println!("    {:<7}  Show version.", "version".red());
}

pub fn run(argv: &[String]) -> Result<(), Error> {
    if argv.len() <= 1 {
        print_help();
        std::process::exit(1);
    }
    match &argv[1] as &str {
        "analyze" | "a" => analyze::run(&argv[2..])?,
        "help" | "h" | "--help" | "-h" => print_help(),
        "version" | "--version" | "-V" => print_version(),
        cmd => return Err(error!(InvalidInput, "Unknown command {} (see {} help)", cmd, PKG_NAME)),
    }
    Ok(())
}
