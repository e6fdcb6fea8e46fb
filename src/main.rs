//! pcredoc - declarative PCRE evaluation CLI

use std::process::ExitCode;

use pcredoc::cli;

fn main() -> ExitCode {
    let args = cli::parse();
    match cli::run(&args) {
        Ok(output) => {
            print!("{output}");
            if !output.ends_with('\n') {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("pcredoc: {e:#}");
            ExitCode::FAILURE
        }
    }
}
