use std::{env, process};

use rocks::Rocks;

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut rocks = Rocks::new();

    match args.len() {
        1 => rocks::repl::run(&mut rocks),
        2 => {
            if let Err(error) = rocks.run_file(&args[1]) {
                eprintln!("Error reading '{}': {error}", args[1]);
                process::exit(74);
            }
        },
        _ => {
            println!("Usage: rocks [script]");
            process::exit(rocks::EX_USAGE);
        },
    }
}
