use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::Rocks;

const HISTORY_FILE: &str = ".rocks_history";

/// Interactive prompt: reads one line at a time, feeds each to `rocks`, and
/// prints nothing extra around the interpreter's own output. Ctrl-C clears
/// the in-progress line; Ctrl-D ends the session.
pub fn run(rocks: &mut Rocks) {
    let mut editor = DefaultEditor::new().expect("rustyline editor to initialize");

    let history_path = home::home_dir().map(|home| home.join(HISTORY_FILE));
    if let Some(path) = &history_path {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                rocks.run_line(&line);
            },
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(error) => {
                eprintln!("Error reading input: {error}");
                break;
            },
        }
    }

    if let Some(path) = &history_path {
        let _ = editor.save_history(path);
    }
}
