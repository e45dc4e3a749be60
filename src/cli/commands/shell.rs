//! Interactive session command handler

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::IsTerminal;

use crate::cli::session::{Flow, Session};
use crate::config::Config;
use crate::constants;
use crate::services::Tracker;

pub fn cmd_shell(config: &Config) -> anyhow::Result<()> {
    let tracker = Tracker::new(config.catalog.clone());
    let mut session = Session::new(tracker, std::io::stdout());

    if std::io::stdin().is_terminal() {
        run_editor(&mut session)?;
    } else {
        session.run(std::io::stdin().lock())?;
    }

    let count = session.tracker().len();
    tracing::info!(count, "Session ended");
    Ok(())
}

/// Line editing and in-memory history for a terminal user.
fn run_editor<W: std::io::Write>(session: &mut Session<W>) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;
    session.greet()?;

    loop {
        match editor.readline(constants::shell::PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                if session.execute(&line)? == Flow::Quit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
