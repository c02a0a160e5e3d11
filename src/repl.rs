use rustyline::{error::ReadlineError, DefaultEditor};

use crate::{
    diagnostics::{LiveSourceError, Result},
    session::{Session, SessionConfig},
};

pub struct Repl {
    session: Session,
}

impl Repl {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            session: Session::with_config(config),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new().map_err(readline_error)?;
        let prompt = self.session.config().prompt.clone();
        loop {
            match editor.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed == ":quit" || trimmed == ":exit" {
                        break;
                    }
                    if trimmed.is_empty() {
                        continue;
                    }
                    editor.add_history_entry(trimmed).ok();
                    if trimmed == ":bindings" {
                        self.print_bindings();
                        continue;
                    }
                    match self.session.inspect(trimmed) {
                        Ok(text) => println!("{text}"),
                        Err(LiveSourceError::Diagnostic(diag)) => {
                            eprintln!("{:?}: {}", diag.kind, diag.message);
                        }
                        Err(other) => eprintln!("error: {other}"),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(readline_error(err)),
            }
        }
        Ok(())
    }

    fn print_bindings(&self) {
        let serializer = self.session.serializer();
        for (path, value) in self.session.registry().iter() {
            // A binding's own selector would just echo its path; show its kind instead.
            let shown = match serializer.to_source(value) {
                Ok(text) if text != path => text,
                _ => format!("<{}>", value.type_of()),
            };
            println!("{path} = {shown}");
        }
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

fn readline_error(err: ReadlineError) -> LiveSourceError {
    LiveSourceError::from(std::io::Error::new(std::io::ErrorKind::Other, err))
}
