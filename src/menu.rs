use std::path::{Path, PathBuf};

use crate::arithmetic::{format_result, parse_operand, Calculation, Operator};
use crate::console::{ConsoleIo, MessageStyle};
use crate::errors::CalcError;
use crate::file_store::FileStore;

pub const DEFAULT_LOG_DIR: &str = "logs";

const CONTINUE_PROMPT: &str = "¿Desea realizar un calculo? (s/n)";
const NO_LOGS: &str = "No existen ficheros de Log";

/// How the program was started, decided once from the positional arguments.
#[derive(Debug, PartialEq)]
pub enum Launch {
    Default,
    Directory(PathBuf),
    Batch {
        directory: PathBuf,
        first: String,
        operator: String,
        second: String,
    },
    Invalid(usize),
}

impl Launch {
    pub fn from_args(args: Vec<String>) -> Launch {
        let count = args.len();
        let mut args = args.into_iter();
        match (args.next(), args.next(), args.next(), args.next(), args.next()) {
            (None, ..) => Launch::Default,
            (Some(directory), None, ..) => Launch::Directory(PathBuf::from(directory)),
            (Some(directory), Some(first), Some(operator), Some(second), None) => {
                Launch::Batch {
                    directory: PathBuf::from(directory),
                    first,
                    operator,
                    second,
                }
            }
            _ => Launch::Invalid(count),
        }
    }
}

/// The log file this run writes to. `file_name` stays `None` until the first record.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub directory: PathBuf,
    pub file_name: Option<String>,
}

pub struct MenuController<C, F> {
    console: C,
    store: F,
}

impl<C: ConsoleIo, F: FileStore> MenuController<C, F> {
    pub fn new(console: C, store: F) -> Self {
        MenuController { console, store }
    }

    pub fn into_parts(self) -> (C, F) {
        (self.console, self.store)
    }

    /// Runs the whole program. Only I/O failures escape.
    pub fn run(&mut self, launch: Launch) -> Result<(), CalcError> {
        if let Some(mut session) = self.start(launch)? {
            let banner = MessageStyle {
                pause_before: true,
                ..MessageStyle::SCREEN
            };
            self.console.show("Calculadora", banner)?;
            let logged = self.interactive_loop(&mut session)?;
            info!("Session ended after {} calculations", logged);
        }
        Ok(())
    }

    /// Handles the startup arguments. `None` means the program must stop here.
    pub fn start(&mut self, launch: Launch) -> Result<Option<Session>, CalcError> {
        info!("Launch mode: {:?}", launch);
        match launch {
            Launch::Default => self.open_directory(Path::new(DEFAULT_LOG_DIR)).map(Some),
            Launch::Directory(directory) => self.open_directory(&directory).map(Some),
            Launch::Batch {
                directory,
                first,
                operator,
                second,
            } => self.run_batch(&directory, &first, &operator, &second).map(Some),
            Launch::Invalid(count) => {
                self.console.show_error(&format!(
                    "Numero de argumentos incorrecto ({}). Uso: [directorio [numero operador numero]]",
                    count
                ))?;
                Ok(None)
            }
        }
    }

    fn ensure_directory(&mut self, directory: &Path) -> Result<(), CalcError> {
        if !self.store.directory_exists(directory) {
            self.store.create_directory(directory)?;
            self.console.show(
                &format!("Directorio {} creado", directory.display()),
                MessageStyle::LINE,
            )?;
        }
        Ok(())
    }

    fn open_directory(&mut self, directory: &Path) -> Result<Session, CalcError> {
        self.ensure_directory(directory)?;
        let previous = if self.store.is_directory_empty(directory)? {
            None
        } else {
            self.store.most_recent_file(directory)?
        };
        // A replayed log is only read; this run's file appears with its first record.
        let file_name = match previous {
            Some(name) => {
                self.replay(directory, &name)?;
                None
            }
            None => {
                self.console.show(NO_LOGS, MessageStyle::LINE)?;
                Some(self.store.create_log_file(directory)?)
            }
        };
        Ok(Session {
            directory: directory.to_path_buf(),
            file_name,
        })
    }

    fn replay(&mut self, directory: &Path, name: &str) -> Result<(), CalcError> {
        self.console
            .show(&format!("Ultimo fichero de Log: {}", name), MessageStyle::LINE)?;
        for line in self.store.read_file_lines(directory, name)? {
            let line = line?;
            debug!("Replaying: {}", line);
            self.console.show(&line, MessageStyle::LINE)?;
        }
        Ok(())
    }

    fn run_batch(
        &mut self,
        directory: &Path,
        first: &str,
        operator: &str,
        second: &str,
    ) -> Result<Session, CalcError> {
        self.ensure_directory(directory)?;
        let mut session = Session {
            directory: directory.to_path_buf(),
            file_name: Some(self.store.create_log_file(directory)?),
        };
        let calculation = parse_operand(first).and_then(|first| {
            let operator = Operator::parse(operator)?;
            let second = parse_operand(second)?;
            Calculation::evaluate(first, operator, second)
        });
        match calculation {
            Ok(calculation) => self.record_success(&mut session, &calculation, None)?,
            Err(err) => self.record_failure(&mut session, err)?,
        }
        Ok(session)
    }

    /// Prompts for calculations until the user declines. Returns how many were logged.
    pub fn interactive_loop(&mut self, session: &mut Session) -> Result<u32, CalcError> {
        let mut counter = 0;
        while self.console.ask_yes_no(CONTINUE_PROMPT)? {
            let first = match self.console.read_number("Introduce el primer numero") {
                Ok(value) => value,
                Err(err) => {
                    self.record_failure(session, err)?;
                    continue;
                }
            };
            let operator = self.console.read_operator("Introduce el operador");
            let second = match self.console.read_number("Introduce el segundo numero") {
                Ok(value) => value,
                Err(err) => {
                    self.record_failure(session, err)?;
                    continue;
                }
            };
            // Unlike the batch path, an unknown operator here is skipped, not logged.
            let operator = match operator {
                Ok(operator) => operator,
                Err(CalcError::InvalidInput(reason)) => {
                    warn!("Skipping calculation: {}", reason);
                    continue;
                }
                Err(err) => return Err(err),
            };
            match Calculation::evaluate(first, operator, second) {
                Ok(calculation) => {
                    self.record_success(session, &calculation, Some(counter))?;
                    counter += 1;
                }
                Err(err) => self.record_failure(session, err)?,
            }
        }
        Ok(counter)
    }

    fn record_success(
        &mut self,
        session: &mut Session,
        calculation: &Calculation,
        index: Option<u32>,
    ) -> Result<(), CalcError> {
        self.console
            .show(&format_result(calculation.result), MessageStyle::LINE)?;
        self.append(session, &calculation.record(index))
    }

    /// Shows and logs a recoverable error; anything else is passed back up.
    fn record_failure(&mut self, session: &mut Session, err: CalcError) -> Result<(), CalcError> {
        if !err.is_recoverable() {
            return Err(err);
        }
        let message = err.to_string();
        self.console.show_error(&message)?;
        self.append(session, &message)
    }

    fn append(&mut self, session: &mut Session, line: &str) -> Result<(), CalcError> {
        let file_name = match &session.file_name {
            Some(name) => name.clone(),
            None => {
                let name = self.store.create_log_file(&session.directory)?;
                session.file_name = Some(name.clone());
                name
            }
        };
        self.store.append_line(&session.directory, &file_name, line)
    }
}
