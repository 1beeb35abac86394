use std::io::{self, BufRead, Write};

use strum::IntoEnumIterator;

use crate::arithmetic::{parse_operand, Operator};
use crate::errors::CalcError;

pub const ERROR_MARKER: &str = "*ERROR* ";
const PAUSE_PROMPT: &str = "Pulsa Intro para continuar...";
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";
const AFFIRMATIVE: [&str; 5] = ["s", "si", "sí", "y", "yes"];

/// How a message is framed on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageStyle {
    pub pause_before: bool,
    pub clear_before: bool,
    pub clear_after: bool,
    pub newline: bool,
}

impl MessageStyle {
    pub const INLINE: MessageStyle = MessageStyle {
        pause_before: false,
        clear_before: false,
        clear_after: false,
        newline: false,
    };

    pub const LINE: MessageStyle = MessageStyle {
        newline: true,
        ..MessageStyle::INLINE
    };

    pub const SCREEN: MessageStyle = MessageStyle {
        clear_before: true,
        ..MessageStyle::LINE
    };
}

/// Everything the calculator needs from a terminal.
///
/// Implementors provide the raw primitives; prompting and validation are
/// built on top of them so every console behaves the same way.
pub trait ConsoleIo {
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Next input line without its terminator, or `None` once input is exhausted.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    fn clear(&mut self) -> io::Result<()>;

    fn show(&mut self, message: &str, style: MessageStyle) -> Result<(), CalcError> {
        if style.pause_before {
            self.pause()?;
        }
        if style.clear_before {
            self.clear()?;
        }
        self.write(message)?;
        if style.newline {
            self.write("\n")?;
        }
        if style.clear_after {
            self.clear()?;
        }
        Ok(())
    }

    fn show_error(&mut self, message: &str) -> Result<(), CalcError> {
        self.show(&format!("{}{}", ERROR_MARKER, message), MessageStyle::LINE)
    }

    fn pause(&mut self) -> Result<(), CalcError> {
        self.write(PAUSE_PROMPT)?;
        self.read_line()?;
        Ok(())
    }

    fn read_number(&mut self, prompt: &str) -> Result<f64, CalcError> {
        let answer = self.prompt(prompt)?;
        parse_operand(&answer)
    }

    fn read_operator(&mut self, prompt: &str) -> Result<Operator, CalcError> {
        let symbols: Vec<String> = Operator::iter().map(|op| op.to_string()).collect();
        let answer = self.prompt(&format!("{} ({})", prompt, symbols.join(", ")))?;
        Operator::parse(&answer)
    }

    fn ask_yes_no(&mut self, prompt: &str) -> Result<bool, CalcError> {
        self.write(&format!("{} ", prompt))?;
        Ok(match self.read_line()? {
            Some(answer) => is_affirmative(&answer),
            None => false,
        })
    }

    /// Writes `prompt` and returns the answer. End of input counts as invalid input.
    fn prompt(&mut self, prompt: &str) -> Result<String, CalcError> {
        self.write(&format!("{}: ", prompt))?;
        self.read_line()?
            .ok_or_else(|| CalcError::InvalidInput(String::from("fin de la entrada")))
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    AFFIRMATIVE.contains(&answer.as_str())
}

pub struct TerminalConsole<R, W> {
    input: R,
    output: W,
}

impl TerminalConsole<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        TerminalConsole::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalConsole { input, output }
    }
}

impl<R: BufRead, W: Write> ConsoleIo for TerminalConsole<R, W> {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn clear(&mut self) -> io::Result<()> {
        self.write(CLEAR_SCREEN)
    }
}
