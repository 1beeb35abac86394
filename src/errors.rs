use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("No se puede dividir entre cero")]
    Division,
    #[error("Entrada no valida: {0}")]
    InvalidInput(String),
    #[error("Error de E/S: {0}")]
    Io(#[from] io::Error),
}

impl CalcError {
    /// Errors the calculator recovers from by showing and logging them.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CalcError::Io(_))
    }
}
