//! Errors raised while bringing a stream up.

use core::fmt;

use crate::config::ConfigError;

/// Error raised while bringing a stream up.
///
/// `E` is the bus driver's own error type. Nothing on the streaming path
/// returns an error: underruns are absorbed by zero fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The stream configuration was rejected before touching the bus.
    Config(ConfigError),
    /// The bus driver failed to configure or start.
    Bus(E),
}

impl<E> From<ConfigError> for Error<E> {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(err) => write!(f, "invalid stream configuration: {err}"),
            Error::Bus(err) => write!(f, "parallel bus error: {err}"),
        }
    }
}
