use std::fmt;

/// Error type returned by user callbacks and custom values.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a token could not be converted into a value.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("invalid syntax")]
    Syntax,
    #[error("value out of range")]
    Range,
    #[error("expected {expected} value(s), got {got}")]
    WrongCount { expected: usize, got: usize },
    #[error("{0}")]
    Custom(BoxError),
}

impl ConversionError {
    /// Wrap an arbitrary error reported by a callback or custom value.
    pub fn custom(err: impl Into<BoxError>) -> Self {
        Self::Custom(err.into())
    }
}

/// Coarse classification of a [`ParseError`].
///
/// `Range` is kept apart from `Conversion` so callers can tell a numeric
/// overflow from plain bad input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    HelpRequested,
    UnknownFlag,
    Syntax,
    MissingValue,
    InsufficientValues,
    UnwantedValue,
    AttachedToMultiValue,
    Conversion,
    Range,
}

/// Errors produced while parsing an argument list.
///
/// Every variant except [`ParseError::HelpRequested`] carries the registry's
/// display label for "flag" so the message reads on its own.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("help requested")]
    HelpRequested,
    #[error("{known_as} provided but not defined: {flag}")]
    UnknownFlag { known_as: String, flag: String },
    /// [`FlagSet::set`](crate::FlagSet::set) named a flag that was never defined.
    #[error("no such {known_as} {flag}")]
    NoSuchFlag { known_as: String, flag: String },
    #[error("empty {known_as} in argument {arg:?}")]
    EmptyName { known_as: String, arg: String },
    #[error("{known_as} needs a parameter: {flag}")]
    MissingValue { known_as: String, flag: String },
    #[error("{known_as} not enough parameters provided: {flag}")]
    InsufficientValues { known_as: String, flag: String },
    #[error("{known_as} needs more than one parameter: {flag}")]
    AttachedToMultiValue { known_as: String, flag: String },
    #[error("{known_as} unwanted argument {value:?} found after: {flag}")]
    UnwantedValue {
        known_as: String,
        flag: String,
        value: String,
    },
    #[error("invalid {} {} for {known_as} {flag}: {source}", noun(.values), Quoted(.values))]
    InvalidValue {
        known_as: String,
        flag: String,
        values: Vec<String>,
        source: ConversionError,
    },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HelpRequested => ErrorKind::HelpRequested,
            Self::UnknownFlag { .. } | Self::NoSuchFlag { .. } => ErrorKind::UnknownFlag,
            Self::EmptyName { .. } => ErrorKind::Syntax,
            Self::MissingValue { .. } => ErrorKind::MissingValue,
            Self::InsufficientValues { .. } => ErrorKind::InsufficientValues,
            Self::AttachedToMultiValue { .. } => ErrorKind::AttachedToMultiValue,
            Self::UnwantedValue { .. } => ErrorKind::UnwantedValue,
            Self::InvalidValue {
                source: ConversionError::Range,
                ..
            } => ErrorKind::Range,
            Self::InvalidValue { .. } => ErrorKind::Conversion,
        }
    }

    pub fn is_help(&self) -> bool {
        matches!(self, Self::HelpRequested)
    }

    /// Process exit status used by the exit policy.
    pub fn exit_code(&self) -> i32 {
        if self.is_help() { 0 } else { 2 }
    }
}

fn noun(values: &[String]) -> &'static str {
    if values.len() == 1 { "value" } else { "values" }
}

struct Quoted<'a>(&'a [String]);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            [single] => write!(f, "{single:?}"),
            many => write!(f, "{many:?}"),
        }
    }
}

/// Programming errors detected while registering flags.
///
/// These never reach the error policy: registration panics with the message.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("{known_as} redefinition: {name}")]
    Duplicate { known_as: String, name: String },
    #[error("{known_as} registered without a name")]
    NoNames { known_as: String },
}
