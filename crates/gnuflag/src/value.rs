//! The value model: what a flag stores and how tokens are converted into it.

use std::any::Any;
use std::fmt;
use std::time::Duration;

use crate::convert;
use crate::duration;
use crate::error::{BoxError, ConversionError};

/// A caller-defined value.
///
/// `assign` receives exactly as many tokens as the flag's arity asks for. It
/// must leave the previous value untouched when it fails.
pub trait FlagValue: fmt::Debug + Any {
    fn assign(&mut self, tokens: &[String]) -> Result<(), BoxError>;

    fn stringify(&self) -> String;

    /// The flag may be triggered without a value even though it accepts one.
    fn is_present_capable(&self) -> bool {
        false
    }

    /// A boolean literal may be glued onto the short form (`-b0`).
    fn is_bool_capable(&self) -> bool {
        false
    }
}

type Callback = Box<dyn FnMut(&[String]) -> Result<(), BoxError>>;

/// A callback invoked with the raw tokens each time its flag is seen.
pub struct FuncValue(Callback);

impl FuncValue {
    pub fn new(f: impl FnMut(&[String]) -> Result<(), BoxError> + 'static) -> Self {
        Self(Box::new(f))
    }
}

impl fmt::Debug for FuncValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FuncValue(..)")
    }
}

/// The value held by a flag.
#[derive(Debug)]
pub enum Value {
    /// Set to true by the flag's mere presence.
    Present(bool),
    Bool(bool),
    Int(isize),
    Int32(i32),
    Int64(i64),
    Uint(usize),
    Uint32(u32),
    Uint64(u64),
    Float(f64),
    Duration(Duration),
    String(String),
    StringSlice(Vec<String>),
    Func(FuncValue),
    Custom(Box<dyn FlagValue>),
}

fn single(tokens: &[String]) -> Result<&str, ConversionError> {
    match tokens {
        [token] => Ok(token),
        _ => Err(ConversionError::WrongCount {
            expected: 1,
            got: tokens.len(),
        }),
    }
}

impl Value {
    /// Convert `tokens` and store the result. On failure the old value stays.
    pub fn assign(&mut self, tokens: &[String]) -> Result<(), ConversionError> {
        match self {
            Self::Present(v) => {
                if !tokens.is_empty() {
                    return Err(ConversionError::WrongCount {
                        expected: 0,
                        got: tokens.len(),
                    });
                }
                *v = true;
            }
            Self::Bool(v) => *v = convert::parse_bool(single(tokens)?)?,
            Self::Int(v) => *v = convert::parse_signed(single(tokens)?)?,
            Self::Int32(v) => *v = convert::parse_signed(single(tokens)?)?,
            Self::Int64(v) => *v = convert::parse_signed(single(tokens)?)?,
            Self::Uint(v) => *v = convert::parse_unsigned(single(tokens)?)?,
            Self::Uint32(v) => *v = convert::parse_unsigned(single(tokens)?)?,
            Self::Uint64(v) => *v = convert::parse_unsigned(single(tokens)?)?,
            Self::Float(v) => *v = convert::parse_float(single(tokens)?)?,
            Self::Duration(v) => *v = duration::parse(single(tokens)?)?,
            Self::String(v) => *v = single(tokens)?.to_string(),
            Self::StringSlice(v) => *v = tokens.to_vec(),
            Self::Func(f) => (f.0)(tokens).map_err(ConversionError::Custom)?,
            Self::Custom(c) => c.assign(tokens).map_err(ConversionError::Custom)?,
        }
        Ok(())
    }

    /// Canonical text form, also used for the default shown in help.
    pub fn stringify(&self) -> String {
        match self {
            Self::Present(v) | Self::Bool(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Int32(v) => v.to_string(),
            Self::Int64(v) => v.to_string(),
            Self::Uint(v) => v.to_string(),
            Self::Uint32(v) => v.to_string(),
            Self::Uint64(v) => v.to_string(),
            Self::Float(v) => convert::format_float(*v),
            Self::Duration(v) => duration::format(*v),
            Self::String(v) => v.clone(),
            Self::StringSlice(v) => format!("[{}]", v.join(" ")),
            Self::Func(_) => String::new(),
            Self::Custom(c) => c.stringify(),
        }
    }

    pub fn is_present_capable(&self) -> bool {
        match self {
            Self::Present(_) => true,
            Self::Custom(c) => c.is_present_capable(),
            _ => false,
        }
    }

    pub fn is_bool_capable(&self) -> bool {
        match self {
            Self::Bool(_) => true,
            Self::Custom(c) => c.is_bool_capable(),
            _ => false,
        }
    }

    /// Whether help output should quote the default.
    pub(crate) fn quotes_default(&self) -> bool {
        match self {
            Self::String(_) => true,
            Self::Func(_) => self.stringify().is_empty(),
            _ => false,
        }
    }

    /// A present flag that has not been triggered shows no default.
    pub(crate) fn is_unset_present(&self) -> bool {
        matches!(self, Self::Present(false))
    }

    pub(crate) fn as_custom<T: FlagValue>(&self) -> Option<&T> {
        match self {
            Self::Custom(c) => {
                let any: &dyn Any = &**c;
                any.downcast_ref::<T>()
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify())
    }
}

/// Typed read access to a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Present(v) | Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

macro_rules! from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_value! {
    isize => Int,
    i32 => Int32,
    i64 => Int64,
    usize => Uint,
    u32 => Uint32,
    u64 => Uint64,
    f64 => Float,
    Duration => Duration,
    String => String,
    Vec<String> => StringSlice,
}
