//! GNU-style command-line flag parsing.
//!
//! A [`FlagSet`] holds typed flags, each reachable under one or more names.
//! Single-rune names are written `-x` and may be clustered (`-abc`) or carry
//! a glued value (`-p8080`); longer names are written `--name` or
//! `--name=value`. Parsing stops at `--` and, unless interspersion is
//! enabled, at the first positional argument.
//!
//! ```
//! use gnuflag::{ErrorPolicy, FlagSet};
//!
//! let mut flags = FlagSet::new("server", ErrorPolicy::Propagate);
//! flags.bool("tls", true, "serve over TLS", "");
//! flags.present("d debug", "debug output");
//! flags.string("l listen", ":7443", "listen address", "ADDR");
//!
//! let rest = flags.parse(["-d", "--tls", "false", "-l0.0.0.0:8080", "extra"])?;
//! assert_eq!(flags.get::<bool>("debug"), Some(true));
//! assert_eq!(flags.get::<String>("listen").as_deref(), Some("0.0.0.0:8080"));
//! assert_eq!(rest, ["extra"]);
//! # Ok::<(), gnuflag::ParseError>(())
//! ```

mod convert;
mod error;
mod flag;
mod parse;
mod set;
mod usage;
mod value;

pub mod command_line;
pub mod duration;

pub use convert::{parse_bool, parse_float, parse_signed, parse_unsigned};
pub use error::{BoxError, ConversionError, ErrorKind, ParseError, RegistrationError};
pub use flag::{Arity, Flag};
pub use set::{ErrorPolicy, FlagSet, UsageFn};
pub use value::{FlagValue, FromValue, FuncValue, Value};
