//! The tokenizer/resolver state machine behind [`FlagSet::parse`].

use std::collections::VecDeque;

use crate::convert::is_bool_literal;
use crate::error::ParseError;
use crate::flag::{Arity, dashed};
use crate::set::FlagSet;

/// Text glued to the flag currently being resolved.
#[derive(Debug, Default)]
enum Pending {
    #[default]
    None,
    /// The rest of a short cluster, read as more short flags: `bc` in `-abc`.
    Cluster(String),
    /// A value after `=` (`--port=80`, `-p=80`), or the rest of a short
    /// cluster claimed by a value-taking flag.
    Attached(String),
}

impl Pending {
    fn take(&mut self) -> Pending {
        std::mem::take(self)
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Cluster(s) => s.is_empty(),
            Self::Attached(_) => false,
        }
    }
}

#[derive(Debug)]
struct Cursor {
    tokens: VecDeque<String>,
    pending: Pending,
}

impl Cursor {
    /// Take one code point off a short cluster as the next flag name.
    fn split_short(&mut self, cluster: &str) -> String {
        let mut chars = cluster.chars();
        let name = chars.next().map(String::from).unwrap_or_default();
        let rest = chars.as_str();
        self.pending = if let Some(value) = rest.strip_prefix('=') {
            Pending::Attached(value.to_string())
        } else if rest.is_empty() {
            Pending::None
        } else {
            Pending::Cluster(rest.to_string())
        };
        name
    }

    fn next_is_flag_like(&self) -> bool {
        self.tokens.front().is_some_and(|t| looks_like_flag(t))
    }
}

fn looks_like_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

enum Step {
    Finished,
    Positional,
    Flag { name: String, long: bool },
}

impl FlagSet {
    /// Parse `arguments` (without the program name) against the defined
    /// flags and return the positional arguments.
    ///
    /// Scanning stops at `--`. With interspersion off it also stops at the
    /// first positional argument. `-h` and `--help` request help unless the
    /// set defines those names itself; that surfaces as
    /// [`ParseError::HelpRequested`] under [`ErrorPolicy::Propagate`].
    ///
    /// Each call clears the positional arguments and the set of triggered
    /// flags. Values keep whatever an earlier parse assigned.
    ///
    /// [`ErrorPolicy::Propagate`]: crate::ErrorPolicy::Propagate
    pub fn parse<I, S>(&mut self, arguments: I) -> Result<Vec<String>, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parsed = true;
        self.args.clear();
        self.actual.clear();

        let mut cursor = Cursor {
            tokens: arguments.into_iter().map(Into::into).collect(),
            pending: Pending::None,
        };

        loop {
            let step = match self.next_step(&mut cursor) {
                Ok(step) => step,
                Err(err) => return Err(self.fail(err)),
            };
            match step {
                Step::Finished => break,
                Step::Positional => {}
                Step::Flag { name, long } => {
                    if let Err(err) = self.resolve(&name, long, &mut cursor) {
                        return Err(self.fail(err));
                    }
                }
            }
        }

        Ok(self.args.clone())
    }

    fn next_step(&mut self, cursor: &mut Cursor) -> Result<Step, ParseError> {
        if let Pending::Cluster(rest) = cursor.pending.take() {
            if !rest.is_empty() {
                let name = cursor.split_short(&rest);
                return Ok(Step::Flag { name, long: false });
            }
        }

        let Some(arg) = cursor.tokens.pop_front() else {
            return Ok(Step::Finished);
        };

        if arg == "--" {
            tracing::trace!(remaining = cursor.tokens.len(), "flag terminator");
            self.args.extend(cursor.tokens.drain(..));
            return Ok(Step::Finished);
        }

        if !looks_like_flag(&arg) {
            tracing::trace!(arg = %arg, "positional argument");
            self.args.push(arg);
            if self.allow_intersperse {
                return Ok(Step::Positional);
            }
            self.args.extend(cursor.tokens.drain(..));
            return Ok(Step::Finished);
        }

        if let Some(long) = arg.strip_prefix("--") {
            let (name, attached) = match long.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (long, None),
            };
            if name.is_empty() {
                return Err(ParseError::EmptyName {
                    known_as: self.known_as.clone(),
                    arg,
                });
            }
            cursor.pending = match attached {
                Some(value) => Pending::Attached(value.to_string()),
                None => Pending::None,
            };
            return Ok(Step::Flag {
                name: name.to_string(),
                long: true,
            });
        }

        let name = cursor.split_short(&arg[1..]);
        Ok(Step::Flag { name, long: false })
    }

    fn resolve(&mut self, name: &str, long: bool, cursor: &mut Cursor) -> Result<(), ParseError> {
        let Some(&index) = self.formal.get(name) else {
            if name == "h" || name == "help" {
                tracing::debug!("help requested");
                return Err(ParseError::HelpRequested);
            }
            return Err(ParseError::UnknownFlag {
                known_as: self.known_as.clone(),
                flag: dashed(name),
            });
        };

        let flag = &self.flags[index];
        let tokens: Vec<String> = match flag.arity {
            Arity::Exact(0) => match cursor.pending.take() {
                Pending::Attached(value) => {
                    return Err(ParseError::UnwantedValue {
                        known_as: self.known_as.clone(),
                        flag: dashed(name),
                        value,
                    });
                }
                Pending::Cluster(rest) if flag.value.is_bool_capable() && is_bool_literal(&rest) => {
                    vec![rest]
                }
                other => {
                    cursor.pending = other;
                    Vec::new()
                }
            },
            Arity::Exact(1) => match cursor.pending.take() {
                Pending::Attached(value) => vec![value],
                Pending::Cluster(rest) if !rest.is_empty() => vec![rest],
                _ if flag.value.is_present_capable()
                    && (cursor.tokens.is_empty() || cursor.next_is_flag_like()) =>
                {
                    Vec::new()
                }
                _ => match cursor.tokens.pop_front() {
                    Some(token) => vec![token],
                    None => {
                        return Err(ParseError::MissingValue {
                            known_as: self.known_as.clone(),
                            flag: dashed(name),
                        });
                    }
                },
            },
            Arity::Exact(n) => {
                if !cursor.pending.is_empty() {
                    return Err(ParseError::AttachedToMultiValue {
                        known_as: self.known_as.clone(),
                        flag: dashed(name),
                    });
                }
                if cursor.tokens.len() < n {
                    return Err(ParseError::InsufficientValues {
                        known_as: self.known_as.clone(),
                        flag: dashed(name),
                    });
                }
                cursor.tokens.drain(..n).collect()
            }
            Arity::Variadic => {
                let mut tokens = match cursor.pending.take() {
                    Pending::Attached(value) => vec![value],
                    Pending::Cluster(rest) if !rest.is_empty() => vec![rest],
                    _ => Vec::new(),
                };
                while cursor.tokens.front().is_some_and(|t| !looks_like_flag(t)) {
                    tokens.extend(cursor.tokens.pop_front());
                }
                if tokens.is_empty() {
                    return Err(ParseError::MissingValue {
                        known_as: self.known_as.clone(),
                        flag: dashed(name),
                    });
                }
                tokens
            }
        };

        self.assign(index, name, &tokens)?;
        tracing::debug!(flag = %dashed(name), long, tokens = tokens.len(), "resolved flag");
        Ok(())
    }
}
