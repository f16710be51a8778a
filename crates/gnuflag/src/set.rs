//! The flag registry.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use crate::error::{BoxError, ParseError, RegistrationError};
use crate::flag::{Arity, Flag, dashed};
use crate::value::{FlagValue, FromValue, FuncValue, Value};

/// What [`FlagSet::parse`] does when it hits an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Return the error to the caller.
    #[default]
    Propagate,
    /// Exit the process: status 0 for a help request, 2 otherwise.
    Exit,
    /// Panic with the error message.
    Panic,
}

/// Renders the usage message for a set; see [`FlagSet::set_usage`].
pub type UsageFn = Box<dyn Fn(&FlagSet) -> String>;

/// A set of defined flags.
///
/// A `FlagSet` is a plain mutable object with no internal synchronization.
/// Register every flag, then call [`FlagSet::parse`], then read the values.
pub struct FlagSet {
    pub(crate) name: String,
    pub(crate) parsed: bool,
    pub(crate) flags: Vec<Flag>,
    pub(crate) formal: HashMap<String, usize>,
    pub(crate) actual: BTreeMap<String, usize>,
    pub(crate) args: Vec<String>,
    pub(crate) allow_intersperse: bool,
    pub(crate) policy: ErrorPolicy,
    pub(crate) output: Box<dyn Write>,
    pub(crate) usage_indent: usize,
    pub(crate) known_as: String,
    pub(crate) groups: Vec<String>,
    pub(crate) current_group: Option<usize>,
    pub(crate) show_groupings: bool,
    pub(crate) usage: Option<UsageFn>,
}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name)
            .field("parsed", &self.parsed)
            .field("flags", &self.flags)
            .field("args", &self.args)
            .field("allow_intersperse", &self.allow_intersperse)
            .field("policy", &self.policy)
            .field("known_as", &self.known_as)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

impl Default for FlagSet {
    fn default() -> Self {
        Self::new("", ErrorPolicy::Propagate)
    }
}

impl FlagSet {
    /// Create an empty set whose messages call a flag a "parameter".
    pub fn new(name: impl Into<String>, policy: ErrorPolicy) -> Self {
        Self::with_known_as(name, policy, "parameter")
    }

    /// Create an empty set whose messages call a flag `known_as`
    /// (e.g. "option").
    pub fn with_known_as(
        name: impl Into<String>,
        policy: ErrorPolicy,
        known_as: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parsed: false,
            flags: Vec::new(),
            formal: HashMap::new(),
            actual: BTreeMap::new(),
            args: Vec::new(),
            allow_intersperse: false,
            policy,
            output: Box::new(io::stderr()),
            usage_indent: 0,
            known_as: known_as.into(),
            groups: Vec::new(),
            current_group: None,
            show_groupings: true,
            usage: None,
        }
    }

    /// Rename the set and replace its error policy.
    pub fn init(&mut self, name: impl Into<String>, policy: ErrorPolicy) {
        self.name = name.into();
        self.policy = policy;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn known_as(&self) -> &str {
        &self.known_as
    }

    pub fn set_known_as(&mut self, known_as: impl Into<String>) {
        self.known_as = known_as.into();
    }

    /// Destination for usage and error messages (stderr by default).
    pub fn set_output(&mut self, output: impl Write + 'static) {
        self.output = Box::new(output);
    }

    /// Allow positional arguments and flags to be mixed freely.
    ///
    /// When off (the default) the first positional argument ends flag
    /// scanning: `prog -a -b in1 in2`, never `prog -a in1 -b`.
    pub fn set_allow_intersperse(&mut self, allow: bool) {
        self.allow_intersperse = allow;
    }

    /// Fixed column at which usage text starts; 0 computes it.
    pub fn set_usage_indent(&mut self, indent: usize) {
        self.usage_indent = indent;
    }

    /// Print group headings and keep groups apart in the usage output.
    pub fn set_show_groupings(&mut self, show: bool) {
        self.show_groupings = show;
    }

    /// Flags registered from now on are listed under `label` in help output.
    pub fn set_grouping(&mut self, label: impl Into<String>) {
        self.groups.push(label.into());
        self.current_group = Some(self.groups.len() - 1);
    }

    /// Replace the usage message printed on errors and help requests.
    pub fn set_usage(&mut self, usage: impl Fn(&FlagSet) -> String + 'static) {
        self.usage = Some(Box::new(usage));
    }

    /// Whether [`FlagSet::parse`] has been called.
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Define a flag.
    ///
    /// `names` holds one or more whitespace-separated names (`"i install"`);
    /// all of them resolve to the same flag. The current text of `value` is
    /// remembered as the default shown in help.
    ///
    /// # Panics
    ///
    /// Panics if a name is already defined or if `names` is blank.
    pub fn var(
        &mut self,
        value: Value,
        names: &str,
        usage: &str,
        type_hint: &str,
        arity: impl Into<Arity>,
    ) {
        if let Err(err) = self.try_register(value, names, usage, type_hint, arity.into()) {
            if let RegistrationError::Duplicate { name, .. } = &err {
                let _ = writeln!(
                    self.output,
                    "{} {} redefined: {name}",
                    self.name, self.known_as
                );
            }
            panic!("{err}");
        }
    }

    fn try_register(
        &mut self,
        value: Value,
        names: &str,
        usage: &str,
        type_hint: &str,
        arity: Arity,
    ) -> Result<(), RegistrationError> {
        let names: Vec<String> = names.split_whitespace().map(str::to_string).collect();
        if names.is_empty() {
            return Err(RegistrationError::NoNames {
                known_as: self.known_as.clone(),
            });
        }
        for (i, name) in names.iter().enumerate() {
            if self.formal.contains_key(name) || names[..i].contains(name) {
                return Err(RegistrationError::Duplicate {
                    known_as: self.known_as.clone(),
                    name: name.clone(),
                });
            }
        }

        let index = self.flags.len();
        for name in &names {
            self.formal.insert(name.clone(), index);
        }
        tracing::trace!(names = ?names, "registered flag");
        self.flags.push(Flag::new(
            names,
            usage,
            value,
            type_hint,
            arity,
            self.current_group,
        ));
        Ok(())
    }

    /// Define a flag that takes no value and is true once seen.
    pub fn present(&mut self, names: &str, usage: &str) {
        self.var(Value::Present(false), names, usage, "", 0);
    }

    pub fn bool(&mut self, names: &str, default: bool, usage: &str, type_hint: &str) {
        self.var(Value::Bool(default), names, usage, type_hint, 1);
    }

    pub fn int(&mut self, names: &str, default: isize, usage: &str, type_hint: &str) {
        self.var(Value::Int(default), names, usage, type_hint, 1);
    }

    pub fn int32(&mut self, names: &str, default: i32, usage: &str, type_hint: &str) {
        self.var(Value::Int32(default), names, usage, type_hint, 1);
    }

    pub fn int64(&mut self, names: &str, default: i64, usage: &str, type_hint: &str) {
        self.var(Value::Int64(default), names, usage, type_hint, 1);
    }

    pub fn uint(&mut self, names: &str, default: usize, usage: &str, type_hint: &str) {
        self.var(Value::Uint(default), names, usage, type_hint, 1);
    }

    pub fn uint32(&mut self, names: &str, default: u32, usage: &str, type_hint: &str) {
        self.var(Value::Uint32(default), names, usage, type_hint, 1);
    }

    pub fn uint64(&mut self, names: &str, default: u64, usage: &str, type_hint: &str) {
        self.var(Value::Uint64(default), names, usage, type_hint, 1);
    }

    pub fn float64(&mut self, names: &str, default: f64, usage: &str, type_hint: &str) {
        self.var(Value::Float(default), names, usage, type_hint, 1);
    }

    pub fn duration(&mut self, names: &str, default: Duration, usage: &str, type_hint: &str) {
        self.var(Value::Duration(default), names, usage, type_hint, 1);
    }

    pub fn string(&mut self, names: &str, default: &str, usage: &str, type_hint: &str) {
        self.var(
            Value::String(default.to_string()),
            names,
            usage,
            type_hint,
            1,
        );
    }

    /// Define a flag collecting every following token up to the next flag:
    /// `--install a b -r c` sets `install` to `[a b]`.
    pub fn string_slice(&mut self, names: &str, usage: &str, type_hint: &str) {
        self.var(
            Value::StringSlice(Vec::new()),
            names,
            usage,
            type_hint,
            Arity::Variadic,
        );
    }

    /// Define a flag that calls `f` with its tokens each time it is seen.
    /// An error from `f` is reported as an invalid value.
    pub fn func(
        &mut self,
        names: &str,
        usage: &str,
        type_hint: &str,
        arity: impl Into<Arity>,
        f: impl FnMut(&[String]) -> Result<(), BoxError> + 'static,
    ) {
        self.var(Value::Func(FuncValue::new(f)), names, usage, type_hint, arity);
    }

    /// Define a flag backed by a caller-defined value.
    pub fn custom(
        &mut self,
        value: impl FlagValue,
        names: &str,
        usage: &str,
        type_hint: &str,
        arity: impl Into<Arity>,
    ) {
        self.var(Value::Custom(Box::new(value)), names, usage, type_hint, arity);
    }

    /// The flag registered under `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.formal.get(name).map(|&i| &self.flags[i])
    }

    /// Typed read of a flag's current value.
    ///
    /// Returns `None` for unknown names and for a type that does not match
    /// the flag's variant.
    pub fn get<T: FromValue>(&self, name: &str) -> Option<T> {
        self.lookup(name).and_then(|f| T::from_value(&f.value))
    }

    /// Borrow a caller-defined value registered with [`FlagSet::custom`].
    pub fn get_custom<T: FlagValue>(&self, name: &str) -> Option<&T> {
        self.lookup(name).and_then(|f| f.value.as_custom::<T>())
    }

    /// Assign `tokens` to the named flag as if it had been parsed.
    ///
    /// Errors are returned directly; the error policy is not consulted.
    pub fn set(&mut self, name: &str, tokens: &[String]) -> Result<(), ParseError> {
        let Some(&index) = self.formal.get(name) else {
            return Err(ParseError::NoSuchFlag {
                known_as: self.known_as.clone(),
                flag: dashed(name),
            });
        };
        self.assign(index, name, tokens)
    }

    pub(crate) fn assign(
        &mut self,
        index: usize,
        name: &str,
        tokens: &[String],
    ) -> Result<(), ParseError> {
        if let Err(source) = self.flags[index].value.assign(tokens) {
            return Err(ParseError::InvalidValue {
                known_as: self.known_as.clone(),
                flag: dashed(name),
                values: tokens.to_vec(),
                source,
            });
        }
        self.actual.insert(name.to_string(), index);
        Ok(())
    }

    /// Visit every flag once, sorted by canonical name.
    pub fn visit_all(&self, mut f: impl FnMut(&Flag)) {
        for flag in self.sorted(self.formal.values().copied()) {
            f(flag);
        }
    }

    /// Visit the flags set by the last parse (or [`FlagSet::set`]), sorted by
    /// canonical name.
    pub fn visit(&self, mut f: impl FnMut(&Flag)) {
        for flag in self.sorted(self.actual.values().copied()) {
            f(flag);
        }
    }

    pub(crate) fn sorted(&self, indices: impl Iterator<Item = usize>) -> Vec<&Flag> {
        let mut indices: Vec<usize> = indices.collect();
        indices.sort_unstable();
        indices.dedup();
        let mut flags: Vec<&Flag> = indices.into_iter().map(|i| &self.flags[i]).collect();
        flags.sort_by(|a, b| a.name().cmp(b.name()));
        flags
    }

    /// Number of distinct flags that have been set.
    pub fn nflag(&self) -> usize {
        self.sorted(self.actual.values().copied()).len()
    }

    /// Positional arguments left after the last parse.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The `i`th positional argument.
    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(String::as_str)
    }

    pub fn narg(&self) -> usize {
        self.args.len()
    }

    /// Report `err` to the output and apply the error policy.
    pub(crate) fn fail(&mut self, err: ParseError) -> ParseError {
        if !err.is_help() {
            let _ = writeln!(self.output, "{err}");
        }
        self.print_usage();

        match self.policy {
            ErrorPolicy::Propagate => err,
            ErrorPolicy::Exit => {
                let _ = self.output.flush();
                tracing::debug!(code = err.exit_code(), "exiting after parse error");
                std::process::exit(err.exit_code());
            }
            ErrorPolicy::Panic => panic!("{err}"),
        }
    }
}
