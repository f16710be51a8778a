use crate::value::Value;

/// How many tokens a flag consumes when it is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many tokens. `Exact(0)` is a present-style flag.
    Exact(usize),
    /// Every following token up to the next flag-like token.
    Variadic,
}

impl From<usize> for Arity {
    fn from(n: usize) -> Self {
        Self::Exact(n)
    }
}

/// The state of one logical flag, shared by all of its names.
#[derive(Debug)]
pub struct Flag {
    pub(crate) names: Vec<String>,
    pub(crate) usage: String,
    pub(crate) value: Value,
    pub(crate) default: String,
    pub(crate) type_hint: String,
    pub(crate) arity: Arity,
    pub(crate) group: Option<usize>,
}

impl Flag {
    pub(crate) fn new(
        mut names: Vec<String>,
        usage: &str,
        value: Value,
        type_hint: &str,
        arity: Arity,
        group: Option<usize>,
    ) -> Self {
        // Long names lead so the canonical name of `-G, --grind` is `grind`.
        names.sort_by_key(|n| is_single_rune(n));
        let default = value.stringify();
        Self {
            names,
            usage: usage.to_string(),
            value,
            default,
            type_hint: type_hint.to_string(),
            arity,
            group,
        }
    }

    /// Canonical name, used for sorting and deduplication.
    pub fn name(&self) -> &str {
        &self.names[0]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The value as text at registration time.
    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn type_hint(&self) -> &str {
        &self.type_hint
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Names in display order: single-rune names first.
    pub(crate) fn display_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_by_key(|n| !is_single_rune(n));
        names
    }
}

pub(crate) fn is_single_rune(name: &str) -> bool {
    name.chars().count() == 1
}

/// `-x` for a single-rune name, `--name` otherwise.
pub(crate) fn dashed(name: &str) -> String {
    if is_single_rune(name) {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn long_name_becomes_canonical() {
        let flag = Flag::new(
            names(&["G", "grind"]),
            "",
            Value::String("0".to_string()),
            "STR",
            Arity::Exact(1),
            None,
        );
        assert_eq!(flag.name(), "grind");
        assert_eq!(flag.display_names(), vec!["G", "grind"]);
        assert_eq!(flag.default_value(), "0");
    }

    #[test]
    fn dashes_follow_rune_count() {
        assert_eq!(dashed("x"), "-x");
        assert_eq!(dashed("世"), "-世");
        assert_eq!(dashed("世界"), "--世界");
        assert_eq!(dashed("port"), "--port");
    }
}
