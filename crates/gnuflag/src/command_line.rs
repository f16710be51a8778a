//! A default [`FlagSet`] for the process's own arguments.
//!
//! The set is named after the program (the file name of `argv[0]`) and uses
//! [`ErrorPolicy::Exit`]. It lives in thread-local storage: each thread that
//! touches it gets its own set, and none of them is shared or synchronized.
//! Define flags and parse from the same thread, normally `main`.
//!
//! ```no_run
//! gnuflag::command_line::with(|set| {
//!     set.present("v verbose", "chatty output");
//! });
//! let args = gnuflag::command_line::parse();
//! let verbose = gnuflag::command_line::with(|set| set.get::<bool>("verbose"));
//! ```

use std::cell::RefCell;
use std::path::Path;

use crate::error::ParseError;
use crate::set::{ErrorPolicy, FlagSet};

thread_local! {
    static COMMAND_LINE: RefCell<FlagSet> =
        RefCell::new(FlagSet::new(program_name(), ErrorPolicy::Exit));
}

fn program_name() -> String {
    std::env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_default()
}

/// Run `f` with exclusive access to this thread's default set.
///
/// # Panics
///
/// Panics if called re-entrantly from inside `f`.
pub fn with<R>(f: impl FnOnce(&mut FlagSet) -> R) -> R {
    COMMAND_LINE.with(|set| f(&mut set.borrow_mut()))
}

/// Parse the process arguments, program name excluded.
///
/// Under the default [`ErrorPolicy::Exit`] an error ends the process, so the
/// result only matters after a policy change through [`FlagSet::init`].
pub fn parse() -> Result<Vec<String>, ParseError> {
    parse_from(std::env::args().skip(1))
}

/// Parse `args` with the default set.
pub fn parse_from<I, S>(args: I) -> Result<Vec<String>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    with(|set| set.parse(args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_uses_the_exit_policy() {
        with(|set| {
            assert_eq!(set.error_policy(), ErrorPolicy::Exit);
            assert!(!set.parsed());
        });
    }

    #[test]
    fn parse_from_feeds_the_thread_local_set() {
        with(|set| {
            set.init("tool", ErrorPolicy::Propagate);
            set.string("o output", "-", "output file", "FILE");
        });
        let rest = parse_from(["-o", "out.txt", "in.txt"]).unwrap();
        assert_eq!(rest, vec!["in.txt"]);
        let output = with(|set| set.get::<String>("output"));
        assert_eq!(output.as_deref(), Some("out.txt"));
        assert!(with(|set| set.parsed()));
    }

    #[test]
    fn each_thread_has_its_own_set() {
        with(|set| set.present("only-here", ""));
        let seen = std::thread::spawn(|| with(|set| set.lookup("only-here").is_some()))
            .join()
            .unwrap();
        assert!(!seen);
        assert!(with(|set| set.lookup("only-here").is_some()));
    }
}
