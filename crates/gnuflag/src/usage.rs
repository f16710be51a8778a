//! Help text: the aligned listing of every flag with its default.

use std::io::Write;

use unicode_width::UnicodeWidthStr;

use crate::flag::{Flag, dashed, is_single_rune};
use crate::set::FlagSet;

/// Column layout shared by every line of one render.
struct Layout {
    threshold: usize,
    have_multiple: bool,
}

impl Layout {
    fn new(set: &FlagSet) -> Self {
        let mut max_width = 0;
        let mut have_multiple = false;
        for flag in &set.flags {
            max_width = max_width.max(flag.name().width());
            have_multiple |= flag.names().len() > 1;
        }
        let threshold = if set.usage_indent > 0 {
            set.usage_indent
        } else if have_multiple {
            max_width + 8
        } else {
            max_width + 4
        };
        Self {
            threshold,
            have_multiple,
        }
    }

    fn render(&self, flag: &Flag, out: &mut String) {
        let mut line = String::new();
        if self.have_multiple && flag.names().len() == 1 && !is_single_rune(flag.name()) {
            line.push_str("    ");
        }
        let names: Vec<String> = flag.display_names().into_iter().map(dashed).collect();
        line.push_str(&names.join(", "));
        if !flag.type_hint().is_empty() {
            line.push(' ');
            line.push_str(flag.type_hint());
        }
        line.push_str("  ");
        let width = line.width();
        if width < self.threshold {
            line.push_str(&" ".repeat(self.threshold - width));
        }

        let indent = format!("\n{}", " ".repeat(self.threshold));
        line.push_str(&flag.usage().replace('\n', &indent));

        if !flag.value().is_unset_present() {
            if flag.value().quotes_default() {
                line.push_str(&format!("  (Default: {:?})", flag.default_value()));
            } else {
                line.push_str(&format!("  (Default: {})", flag.default_value()));
            }
        }
        out.push_str(&line);
        out.push('\n');
    }
}

impl FlagSet {
    /// Render the listing of every defined flag.
    ///
    /// Flags registered before the first [`FlagSet::set_grouping`] come
    /// first, then each group under a `label:` heading. Within a partition
    /// flags are sorted by canonical name.
    pub fn defaults(&self) -> String {
        let layout = Layout::new(self);
        let mut out = String::new();

        if !self.show_groupings {
            for flag in self.sorted(0..self.flags.len()) {
                layout.render(flag, &mut out);
            }
            return out;
        }

        for flag in self.group_members(None) {
            layout.render(flag, &mut out);
        }
        for (index, label) in self.groups.iter().enumerate() {
            let flags = self.group_members(Some(index));
            if flags.is_empty() {
                continue;
            }
            out.push_str(&format!("{label}:\n"));
            for flag in flags {
                layout.render(flag, &mut out);
            }
        }
        out
    }

    fn group_members(&self, group: Option<usize>) -> Vec<&Flag> {
        let indices = (0..self.flags.len()).filter(|&i| self.flags[i].group == group);
        self.sorted(indices)
    }

    /// Write [`FlagSet::defaults`] to the output.
    pub fn print_defaults(&mut self) {
        let text = self.defaults();
        let _ = self.output.write_all(text.as_bytes());
    }

    /// The full usage message: the custom renderer if one is set, otherwise
    /// a `Usage of <name>:` header followed by the defaults.
    pub fn usage_text(&self) -> String {
        if let Some(usage) = &self.usage {
            return usage(self);
        }
        let header = if self.name.is_empty() {
            "Usage:\n".to_string()
        } else {
            format!("Usage of {}:\n", self.name)
        };
        header + &self.defaults()
    }

    /// Write [`FlagSet::usage_text`] to the output.
    pub fn print_usage(&mut self) {
        let text = self.usage_text();
        let _ = self.output.write_all(text.as_bytes());
    }
}
