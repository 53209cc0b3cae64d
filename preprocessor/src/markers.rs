use regex::Regex;

/// Prefix shared by every marker line written into a merged file.
pub(crate) const COMMENT: &str = "/// ";

/// What a single line of a source or merged file stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Marker {
    /// `/// BEGIN name`
    Begin(String),
    /// `/// END name`
    End(String),
    /// `#include "name"`
    Include(String),
    /// `/// #include "name"`, a duplicate include that was not expanded.
    Commented(String),
    Text,
}

pub(crate) struct Markers {
    begin: Regex,
    end: Regex,
    include: Regex,
    commented: Regex,
}

impl Markers {
    pub fn new() -> Self {
        let begin = Regex::new(r"^/// BEGIN (\S*)$").expect("Verified regex");
        let end = Regex::new(r"^/// END (\S*)$").expect("Verified regex");
        let include = Regex::new(r#"^#include\s*"([^"]*)"$"#).expect("Verified regex");
        let commented =
            Regex::new(r#"^/// (#include\s*"([^"]*)")$"#).expect("Verified regex");

        Self {
            begin,
            end,
            include,
            commented,
        }
    }

    pub fn classify(&self, line: &str) -> Marker {
        let line = strip_terminator(line);

        if let Some(captures) = self.begin.captures(line) {
            Marker::Begin(captures[1].to_owned())
        } else if let Some(captures) = self.end.captures(line) {
            Marker::End(captures[1].to_owned())
        } else if let Some(captures) = self.include.captures(line) {
            Marker::Include(captures[1].to_owned())
        } else if let Some(captures) = self.commented.captures(line) {
            Marker::Commented(captures[2].to_owned())
        } else {
            Marker::Text
        }
    }
}

pub(crate) fn strip_terminator(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(line) => line.strip_suffix('\r').unwrap_or(line),
        None => line,
    }
}

/// The `\n` or `\r\n` ending `line`, empty for a final unterminated line.
pub(crate) fn terminator(line: &str) -> &str {
    &line[strip_terminator(line).len()..]
}

pub(crate) fn begin_line(name: &str, terminator: &str) -> String {
    format!("{COMMENT}BEGIN {name}{terminator}")
}

pub(crate) fn end_line(name: &str, terminator: &str) -> String {
    format!("{COMMENT}END {name}{terminator}")
}

pub(crate) fn include_line(name: &str, terminator: &str) -> String {
    format!("#include \"{name}\"{terminator}")
}

/// Comments out a directive line, keeping its spelling and terminator.
pub(crate) fn comment_out(line: &str) -> String {
    format!("{COMMENT}{line}")
}

pub(crate) fn uncomment(line: &str) -> String {
    line.strip_prefix(COMMENT).unwrap_or(line).to_owned()
}
