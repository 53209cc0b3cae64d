use anyhow::{anyhow, Result};
use log::debug;

use crate::{
    markers::{begin_line, comment_out, end_line, terminator, Marker, Markers},
    store::SourceStore,
};

/// A root file with its includes inlined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub lines: Vec<String>,
    /// Inlined files, in the order their regions open.
    pub included: Vec<String>,
}

impl Expansion {
    pub fn content(&self) -> String {
        self.lines.concat()
    }
}

struct Expander<'a, S: SourceStore + ?Sized> {
    store: &'a S,
    markers: Markers,
    included: Vec<String>,
    // Files whose content is being expanded, outermost first.
    stack: Vec<String>,
}

impl<'a, S: SourceStore + ?Sized> Expander<'a, S> {
    fn new(store: &'a S) -> Self {
        Self {
            store,
            markers: Markers::new(),
            included: vec![],
            stack: vec![],
        }
    }

    fn expand_file(
        &mut self,
        name: &str,
        lines: Vec<String>,
        into: &mut Vec<String>,
    ) -> Result<()> {
        self.stack.push(name.to_owned());

        for line in lines {
            let include = match self.markers.classify(&line) {
                Marker::Include(include) => include,
                _ => {
                    into.push(line);
                    continue;
                }
            };

            if self.stack.contains(&include) {
                return Err(anyhow!(
                    "Include cycle: {chain} -> {include}",
                    chain = self.stack.join(" -> ")
                ));
            }

            if self.included.contains(&include) {
                debug!("{name}: {include} already inlined, commenting out");
                into.push(comment_out(&line));
                continue;
            }

            let mut content = self.store.read_lines(&include)?;
            let ending = content
                .iter()
                .rev()
                .map(|line| terminator(line))
                .find(|ending| !ending.is_empty())
                .unwrap_or("\n")
                .to_owned();
            if let Some(last) = content.last_mut() {
                if !last.ends_with('\n') {
                    last.push_str(&ending);
                }
            }

            debug!("{name}: inlining {include}");
            self.included.push(include.clone());

            // Markers end like the directive they replace. A directive closing the
            // file leaves END unterminated, BEGIN still needs its own line.
            let directive_ending = terminator(&line);
            let begin_ending = if directive_ending.is_empty() {
                ending.as_str()
            } else {
                directive_ending
            };
            into.push(begin_line(&include, begin_ending));
            self.expand_file(&include, content, into)?;
            into.push(end_line(&include, directive_ending));
        }

        self.stack.pop();

        Ok(())
    }
}

/// Inlines every file `root` includes, directly or not.
///
/// The first directive naming a file is replaced by that file's content between
/// `/// BEGIN` and `/// END` markers; later directives naming the same file are
/// commented out. A file including itself, directly or through other files, is
/// an error.
pub fn expand<S: SourceStore + ?Sized>(store: &S, root: &str) -> Result<Expansion> {
    let root_lines = store.read_lines(root)?;

    let mut expander = Expander::new(store);
    let mut lines = Vec::with_capacity(root_lines.len());
    expander.expand_file(root, root_lines, &mut lines)?;

    Ok(Expansion {
        lines,
        included: expander.included,
    })
}
