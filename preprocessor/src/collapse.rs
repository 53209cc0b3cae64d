use anyhow::{anyhow, Result};
use log::{debug, warn};

use crate::markers::{include_line, terminator, uncomment, Marker, Markers};

/// Files rebuilt from a merged file, the target file first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collapse {
    pub files: Vec<(String, Vec<String>)>,
}

impl Collapse {
    pub fn file(&self, name: &str) -> Option<&[String]> {
        self.files
            .iter()
            .find(|(file, _)| file == name)
            .map(|(_, lines)| lines.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(name, _)| name.as_str())
    }

    fn insert(&mut self, name: &str, lines: Vec<String>) {
        match self.files.iter_mut().find(|(file, _)| file == name) {
            Some((_, existing)) => {
                if *existing != lines {
                    warn!("{name} is rebuilt twice with different content, keeping the last one");
                }
                *existing = lines;
            }
            None => self.files.push((name.to_owned(), lines)),
        }
    }
}

enum Region {
    Idle,
    Collecting { name: String, lines: Vec<String> },
}

fn collapse_into(
    markers: &Markers,
    name: &str,
    lines: Vec<String>,
    collapse: &mut Collapse,
) -> Result<()> {
    let mut output = Vec::with_capacity(lines.len());
    // Nested files are pushed by the recursion, this keeps the parent ahead of them.
    let mut children = Collapse::default();
    let mut region = Region::Idle;

    for line in lines {
        region = match (region, markers.classify(&line)) {
            (Region::Idle, Marker::Begin(begin)) => Region::Collecting {
                name: begin,
                lines: vec![],
            },
            (Region::Idle, Marker::End(end)) => {
                warn!("{name}: /// END {end} closes no region, keeping it as text");
                output.push(line);
                Region::Idle
            }
            (Region::Idle, Marker::Commented(include)) => {
                debug!("{name}: restoring include of {include}");
                output.push(uncomment(&line));
                Region::Idle
            }
            (Region::Idle, _) => {
                output.push(line);
                Region::Idle
            }
            (Region::Collecting { name: open, lines }, Marker::End(end)) if end == open => {
                output.push(include_line(&open, terminator(&line)));
                collapse_into(markers, &open, lines, &mut children)?;
                Region::Idle
            }
            (Region::Collecting { name: open, mut lines }, _) => {
                lines.push(line);
                Region::Collecting { name: open, lines }
            }
        };
    }

    if let Region::Collecting { name: open, .. } = region {
        return Err(anyhow!(
            "{name}: /// BEGIN {open} has no matching /// END {open}"
        ));
    }

    debug!("Rebuilt {name}, {count} lines", count = output.len());
    collapse.insert(name, output);
    for (child, lines) in children.files {
        collapse.insert(&child, lines);
    }

    Ok(())
}

/// Splits a merged file back into the files it was made of.
///
/// `name` is the file the merged lines are written back as. Every region becomes
/// an `#include` directive in its parent and a file of its own, and commented out
/// duplicate includes are restored.
pub fn collapse(lines: Vec<String>, name: &str) -> Result<Collapse> {
    let markers = Markers::new();
    let mut collapse = Collapse::default();

    collapse_into(&markers, name, lines, &mut collapse)?;

    Ok(collapse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::split_lines;

    fn collapsed(content: &str, name: &str) -> Collapse {
        collapse(split_lines(content), name).unwrap()
    }

    fn content(collapse: &Collapse, name: &str) -> Option<String> {
        collapse.file(name).map(|lines| lines.concat())
    }

    #[test]
    fn test_single_region() {
        let collapse = collapsed("/// BEGIN a.txt\nhello\n/// END a.txt\n", "root.txt");

        assert_eq!(collapse.names().collect::<Vec<_>>(), vec!["root.txt", "a.txt"]);
        assert_eq!(content(&collapse, "root.txt").unwrap(), "#include \"a.txt\"\n");
        assert_eq!(content(&collapse, "a.txt").unwrap(), "hello\n");
    }

    #[test]
    fn test_nested_regions() {
        let collapse = collapsed(
            "a1\n\
             /// BEGIN b.glsl\n\
             b1\n\
             /// BEGIN c.glsl\n\
             c1\n\
             /// END c.glsl\n\
             b2\n\
             /// END b.glsl\n\
             a2\n",
            "a.glsl",
        );

        assert_eq!(
            collapse.names().collect::<Vec<_>>(),
            vec!["a.glsl", "b.glsl", "c.glsl"]
        );
        assert_eq!(
            content(&collapse, "a.glsl").unwrap(),
            "a1\n#include \"b.glsl\"\na2\n"
        );
        assert_eq!(
            content(&collapse, "b.glsl").unwrap(),
            "b1\n#include \"c.glsl\"\nb2\n"
        );
        assert_eq!(content(&collapse, "c.glsl").unwrap(), "c1\n");
    }

    #[test]
    fn test_commented_include_is_restored() {
        let collapse = collapsed("first\n/// #include \"x.txt\"\nlast\n", "root.txt");

        assert_eq!(
            content(&collapse, "root.txt").unwrap(),
            "first\n#include \"x.txt\"\nlast\n"
        );
        assert_eq!(collapse.file("x.txt"), None);
        assert_eq!(collapse.files.len(), 1);
    }

    #[test]
    fn test_commented_include_inside_region() {
        let collapse = collapsed(
            "/// BEGIN b.glsl\n/// #include  \"d.glsl\"\n/// END b.glsl\n",
            "a.glsl",
        );

        assert_eq!(
            content(&collapse, "b.glsl").unwrap(),
            "#include  \"d.glsl\"\n"
        );
    }

    #[test]
    fn test_rebuilt_include_keeps_end_terminator() {
        let collapse = collapsed(
            "/// BEGIN a.glsl\r\nfloat a;\r\n/// END a.glsl\r\nvoid main() {}\r\n",
            "render.glsl",
        );

        assert_eq!(
            content(&collapse, "render.glsl").unwrap(),
            "#include \"a.glsl\"\r\nvoid main() {}\r\n"
        );
        assert_eq!(content(&collapse, "a.glsl").unwrap(), "float a;\r\n");
    }

    #[test]
    fn test_unterminated_end_rebuilds_unterminated_include() {
        let collapse = collapsed("x\n/// BEGIN a.glsl\na\n/// END a.glsl", "render.glsl");

        assert_eq!(
            content(&collapse, "render.glsl").unwrap(),
            "x\n#include \"a.glsl\""
        );
    }

    #[test]
    fn test_empty_region() {
        let collapse = collapsed("/// BEGIN a.txt\n/// END a.txt\n", "root.txt");

        assert_eq!(content(&collapse, "a.txt").unwrap(), "");
    }

    #[test]
    fn test_mismatched_end_belongs_to_open_region() {
        let collapse = collapsed(
            "/// BEGIN a.txt\n/// END b.txt\n/// END a.txt\n",
            "root.txt",
        );

        assert_eq!(content(&collapse, "a.txt").unwrap(), "/// END b.txt\n");
    }

    #[test]
    fn test_stray_end_is_kept_as_text() {
        let collapse = collapsed("x\n/// END a.txt\ny\n", "root.txt");

        assert_eq!(content(&collapse, "root.txt").unwrap(), "x\n/// END a.txt\ny\n");
        assert_eq!(collapse.files.len(), 1);
    }

    #[test]
    fn test_unterminated_region_is_an_error() {
        let result = collapse(split_lines("/// BEGIN a.txt\nhello\n"), "root.txt");

        assert!(result.is_err());
    }

    #[test]
    fn test_unterminated_nested_region_is_an_error() {
        let result = collapse(
            split_lines("/// BEGIN a.txt\n/// BEGIN b.txt\n/// END a.txt\n"),
            "root.txt",
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_same_file_rebuilt_twice_keeps_last() {
        let collapse = collapsed(
            "/// BEGIN a.txt\none\n/// END a.txt\n/// BEGIN a.txt\ntwo\n/// END a.txt\n",
            "root.txt",
        );

        assert_eq!(collapse.files.len(), 2);
        assert_eq!(content(&collapse, "a.txt").unwrap(), "two\n");
        assert_eq!(
            content(&collapse, "root.txt").unwrap(),
            "#include \"a.txt\"\n#include \"a.txt\"\n"
        );
    }
}
