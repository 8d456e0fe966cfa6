//! Emission helpers: fragments, indentation and line-list assembly.
//!
//! Output is assembled in a single pass as lists of lines; nothing is
//! re-parsed or re-formatted after the fact.

/// Spaces per indentation level when the configuration does not say otherwise.
pub const DEFAULT_INDENT: usize = 2;

/// What a visit produces: a single piece of text (expressions) or a list of
/// lines (statements and definitions).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Lines(Vec<String>),
}

impl Fragment {
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Fragment::Text(text) => vec![text],
            Fragment::Lines(lines) => lines,
        }
    }

    /// The fragment as one string, lines joined with `\n`.
    pub fn into_text(self) -> String {
        match self {
            Fragment::Text(text) => text,
            Fragment::Lines(lines) => lines.join("\n"),
        }
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Fragment::Text(text)
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Fragment::Text(text.to_owned())
    }
}

impl From<Vec<String>> for Fragment {
    fn from(lines: Vec<String>) -> Self {
        Fragment::Lines(lines)
    }
}

/// Indent every non-empty line by `level` steps of `width` spaces.
pub fn indent<I>(lines: I, width: usize, level: usize) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let pad = " ".repeat(width * level);
    lines
        .into_iter()
        .map(|line| {
            let line = line.as_ref();
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect()
}

/// Re-indent a fixed two-space template line to `width` spaces per level.
pub fn reindent(line: &str, width: usize) -> String {
    let trimmed = line.trim_start();
    let depth = (line.len() - trimmed.len()) / 2;
    format!("{}{trimmed}", " ".repeat(depth * width))
}

/// Append a fragment to a line list.
pub fn extend(template: &mut Vec<String>, fragment: impl Into<Fragment>) {
    match fragment.into() {
        Fragment::Text(text) => template.push(text),
        Fragment::Lines(lines) => template.extend(lines),
    }
}

/// Split raw target code into lines, dropping blank leading and trailing
/// lines and the indentation common to the rest.
pub fn raw_lines(code: &str) -> Vec<String> {
    let lines: Vec<&str> = code.lines().collect();
    let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return Vec::new();
    };
    let last = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(first);
    let body = &lines[first..=last];

    let mut indents = body
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| &l[..l.len() - l.trim_start().len()]);
    let first_indent = indents.next().unwrap_or("");
    let common = indents.fold(first_indent, |common, indent| {
        let shared = common
            .char_indices()
            .zip(indent.chars())
            .find(|((_, a), b)| a != b)
            .map_or(common.len().min(indent.len()), |((at, _), _)| at);
        &common[..shared]
    });

    body.iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                l.strip_prefix(common).unwrap_or(l).trim_end().to_owned()
            }
        })
        .collect()
}

/// A JSON-escaped string literal, valid as a target-language string.
pub fn string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

/// A target-language array literal of strings.
pub fn string_array(values: &[&str]) -> String {
    serde_json::Value::Array(
        values
            .iter()
            .map(|v| serde_json::Value::String((*v).to_owned()))
            .collect(),
    )
    .to_string()
}

#[cfg(test)]
mod tests;
