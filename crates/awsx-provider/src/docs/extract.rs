//! YAML example extraction from reStructuredText and Python docstrings.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use walkdir::WalkDir;

use awsx_core::error::{AwsxError, Result};
use awsx_core::policy::normalize_policies_document;

/// Marker that starts an inline annotation in documentation snippets.
pub const ANNOTATION_MARKER: &str = "─▶";

const YAML_DIRECTIVES: [&str; 3] = [".. code-block::", ".. code::", ".. sourcecode::"];

/// Cut every line at [`ANNOTATION_MARKER`].
pub fn strip_annotations(text: &str) -> String {
    if !text.contains(ANNOTATION_MARKER) {
        return text.to_owned();
    }
    text.split('\n')
        .map(|line| match line.split_once(ANNOTATION_MARKER) {
            Some((kept, _)) => kept.trim_end(),
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn is_yaml_directive(trimmed: &str) -> bool {
    YAML_DIRECTIVES.iter().any(|d| {
        trimmed
            .strip_prefix(d)
            .map(|lang| matches!(lang.trim(), "yaml" | "yml"))
            .unwrap_or(false)
    })
}

/// Bodies of `.. code-block:: yaml` directives, dedented, in order.
pub fn yaml_blocks_in_rst(rst: &str) -> Vec<String> {
    let lines: Vec<&str> = rst.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;
        if !is_yaml_directive(line.trim()) {
            continue;
        }
        let directive_indent = indent_of(line);

        // directive options (`:linenos:`) and the blank separator
        while i < lines.len() {
            let l = lines[i];
            let t = l.trim();
            if t.is_empty() || (indent_of(l) > directive_indent && t.starts_with(':')) {
                i += 1;
            } else {
                break;
            }
        }

        let start = i;
        while i < lines.len() {
            let l = lines[i];
            if !l.trim().is_empty() && indent_of(l) <= directive_indent {
                break;
            }
            i += 1;
        }

        let body = &lines[start..i];
        if let Some(block) = dedent_block(body) {
            blocks.push(block);
        }
    }
    blocks
}

/// Drop `margin` bytes of leading whitespace; a margin that lands inside a
/// multi-byte space falls back to trimming the whole indent.
fn strip_margin(line: &str, margin: usize) -> &str {
    line.get(margin..).unwrap_or_else(|| line.trim_start())
}

fn dedent_block(lines: &[&str]) -> Option<String> {
    let margin = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_of(l))
        .min()?;
    let mut out: Vec<&str> = lines
        .iter()
        .map(|l| if l.trim().is_empty() { "" } else { strip_margin(l, margin) })
        .collect();
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    Some(out.join("\n"))
}

/// Docstring-style triple-quoted strings in Python source, cleaned the way
/// `inspect.cleandoc` does.
///
/// A string counts when it opens a statement: nothing but an optional
/// `r`/`u` prefix precedes it on its line. Byte strings and f-strings are
/// never docstrings.
pub fn extract_docstrings(source: &str) -> Vec<String> {
    let bytes = source.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            q @ (b'"' | b'\'') => {
                let triple = bytes.get(i..i + 3) == Some(&[q, q, q][..]);
                if triple {
                    let body_start = i + 3;
                    let end = find_triple_end(bytes, body_start, q);
                    if opens_statement(source, i) {
                        out.push(cleandoc(&source[body_start..end.min(bytes.len())]));
                    }
                    i = end.saturating_add(3);
                } else {
                    i = skip_short_string(bytes, i + 1, q);
                }
            }
            _ => i += 1,
        }
    }
    out
}

fn find_triple_end(bytes: &[u8], mut i: usize, q: u8) -> usize {
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes.get(i..i + 3) == Some(&[q, q, q][..]) {
            return i;
        }
        i += 1;
    }
    bytes.len()
}

fn skip_short_string(bytes: &[u8], mut i: usize, q: u8) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i + 1,
            c if c == q => return i + 1,
            _ => i += 1,
        }
    }
    i
}

fn opens_statement(source: &str, quote_at: usize) -> bool {
    let line_start = source[..quote_at].rfind('\n').map_or(0, |p| p + 1);
    let before = source[line_start..quote_at].trim_start();
    before.is_empty() || before.eq_ignore_ascii_case("r") || before.eq_ignore_ascii_case("u")
}

fn cleandoc(doc: &str) -> String {
    let lines: Vec<&str> = doc.split('\n').collect();
    let margin = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_of(l))
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    if let Some(first) = lines.first() {
        cleaned.push(first.trim_start().to_owned());
    }
    for l in lines.iter().skip(1) {
        cleaned.push(strip_margin(l, margin).trim_end().to_owned());
    }
    while cleaned.first().is_some_and(|l| l.trim().is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.trim().is_empty()) {
        cleaned.pop();
    }
    cleaned.join("\n")
}

/// YAML blocks from all docstrings of one Python file.
pub fn yaml_blocks_in_python(source: &str) -> Vec<String> {
    extract_docstrings(&strip_annotations(source))
        .iter()
        .flat_map(|d| yaml_blocks_in_rst(d))
        .collect()
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AwsxError::Internal(format!("create {} failed: {e}", parent.display())))?;
    }
    fs::write(path, contents)
        .map_err(|e| AwsxError::Internal(format!("write {} failed: {e}", path.display())))
}

/// Write the YAML blocks of every `*.rst` directly under `src` into `dest`.
///
/// A file with one block yields `{stem}.yaml`, otherwise `{stem}_{i}.yaml`
/// numbered from 1.
pub fn extract_rst_dir(src: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let mut rst_files: Vec<PathBuf> = fs::read_dir(src)
        .map_err(|e| AwsxError::BadRequest(format!("read {} failed: {e}", src.display())))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|x| x == "rst"))
        .collect();
    rst_files.sort();

    let mut written = Vec::new();
    for rst in rst_files {
        let text = fs::read_to_string(&rst)
            .map_err(|e| AwsxError::BadRequest(format!("read {} failed: {e}", rst.display())))?;
        let blocks = yaml_blocks_in_rst(&text);
        let stem = file_stem(&rst);
        for (i, block) in blocks.iter().enumerate() {
            let name = if blocks.len() > 1 {
                format!("{stem}_{}.yaml", i + 1)
            } else {
                format!("{stem}.yaml")
            };
            let path = dest.join(name);
            write_file(&path, block)?;
            tracing::info!(path = %path.display(), "extracted yaml block");
            written.push(path);
        }
    }
    Ok(written)
}

fn file_stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Outcome of a docstring extraction run.
#[derive(Debug, Default)]
pub struct ExtractReport {
    pub written: Vec<PathBuf>,
    /// Source files that could not be processed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Extract docstring YAML from every `*.py` under `src` into `dest`,
/// mirroring the directory layout as `{stem}_{i}.yml`.
///
/// Each written file gets a `policies:` header when it lacks one. A file
/// that fails is logged and recorded; the walk continues.
pub fn extract_python_tree(src: &Path, dest: &Path) -> ExtractReport {
    let mut report = ExtractReport::default();

    let sources = WalkDir::new(src)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.path().extension().is_some_and(|x| x == "py"));

    for entry in sources {
        let path = entry.path();
        tracing::debug!(file = %path.display(), "processing python file");
        match extract_python_file(src, dest, path) {
            Ok(written) if written.is_empty() => {
                tracing::debug!(file = %path.display(), "no yaml blocks");
            }
            Ok(written) => report.written.extend(written),
            Err(e) => {
                tracing::error!(file = %path.display(), error = %e, "failed to process file");
                report.failed.push((path.to_path_buf(), e.to_string()));
            }
        }
    }
    report
}

fn extract_python_file(src: &Path, dest: &Path, file: &Path) -> Result<Vec<PathBuf>> {
    let source = fs::read_to_string(file)
        .map_err(|e| AwsxError::BadRequest(format!("read {} failed: {e}", file.display())))?;
    let blocks = yaml_blocks_in_python(&source);

    let relative = file.strip_prefix(src).unwrap_or(file);
    let subdir = dest.join(relative.parent().unwrap_or_else(|| Path::new("")));
    let stem = file_stem(file);

    let mut written = Vec::with_capacity(blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        let path = subdir.join(format!("{stem}_{}.yml", i + 1));
        write_file(&path, block)?;
        tracing::info!(path = %path.display(), "saved yaml block");
        fix_policies_file(&path);
        written.push(path);
    }
    Ok(written)
}

/// Rewrite a snippet file so its policies sit under `policies:`.
///
/// Problems are logged and leave the file as extracted.
pub fn fix_policies_file(path: &Path) {
    let fixed = fs::read_to_string(path)
        .map_err(|e| AwsxError::Internal(e.to_string()))
        .and_then(|text| {
            serde_yaml::from_str::<Value>(&text)
                .map_err(|e| AwsxError::BadRequest(format!("invalid yaml: {e}")))
        })
        .and_then(|doc| {
            if doc.get("policies").is_some() {
                return Ok(None);
            }
            normalize_policies_document(doc).map(Some)
        })
        .and_then(|doc| match doc {
            Some(doc) => serde_yaml::to_string(&doc)
                .map(Some)
                .map_err(|e| AwsxError::Internal(e.to_string())),
            None => Ok(None),
        });

    match fixed {
        Ok(Some(text)) => match fs::write(path, text) {
            Ok(()) => tracing::info!(path = %path.display(), "added policies header"),
            Err(e) => tracing::error!(path = %path.display(), error = %e, "write failed"),
        },
        Ok(None) => {}
        Err(e) => tracing::error!(path = %path.display(), error = %e, "cannot fix policies header"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RST: &str = "\
Queues
======

.. code-block:: yaml

    policies:
      - name: q
        resource: awsx.sqs

Some prose.

.. code-block:: python

    print('not yaml')

.. code-block:: yaml
   :linenos:

   - name: g
     resource: awsx.graphql-api
";

    #[test]
    fn rst_yaml_blocks_only() {
        let blocks = yaml_blocks_in_rst(RST);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], "policies:\n  - name: q\n    resource: awsx.sqs");
        assert_eq!(blocks[1], "- name: g\n  resource: awsx.graphql-api");
    }

    #[test]
    fn mixed_unicode_indent_does_not_split_chars() {
        let blocks = yaml_blocks_in_rst(".. code-block:: yaml\n\n a: 1\n\u{a0}b: 2\n");
        assert_eq!(blocks, ["a: 1\nb: 2"]);

        let src = "def f():\n    \"\"\"Doc.\n\n     a: 1\n    \u{3000}b\n    \"\"\"\n";
        assert_eq!(extract_docstrings(src), ["Doc.\n\na: 1\nb"]);
    }

    #[test]
    fn annotations_are_cut() {
        let s = "filters:\n  - tag:Owner: absent   ─▶ no owner\n";
        assert_eq!(strip_annotations(s), "filters:\n  - tag:Owner: absent\n");
    }

    #[test]
    fn docstrings_are_cleaned() {
        let src = r#"
'''Module doc.'''
X = """not a docstring"""

class Queue:
    """Queue resource.

    :example:

        body
    """

    def f(self):
        s = "'''"
        return s
"#;
        let docs = extract_docstrings(src);
        assert_eq!(docs, ["Module doc.", "Queue resource.\n\n:example:\n\n    body"]);
    }

    #[test]
    fn yaml_from_python_docstring() {
        let src = r#"
class Queue:
    """Filter queues.

    .. code-block:: yaml

        policies:
          - name: old-queues   ─▶ the policy
            resource: awsx.sqs
    """
"#;
        let blocks = yaml_blocks_in_python(src);
        assert_eq!(blocks, ["policies:\n  - name: old-queues\n    resource: awsx.sqs"]);
    }
}
