//! File helpers for actions: delimited file lists, wildcard expansion and
//! STDIN/STDOUT aware open.
use std::fs::{self, File};
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::InputValue;

/// Sentinel file name for the standard streams.
pub const STDIN: &str = "STDIN";
pub const STDOUT: &str = "STDOUT";

/// Expand an input into a list of file paths.
///
/// A single value is split as one comma separated record (double quotes
/// group, `""` is a literal quote); a list is taken as is. `STDIN` passes
/// through unchanged and every other entry is expanded as a wildcard
/// pattern. Patterns matching nothing contribute nothing.
pub fn expand(value: &InputValue) -> Result<Vec<String>> {
    let entries = match value {
        InputValue::Value(s) => split_record(s),
        InputValue::Multiple(v) => v.clone(),
        InputValue::Flag(_) => Vec::new(),
    };

    let mut out = Vec::new();
    for entry in entries {
        if entry == STDIN {
            out.push(entry);
        } else {
            out.extend(glob(&entry)?);
        }
    }
    Ok(out)
}

/// Split one comma separated record.
pub fn split_record(line: &str) -> Vec<String> {
    if line.is_empty() {
        return Vec::new();
    }

    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' if quoted => quoted = false,
            '"' if field.is_empty() => quoted = true,
            ',' if !quoted => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Join fields into one comma separated record, quoting where needed.
pub fn join_record<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| {
            let f = f.as_ref();
            if f.contains([',', '"']) {
                format!("\"{}\"", f.replace('"', "\"\""))
            } else {
                f.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Expand `pattern` against the file system, sorted. A pattern without
/// wildcards yields itself only if the path exists.
pub fn glob(pattern: &str) -> Result<Vec<String>> {
    let path = Path::new(pattern);
    let mut candidates: Vec<PathBuf> = vec![PathBuf::new()];

    for component in path.components() {
        let part = component.as_os_str().to_string_lossy();
        let wild = matches!(component, Component::Normal(_)) && has_wildcard(&part);
        let mut next = Vec::new();

        for base in &candidates {
            if !wild {
                next.push(base.join(component.as_os_str()));
                continue;
            }
            let dir = if base.as_os_str().is_empty() {
                Path::new(".")
            } else {
                base.as_path()
            };
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            let mut matched: Vec<PathBuf> = entries
                .filter_map(|e| e.ok())
                .filter_map(|e| {
                    let name = e.file_name().to_string_lossy().into_owned();
                    let hidden_ok = part.starts_with('.') || !name.starts_with('.');
                    (hidden_ok && wildcard_match(&part, &name)).then(|| base.join(name))
                })
                .collect();
            matched.sort();
            next.extend(matched);
        }
        candidates = next;
    }

    Ok(candidates
        .into_iter()
        .filter(|p| !p.as_os_str().is_empty() && p.exists())
        .map(|p| p.to_string_lossy().into_owned())
        .collect())
}

fn has_wildcard(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Match `name` against a shell wildcard: `*`, `?` and `[...]` classes
/// (with `!` negation and `a-z` ranges).
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let n: Vec<char> = name.chars().collect();
    match_from(&p, &n)
}

fn match_from(p: &[char], n: &[char]) -> bool {
    match p.first() {
        None => n.is_empty(),
        Some('*') => (0..=n.len()).any(|i| match_from(&p[1..], &n[i..])),
        Some('?') => !n.is_empty() && match_from(&p[1..], &n[1..]),
        Some('[') => match (n.first(), class_end(p)) {
            (Some(&c), Some(end)) => {
                class_matches(&p[1..end], c) && match_from(&p[end + 1..], &n[1..])
            }
            (Some(&c), None) => c == '[' && match_from(&p[1..], &n[1..]),
            (None, _) => false,
        },
        Some(&c) => n.first() == Some(&c) && match_from(&p[1..], &n[1..]),
    }
}

// Index of the `]` closing the class opened at p[0].
fn class_end(p: &[char]) -> Option<usize> {
    let mut i = 1;
    if p.get(i) == Some(&'!') {
        i += 1;
    }
    if p.get(i) == Some(&']') {
        i += 1;
    }
    p[i..].iter().position(|&c| c == ']').map(|j| i + j)
}

fn class_matches(class: &[char], c: char) -> bool {
    let (negate, class) = match class.first() {
        Some('!') => (true, &class[1..]),
        _ => (false, class),
    };
    let mut hit = false;
    let mut i = 0;
    while i < class.len() {
        if i + 2 < class.len() && class[i + 1] == '-' {
            hit |= class[i] <= c && c <= class[i + 2];
            i += 3;
        } else {
            hit |= class[i] == c;
            i += 1;
        }
    }
    hit != negate
}

/// Open `name` for reading; `STDIN` reads the process input, which must
/// not be an interactive terminal.
pub fn open_input(name: &str) -> Result<Box<dyn Read>> {
    debug!("Opening {}", name);
    if name == STDIN {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            return Err(Error::EmptyStdin);
        }
        Ok(Box::new(stdin))
    } else {
        Ok(Box::new(File::open(name)?))
    }
}

/// Open `name` for writing, truncating; `STDOUT` writes to the process output.
pub fn open_output(name: &str) -> Result<Box<dyn Write>> {
    debug!("Opening {}", name);
    if name == STDOUT {
        Ok(Box::new(io::stdout()))
    } else {
        Ok(Box::new(File::create(name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_splitting() {
        assert!(split_record("").is_empty());
        assert_eq!(split_record("a.txt"), ["a.txt"]);
        assert_eq!(split_record("a.txt,b.txt"), ["a.txt", "b.txt"]);
        assert_eq!(
            split_record(r#""my file.txt","with, comma.txt",plain"#),
            ["my file.txt", "with, comma.txt", "plain"]
        );
        assert_eq!(split_record(r#""say ""hi""""#), [r#"say "hi""#]);
    }

    #[test]
    fn joined_records_split_back() {
        let fields = ["plain.txt", "a,b.txt", "say \"hi\".txt"];
        let line = join_record(&fields);
        assert_eq!(line, "plain.txt,\"a,b.txt\",\"say \"\"hi\"\".txt\"");
        assert_eq!(split_record(&line), fields);
    }

    #[test]
    fn wildcard_rules() {
        assert!(wildcard_match("*.txt", "notes.txt"));
        assert!(!wildcard_match("*.txt", "notes.csv"));
        assert!(wildcard_match("file?.log", "file1.log"));
        assert!(!wildcard_match("file?.log", "file10.log"));
        assert!(wildcard_match("[ab]*", "beta"));
        assert!(!wildcard_match("[!ab]*", "beta"));
        assert!(wildcard_match("v[0-9]", "v7"));
        assert!(wildcard_match("*", ""));
    }

    #[test]
    fn expand_globs_and_keeps_stdin() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.txt", "c.csv", ".hidden.txt"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        let pattern = dir.path().join("*.txt").to_string_lossy().into_owned();
        let missing = dir.path().join("missing.txt").to_string_lossy().into_owned();

        let files = expand(&InputValue::Multiple(vec![
            STDIN.to_string(),
            pattern,
            missing,
        ]))
        .unwrap();

        let a = dir.path().join("a.txt").to_string_lossy().into_owned();
        let b = dir.path().join("b.txt").to_string_lossy().into_owned();
        assert_eq!(files, vec![STDIN.to_string(), a, b]);
    }

    #[test]
    fn expand_splits_single_value() {
        let dir = tempfile::tempdir().unwrap();
        let one = dir.path().join("one.dat");
        let two = dir.path().join("two.dat");
        fs::write(&one, "1").unwrap();
        fs::write(&two, "2").unwrap();

        let value = format!("{},\"{}\"", one.display(), two.display());
        let files = expand(&InputValue::Value(value)).unwrap();
        assert_eq!(files, [one.display().to_string(), two.display().to_string()]);
    }

    #[test]
    fn wildcard_in_directory_component() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["run1", "run2", "other"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join("out.log"), "x").unwrap();
        }
        let pattern = dir.path().join("run*").join("out.log");
        let files = glob(&pattern.to_string_lossy()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].contains("run1") && files[1].contains("run2"));
    }

    #[test]
    fn open_output_then_input_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let name = path.to_string_lossy();
        open_output(&name).unwrap().write_all(b"hello").unwrap();
        let mut text = String::new();
        open_input(&name).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "hello");
    }
}
