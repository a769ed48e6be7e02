/// This module discovers the connectors that live in the contract trees. A
/// connector is a leaf directory containing a `main.sol` entry file, and its
/// name is the last contract declared in that file.
use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr};
use tracing::{debug, warn};

/// The trees that hold the deployable connectors, relative to the project
/// root. They are scanned in this order.
pub const CONNECTOR_ROOTS: &[&str] = &[
    "contracts/mainnet/connectors",
    "contracts/polygon/connectors",
];

/// The file that marks a directory as a connector.
pub const ENTRY_FILE: &str = "main.sol";

/// A connector found in one of the contract trees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectorDescriptor {
    pub name: String,
    /// The path of the entry file relative to the project root.
    pub source_path: PathBuf,
}

/// Scans the given roots under `project_root` and returns the connectors in
/// the order they were found.
pub fn scan_connectors<P: AsRef<Path>>(
    project_root: P,
    roots: &[&str],
) -> Result<Vec<ConnectorDescriptor>> {
    let project_root = project_root.as_ref();
    let mut connectors = Vec::new();
    for root in roots {
        let found = scan_dir(project_root, Path::new(root))
            .wrap_err_with(|| format!("failed to scan connector tree {}", root))?;
        debug!(root, count = found.len(), "scanned connector tree");
        connectors.extend(found);
    }
    Ok(connectors)
}

fn scan_dir(project_root: &Path, relative: &Path) -> Result<Vec<ConnectorDescriptor>> {
    let mut entries = fs::read_dir(project_root.join(relative))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    let mut connectors = Vec::new();
    for path in entries.into_iter().filter(|path| path.is_dir()) {
        // The entry's path relative to the project root.
        let relative = match path.file_name() {
            Some(name) => relative.join(name),
            None => continue,
        };

        // A directory with an entry file is a leaf. Otherwise, keep descending.
        let entry_file = path.join(ENTRY_FILE);
        if entry_file.is_file() {
            let source = fs::read_to_string(&entry_file)
                .wrap_err_with(|| format!("failed to read {}", entry_file.display()))?;
            match contract_name(&source) {
                Some(name) => connectors.push(ConnectorDescriptor {
                    name,
                    source_path: relative.join(ENTRY_FILE),
                }),
                None => warn!(
                    path = %entry_file.display(),
                    "entry file doesn't declare a contract; skipping"
                ),
            }
        } else {
            connectors.extend(scan_dir(project_root, &relative)?);
        }
    }
    Ok(connectors)
}

/// Extracts the name of the last contract declared in a Solidity source.
///
/// Comments and string literals are blanked out before looking for the
/// `contract` keyword, so neither a commented-out declaration nor a revert
/// message mentioning a contract can be mistaken for the name.
pub fn contract_name(source: &str) -> Option<String> {
    let code = strip_comments_and_strings(source);
    let mut tokens = code
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
        .filter(|token| !token.is_empty())
        .peekable();

    let mut name = None;
    while let Some(token) = tokens.next() {
        if token != "contract" {
            continue;
        }
        if let Some(candidate) = tokens.peek() {
            if is_identifier(candidate) {
                name = Some(candidate.to_string());
            }
        }
    }
    name
}

fn is_identifier(token: &str) -> bool {
    token
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_' || c == '$')
}

/// Replaces comments and string literals with whitespace.
fn strip_comments_and_strings(source: &str) -> String {
    #[derive(Clone, Copy)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        Str(char),
    }

    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            State::Code => match (c, chars.peek().copied()) {
                ('/', Some('/')) => {
                    chars.next();
                    state = State::LineComment;
                    out.push(' ');
                }
                ('/', Some('*')) => {
                    chars.next();
                    state = State::BlockComment;
                    out.push(' ');
                }
                ('"', _) | ('\'', _) => {
                    state = State::Str(c);
                    out.push(' ');
                }
                _ => out.push(c),
            },
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                    out.push('\n');
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                }
            }
            State::Str(quote) => {
                if c == '\\' {
                    chars.next();
                } else if c == quote {
                    state = State::Code;
                }
            }
        }
    }
    out
}
