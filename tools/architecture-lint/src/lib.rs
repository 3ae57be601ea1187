//! Boundary lint for the portal crate.
//!
//! `portal/src` is split into `domain` (model, controllers, ports and their
//! in-memory fixtures), `inbound` (the command line) and `outbound` (HTTP
//! and session file adapters). Each source file under those directories is
//! parsed with `syn` and every path it names is checked against the rules
//! of its layer:
//!
//! - `domain` never names `inbound`, `outbound`, a concrete adapter type, or
//!   a transport, storage or CLI crate.
//! - `inbound` never names `outbound` or a concrete adapter type, and leaves
//!   HTTP and filesystem crates to the adapters. `main.rs` does the wiring.
//! - `outbound` never names `inbound` or the CLI parser.
//! - `Fixture*` test doubles live in `domain::ports`; production `inbound`
//!   and `outbound` code must not name them. `tests.rs` files and
//!   `#[cfg(test)]` items are exempt from this rule only.
//!
//! `config.rs`, `lib.rs` and `main.rs` sit outside the layers and are not
//! checked. Run the lint with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use syn::visit::Visit;

/// Source directories the lint walks, relative to `portal/src`.
const LAYER_DIRS: [&str; 3] = ["domain", "inbound", "outbound"];

/// Concrete adapters only `main.rs` may construct.
const ADAPTER_TYPES: [&str; 2] = ["HttpPortalApi", "FileSessionStore"];

/// Prefix shared by the in-memory port doubles in `domain::ports`.
const FIXTURE_PREFIX: &str = "Fixture";

/// A rule broken by one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `portal/src`.
    pub file: Utf8PathBuf,
    /// What the file reached for.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Reasons the lint did not pass.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// The source tree could not be read.
    Io(io::Error),
    /// A file name under `portal/src` is not UTF-8.
    NonUtf8Name {
        /// Lossy rendering of the offending name.
        name: String,
    },
    /// A file sits outside the known layers or does not parse.
    Parse {
        /// File that could not be handled.
        file: Utf8PathBuf,
        /// Parser or layout diagnostic.
        message: String,
    },
    /// At least one rule was broken.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "could not read portal sources: {err}"),
            Self::NonUtf8Name { name } => write!(f, "source name is not UTF-8: {name}"),
            Self::Parse { file, message } => write!(f, "{file}: {message}"),
            Self::Violations(violations) => {
                writeln!(f, "portal layer boundaries broken:")?;
                violations
                    .iter()
                    .try_for_each(|violation| writeln!(f, "- {violation}"))
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// One Rust file handed to [`lint_sources`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `portal/src`.
    pub file: Utf8PathBuf,
    /// Source text.
    pub contents: String,
}

impl LintSource {
    /// Pair a relative path with its contents.
    pub fn new(file: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            contents: contents.into(),
        }
    }

    fn is_test_file(&self) -> bool {
        self.file.file_name() == Some("tests.rs")
            || self.file.components().any(|part| part.as_str() == "tests")
    }
}

/// Lint the layer directories under `portal_dir/src`.
///
/// # Errors
///
/// Returns [`ArchitectureLintError::Violations`] listing every broken rule,
/// or an I/O, naming or parse error when the tree cannot be read.
pub fn lint_portal_sources(portal_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let src = Dir::open_ambient_dir(portal_dir.join("src"), ambient_authority())?;
    let mut sources = Vec::new();
    for layer in LAYER_DIRS {
        match src.open_dir(layer) {
            Ok(dir) => read_rust_files(&dir, Utf8Path::new(layer), &mut sources)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
    }
    lint_sources(&sources)
}

/// Lint sources that are already in memory.
///
/// # Errors
///
/// See [`lint_portal_sources`].
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message: format!("not under one of {}", LAYER_DIRS.join(", ")),
        })?;
        let syntax =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        let mut names = NameCollector::new(source.is_test_file());
        names.visit_file(&syntax);
        violations.extend(
            layer
                .check(&names)
                .into_iter()
                .map(|message| Violation {
                    file: source.file.clone(),
                    message,
                }),
        );
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

fn read_rust_files(
    dir: &Dir,
    relative: &Utf8Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    let mut entries = Vec::new();
    for entry in dir.entries()? {
        let entry = entry?;
        let name = entry
            .file_name()
            .into_string()
            .map_err(|raw| ArchitectureLintError::NonUtf8Name {
                name: raw.to_string_lossy().into_owned(),
            })?;
        entries.push((name, entry.file_type()?.is_dir()));
    }
    entries.sort();

    for (name, is_dir) in entries {
        let path = relative.join(&name);
        if is_dir {
            read_rust_files(&dir.open_dir(&name)?, &path, sources)?;
        } else if path.extension() == Some("rs") {
            let contents = dir.read_to_string(&name)?;
            sources.push(LintSource::new(path, contents));
        }
    }
    Ok(())
}

/// Portal layer, taken from the first directory of a source path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    fn of(file: &Utf8Path) -> Option<Self> {
        match file.components().next()?.as_str() {
            "domain" => Some(Self::Domain),
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    const fn banned_layers(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["inbound", "outbound"],
            Self::Inbound => &["outbound"],
            Self::Outbound => &["inbound"],
        }
    }

    const fn banned_crates(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &[
                "cap_std",
                "clap",
                "color_eyre",
                "ortho_config",
                "reqwest",
                "tracing_subscriber",
            ],
            Self::Inbound => &["cap_std", "reqwest"],
            Self::Outbound => &["clap", "color_eyre"],
        }
    }

    const fn bans_adapter_types(self) -> bool {
        !matches!(self, Self::Outbound)
    }

    const fn bans_fixtures(self) -> bool {
        !matches!(self, Self::Domain)
    }

    /// Messages for every rule `names` breaks, deduplicated and sorted.
    fn check(self, names: &NameCollector) -> BTreeSet<String> {
        let layer = self.name();
        let mut messages = BTreeSet::new();
        for path in names.production.iter().chain(&names.test) {
            if let Some(root) = layer_root(path).filter(|root| listed(self.banned_layers(), root)) {
                messages.insert(format!("{layer} module must not depend on crate::{root}"));
            }
            if let Some(root) = crate_root(path).filter(|root| listed(self.banned_crates(), root)) {
                messages.insert(format!("{layer} module must not depend on external crate `{root}`"));
            }
            if self.bans_adapter_types() {
                for adapter in path.iter().filter(|seg| listed(&ADAPTER_TYPES, seg)) {
                    messages.insert(format!(
                        "{layer} module must not name adapter `{adapter}`; wire it in main.rs"
                    ));
                }
            }
        }
        if self.bans_fixtures() {
            for path in &names.production {
                for fixture in path.iter().filter(|seg| seg.starts_with(FIXTURE_PREFIX)) {
                    messages.insert(format!(
                        "{layer} production code must not name test double `{fixture}`"
                    ));
                }
            }
        }
        messages
    }
}

/// Portal layer a path points into, if it is an internal path.
fn layer_root(path: &[String]) -> Option<&str> {
    let mut segments = path.iter().map(String::as_str).peekable();
    if segments.peek() == Some(&"portal") {
        segments.next();
    }
    segments
        .find(|seg| !matches!(*seg, "crate" | "self" | "super"))
        .filter(|seg| listed(&LAYER_DIRS, seg))
}

fn listed(names: &[&str], name: &str) -> bool {
    names.iter().any(|entry| *entry == name)
}

/// First segment of a path that leaves the crate.
fn crate_root(path: &[String]) -> Option<&str> {
    path.first()
        .map(String::as_str)
        .filter(|root| !matches!(*root, "crate" | "self" | "super" | "portal"))
}

/// Every path a file names, split by whether it sits in test code.
struct NameCollector {
    production: BTreeSet<Vec<String>>,
    test: BTreeSet<Vec<String>>,
    in_test: bool,
}

impl NameCollector {
    fn new(test_file: bool) -> Self {
        Self {
            production: BTreeSet::new(),
            test: BTreeSet::new(),
            in_test: test_file,
        }
    }

    fn record(&mut self, path: Vec<String>) {
        if path.is_empty() {
            return;
        }
        if self.in_test {
            self.test.insert(path);
        } else {
            self.production.insert(path);
        }
    }

    fn record_use(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.record(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.record(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.record(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use(item, prefix.clone());
                }
            }
        }
    }
}

fn item_attrs(item: &syn::Item) -> &[syn::Attribute] {
    match item {
        syn::Item::Const(item) => &item.attrs,
        syn::Item::Enum(item) => &item.attrs,
        syn::Item::Fn(item) => &item.attrs,
        syn::Item::Impl(item) => &item.attrs,
        syn::Item::Macro(item) => &item.attrs,
        syn::Item::Mod(item) => &item.attrs,
        syn::Item::Static(item) => &item.attrs,
        syn::Item::Struct(item) => &item.attrs,
        syn::Item::Trait(item) => &item.attrs,
        syn::Item::Type(item) => &item.attrs,
        syn::Item::Use(item) => &item.attrs,
        _ => &[],
    }
}

fn is_cfg_test(attr: &syn::Attribute) -> bool {
    attr.path().is_ident("cfg") && attr.parse_args::<syn::Ident>().is_ok_and(|arg| arg == "test")
}

impl<'ast> Visit<'ast> for NameCollector {
    fn visit_item(&mut self, node: &'ast syn::Item) {
        let outer = self.in_test;
        self.in_test = outer || item_attrs(node).iter().any(is_cfg_test);
        syn::visit::visit_item(self, node);
        self.in_test = outer;
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use(&node.tree, Vec::new());
    }

    fn visit_path(&mut self, node: &'ast syn::Path) {
        self.record(node.segments.iter().map(|seg| seg.ident.to_string()).collect());
        syn::visit::visit_path(self, node);
    }
}

#[cfg(test)]
mod tests;
