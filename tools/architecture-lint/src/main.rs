//! Command-line entry point for the portal boundary lint.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;

const MISSING_ROOT: &str = "unable to locate workspace root (directory containing a workspace Cargo.toml)";

fn main() -> ExitCode {
    let mut stderr = io::stderr().lock();
    let Some(root) = workspace_root() else {
        drop(writeln!(stderr, "{MISSING_ROOT}"));
        return ExitCode::FAILURE;
    };
    match architecture_lint::lint_portal_sources(&root.join("portal")) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            drop(writeln!(stderr, "{err}"));
            ExitCode::FAILURE
        }
    }
}

/// First workspace manifest found above the explicit override, the current
/// directory, or this crate's manifest directory, in that order.
fn workspace_root() -> Option<Utf8PathBuf> {
    let candidates = [
        env::var("CARGO_WORKSPACE_DIR").ok().map(Utf8PathBuf::from),
        env::current_dir()
            .ok()
            .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok()),
        Some(Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|start| enclosing_workspace(&start))
}

fn enclosing_workspace(start: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .find(|dir| declares_workspace(dir))
        .map(Utf8Path::to_path_buf)
}

fn declares_workspace(dir: &Utf8Path) -> bool {
    Dir::open_ambient_dir(dir, ambient_authority())
        .and_then(|dir| dir.read_to_string("Cargo.toml"))
        .is_ok_and(|manifest| manifest.contains("[workspace]"))
}
