//! Unit tests for the architecture lint.

use rstest::rstest;

use super::*;

fn lint_one(file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
    lint_sources(&[LintSource::new(file, contents)])
}

fn messages(result: Result<(), ArchitectureLintError>) -> Vec<String> {
    match result {
        Ok(()) => Vec::new(),
        Err(ArchitectureLintError::Violations(violations)) => {
            violations.into_iter().map(|violation| violation.message).collect()
        }
        Err(other) => panic!("expected violations, got {other:?}"),
    }
}

#[rstest]
#[case(
    "inbound/cli/run.rs",
    "use crate::domain::ports::PortalApi; fn handler<A: PortalApi>(_api: &A) {}",
    true
)]
#[case(
    "inbound/cli/run.rs",
    "use crate::outbound::http::HttpPortalApi; fn handler() { let _ = HttpPortalApi::new; }",
    false
)]
#[case(
    "inbound/cli/run.rs",
    "use super::super::super::outbound::session; fn handler() {}",
    false
)]
#[case(
    "inbound/cli/run.rs",
    "use portal::outbound::session::FileSessionStore; fn handler() {}",
    false
)]
#[case(
    "inbound/cli/render.rs",
    "fn fetch() { let _ = reqwest::Client::new(); }",
    false
)]
#[case("inbound/cli/args.rs", "use clap::Parser; #[derive(Parser)] struct Cli;", true)]
#[case("domain/dashboard.rs", "use crate::inbound::cli; fn thing() {}", false)]
#[case(
    "domain/dashboard.rs",
    "use tracing::warn; fn thing() { warn!(\"evicting\"); }",
    true
)]
#[case("domain/complaint.rs", "use clap::ValueEnum; fn thing() {}", false)]
#[case(
    "outbound/session/file_store.rs",
    "use crate::inbound::cli::Cli; fn thing() {}",
    false
)]
#[case(
    "outbound/http/http_portal.rs",
    "use reqwest::Client; use crate::domain::Error; pub struct HttpPortalApi(Client);",
    true
)]
#[case("outbound/http/dto.rs", "use clap::Args; fn thing() {}", false)]
fn layer_rules(#[case] file: &str, #[case] contents: &str, #[case] ok: bool) {
    let result = lint_one(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
fn adapter_reexport_is_caught_by_name() {
    let found = messages(lint_one(
        "inbound/cli/run.rs",
        "use crate::HttpPortalApi; fn wire() { let _ = HttpPortalApi::new; }",
    ));
    assert_eq!(
        found,
        ["inbound module must not name adapter `HttpPortalApi`; wire it in main.rs"]
    );
}

#[rstest]
#[case("inbound/cli/run.rs", "inbound")]
#[case("outbound/http/http_portal.rs", "outbound")]
fn production_adapters_must_not_name_fixtures(#[case] file: &str, #[case] layer: &str) {
    let found = messages(lint_one(
        file,
        "use crate::domain::ports::FixturePortalApi; fn build() -> FixturePortalApi { FixturePortalApi::default() }",
    ));
    assert_eq!(
        found,
        [format!(
            "{layer} production code must not name test double `FixturePortalApi`"
        )]
    );
}

#[rstest]
fn domain_ports_define_fixtures_freely() {
    let result = lint_one(
        "domain/ports/session_store.rs",
        "pub struct FixtureSessionStore; impl FixtureSessionStore { pub fn new() -> Self { FixtureSessionStore } }",
    );
    assert!(result.is_ok(), "result: {result:?}");
}

#[rstest]
#[case(
    "inbound/cli/run.rs",
    "fn run() {} #[cfg(test)] mod tests { use crate::domain::ports::FixtureSessionStore; }"
)]
#[case(
    "inbound/cli/run/tests.rs",
    "use crate::domain::ports::{FixturePortalApi, FixtureSessionStore};"
)]
#[case(
    "outbound/session/tests/store.rs",
    "fn harness() { let _ = crate::domain::ports::FixtureSessionStore::default(); }"
)]
fn test_code_may_use_fixtures(#[case] file: &str, #[case] contents: &str) {
    let result = lint_one(file, contents);
    assert!(result.is_ok(), "result: {result:?}");
}

#[rstest]
fn test_code_still_respects_layer_boundaries() {
    let found = messages(lint_one(
        "inbound/cli/run/tests.rs",
        "use crate::outbound::session::FileSessionStore;",
    ));
    assert_eq!(
        found,
        [
            "inbound module must not depend on crate::outbound",
            "inbound module must not name adapter `FileSessionStore`; wire it in main.rs",
        ]
    );
}

#[rstest]
fn other_cfg_attributes_are_production_code() {
    let found = messages(lint_one(
        "outbound/http/dto.rs",
        "#[cfg(feature = \"fixtures\")] fn build() { let _ = FixturePortalApi::default(); }",
    ));
    assert_eq!(found.len(), 1);
}

#[rstest]
fn files_outside_the_layers_are_rejected() {
    let result = lint_one("config.rs", "fn thing() {}");
    assert!(matches!(result, Err(ArchitectureLintError::Parse { .. })));
}

#[rstest]
fn repeated_imports_report_once_per_file() {
    let found = messages(lint_one(
        "domain/user.rs",
        "use reqwest::Client; fn a() { let _ = reqwest::Client::new(); }",
    ));
    assert_eq!(found, ["domain module must not depend on external crate `reqwest`"]);
}
