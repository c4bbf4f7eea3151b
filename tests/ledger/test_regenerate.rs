// Tests for todo regeneration and enablement bootstrap.

use crate::common::{apples_and_tools, boundary_config, TOOL};

const TOOLS_TODO: &str = "packs/tools/package_palisade_todo.yml";
const TOOLS_ENABLEMENT: &str = "packs/tools/package_palisade.yml";

#[test]
fn test_regenerate_writes_todo_and_next_check_is_clean() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    repo.write_config(&boundary_config())
        .write_file(TOOLS_ENABLEMENT, "dependency:\n  Enabled: true\n");
    let mut engine = repo.engine();
    assert_eq!(engine.check_all().unwrap().errors.len(), 1);

    let summary = engine.regenerate_todo(&[]).unwrap();
    assert_eq!(summary.command, "regenerate-todo");
    assert_eq!(summary.written.len(), 1);
    assert_eq!(summary.written[0].path, TOOLS_TODO);
    assert_eq!(repo.read(TOOLS_TODO), "dependency:\n  Exclude:\n  - packs/tools/app/public/tool.rb\n");

    let result = engine.check_all().unwrap();
    assert!(result.errors.is_empty());
    assert_eq!(result.info.suppressed, 1);
    assert_eq!(engine.validate().unwrap().status, "ok");
}

#[test]
fn test_regenerate_needs_enablement_file() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    repo.write_config(&boundary_config());
    let mut engine = repo.engine();

    let summary = engine.regenerate_todo(&[]).unwrap();
    assert!(summary.written.is_empty());
    assert!(!repo.exists(TOOLS_TODO));
    assert_eq!(engine.check_all().unwrap().errors.len(), 1);
}

#[test]
fn test_regenerate_drops_stale_entries() {
    let repo = apples_and_tools("enforce_dependencies: true\ndependencies:\n  - packs/apples\n");
    repo.write_config(&boundary_config()).write_file(
        TOOLS_TODO,
        "dependency:\n  Exclude:\n    - packs/tools/app/public/tool.rb\n    - packs/tools/app/public/gone.rb\n",
    );
    let summary = repo.engine().regenerate_todo(&[]).unwrap();
    assert!(summary.written.is_empty());
    assert_eq!(summary.cleared, vec!["packs/tools"]);
    assert!(!repo.exists(TOOLS_TODO));
}

#[test]
fn test_regenerate_finds_previously_suppressed_findings() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    repo.write_config(&boundary_config())
        .write_file(TOOLS_ENABLEMENT, "dependency:\n  Enabled: true\n")
        .write_file(TOOLS_TODO, "dependency:\n  Exclude:\n    - packs/tools/app/public/tool.rb\n");
    let mut engine = repo.engine();
    assert!(engine.check(&[TOOL.to_string()]).unwrap().errors.is_empty());

    let summary = engine.regenerate_todo(&["packs/tools".to_string()]).unwrap();
    assert_eq!(summary.written.len(), 1);
    assert_eq!(summary.written[0].entries, 1);
    assert!(repo.read(TOOLS_TODO).contains("packs/tools/app/public/tool.rb"));
}

#[test]
fn test_unknown_package_is_skipped() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    repo.write_config(&boundary_config());
    let summary = repo.engine().regenerate_todo(&["packs/bananas".to_string()]).unwrap();
    assert_eq!(summary.files_analyzed, 0);
    assert!(summary.written.is_empty());
}

#[test]
fn test_init_then_validate() {
    let repo = apples_and_tools("");
    let mut config = boundary_config();
    config.pack_level.required_rules = vec![
        palisade_core::types::Rule::Privacy,
        palisade_core::types::Rule::NamespaceConvention,
    ];
    repo.write_config(&config);
    let mut engine = repo.engine();

    let written = engine.init(&[]).unwrap();
    assert_eq!(
        written,
        vec!["packs/apples/package_palisade.yml", "packs/tools/package_palisade.yml"]
    );
    let content = repo.read("packs/apples/package_palisade.yml");
    assert!(content.contains("privacy:\n  Enabled: true\n"));
    assert!(content.contains("namespace_convention:\n  Enabled: true\n"));
    assert_eq!(engine.validate().unwrap().status, "ok");
}
