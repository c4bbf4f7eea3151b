// Tests for ledger suppression: todo exclusions, packwerk todos and exempt
// constant substrings.

use palisade_enforce::ScanMode;

use crate::common::{apples_and_tools, boundary_config, TOOL};

#[test]
fn test_excluded_path_is_counted_not_reported() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    repo.write_config(&boundary_config()).write_file(
        "packs/tools/package_palisade_todo.yml",
        "dependency:\n  Exclude:\n    - packs/tools/app/public/tool.rb\n",
    );
    let mut engine = repo.engine();

    let report = engine.check(&[TOOL.to_string()]).unwrap();
    assert_eq!(report.status, "ok");
    assert!(report.errors.is_empty());
    assert_eq!(report.info.suppressed, 1);

    let unfiltered = engine.scan(&[TOOL.to_string()], ScanMode::Regenerate).unwrap();
    assert_eq!(unfiltered.errors.len(), 1);
}

#[test]
fn test_root_todo_applies_to_every_package() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    repo.write_config(&boundary_config()).write_file(
        "package_palisade_todo.yml",
        "dependency:\n  Exclude:\n    - packs/tools/app/public/tool.rb\n",
    );
    let result = repo.engine().check(&[TOOL.to_string()]).unwrap();
    assert!(result.errors.is_empty());
    assert_eq!(result.info.suppressed, 1);
}

#[test]
fn test_exclusion_for_other_rule_does_not_suppress() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    repo.write_config(&boundary_config()).write_file(
        "packs/tools/package_palisade_todo.yml",
        "privacy:\n  Exclude:\n    - packs/tools/app/public/tool.rb\n",
    );
    let result = repo.engine().check(&[TOOL.to_string()]).unwrap();
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn test_packwerk_todo_of_referencing_package() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    repo.write_config(&boundary_config()).write_file(
        "packs/tools/package_todo.yml",
        "---\npacks/apples:\n  \"::Apples\":\n    violations:\n    - dependency\n    files:\n    - packs/tools/app/public/tool.rb\n",
    );
    let result = repo.engine().check(&[TOOL.to_string()]).unwrap();
    assert!(result.errors.is_empty());
}

#[test]
fn test_packwerk_todo_of_defining_package_is_ignored() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    repo.write_config(&boundary_config()).write_file(
        "packs/apples/package_todo.yml",
        "packs/apples:\n  \"::Apples\":\n    violations:\n    - dependency\n    files:\n    - packs/tools/app/public/tool.rb\n",
    );
    let result = repo.engine().check(&[TOOL.to_string()]).unwrap();
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn test_exempt_substring() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    let mut config = boundary_config();
    config.exempt_constant_substrings = vec!["Apples".to_string()];
    repo.write_config(&config);
    let result = repo.engine().check(&[TOOL.to_string()]).unwrap();
    assert!(result.errors.is_empty());
    assert_eq!(result.info.suppressed, 0);
}

#[test]
fn test_unparsable_todo_suppresses_nothing_and_fails_validation() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    repo.write_config(&boundary_config())
        .write_file("packs/tools/package_palisade_todo.yml", "dependency:\n  Exclude: [unclosed\n");
    let mut engine = repo.engine();

    let result = engine.check(&[TOOL.to_string()]).unwrap();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.info.suppressed, 0);

    let validation = engine.validate().unwrap();
    assert_eq!(validation.status, "error");
    assert_eq!(validation.errors.len(), 1);
    assert!(validation.errors[0]
        .starts_with("packs/tools/package_palisade_todo.yml could not be parsed as YAML"));
}
