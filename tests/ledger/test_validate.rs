// Tests for `validate` over on-disk ledger files.

use crate::common::TestRepo;

fn two_packs() -> TestRepo {
    let repo = TestRepo::new();
    repo.write_package_yml(".", "")
        .write_package_yml("packs/apples", "")
        .write_package_yml("packs/tools", "");
    repo
}

#[test]
fn test_clean_repository_validates() {
    let repo = two_packs();
    let result = repo.engine().validate().unwrap();
    assert_eq!(result.status, "ok");
    assert_eq!(result.command, "validate");
    assert!(result.errors.is_empty());
}

#[test]
fn test_exclusion_owned_by_other_package() {
    let repo = two_packs();
    repo.write_file(
        "packs/apples/package_palisade_todo.yml",
        "privacy:\n  Exclude:\n    - packs/tools/app/public/tool.rb\n",
    );
    let result = repo.engine().validate().unwrap();
    assert_eq!(result.status, "error");
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("privacy"));
    assert!(result.errors[0].contains("packs/tools/app/public/tool.rb"));
    assert!(result.errors[0].contains("does not belong to packs/apples"));
}

#[test]
fn test_strict_failure_mode_forbids_exclusions() {
    let repo = two_packs();
    repo.write_file(
        "packs/apples/package_palisade.yml",
        "privacy:\n  Enabled: true\n  FailureMode: strict\n",
    )
    .write_file(
        "packs/apples/package_palisade_todo.yml",
        "privacy:\n  Exclude:\n    - packs/apples/app/services/apples/tool.rb\n",
    );
    let result = repo.engine().validate().unwrap();
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("FailureMode: strict"));
    assert!(result.errors[0].contains("`packs/apples/app/services/apples/tool.rb`"));
}

#[test]
fn test_required_rule_missing_from_enablement() {
    let repo = two_packs();
    let mut config = palisade_core::config::PalisadeConfig::default();
    config.pack_level.required_rules = vec![palisade_core::types::Rule::Privacy];
    repo.write_config(&config)
        .write_file("packs/apples/package_palisade.yml", "dependency:\n  Enabled: true\n");
    let result = repo.engine().validate().unwrap();
    assert_eq!(
        result.errors,
        vec!["packs/apples/package_palisade.yml is missing configuration for privacy."]
    );
}

#[test]
fn test_rule_not_permitted_per_pack() {
    let repo = two_packs();
    let mut config = palisade_core::config::PalisadeConfig::default();
    config.pack_level.permitted_rules = vec![palisade_core::types::Rule::Privacy];
    repo.write_config(&config).write_file(
        "packs/apples/package_palisade_todo.yml",
        "dependency:\n  Exclude:\n    - packs/apples/app/public/apples.rb\n",
    );
    let result = repo.engine().validate().unwrap();
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("contains invalid configuration for dependency"));
    assert!(result.errors[0].contains("package_palisade_todo.yml"));
}
