// Tests for B003 namespace convention violations.

use palisade_core::config::{EnforceConfig, NamespaceConfig, PalisadeConfig};
use palisade_core::types::Rule;

use crate::common::TestRepo;

fn namespace_config(include_packs: &[&str], globally_permitted: &[&str]) -> PalisadeConfig {
    PalisadeConfig {
        enforce: EnforceConfig {
            dependency: false,
            privacy: false,
            namespace_convention: true,
            constant_filename: false,
            class_methods_as_public_apis: false,
        },
        namespaces: NamespaceConfig {
            include_packs: include_packs.iter().map(|s| s.to_string()).collect(),
            globally_permitted: globally_permitted.iter().map(|s| s.to_string()).collect(),
        },
        ..PalisadeConfig::default()
    }
}

fn repo(config: &PalisadeConfig) -> TestRepo {
    let repo = TestRepo::new();
    repo.write_config(config)
        .write_package_yml(".", "")
        .write_package_yml("packs/apples", "")
        .write_package_yml("packs/tools", "")
        .write_file("packs/apples/app/services/tool.rb", "class Tool\nend\n")
        .write_file("packs/tools/app/services/apples/blah.rb", "module Apples\n  class Blah\n  end\nend\n")
        .write_file("app/services/tool.rb", "class Tool\nend\n");
    repo
}

#[test]
fn test_opted_in_package_outside_its_namespace() {
    let repo = repo(&namespace_config(&["packs/apples"], &[]));
    let result = repo
        .engine()
        .check(&["packs/apples/app/services/tool.rb".to_string()])
        .unwrap();
    assert_eq!(result.errors.len(), 1);
    let v = &result.errors[0];
    assert_eq!(v.rule, Rule::NamespaceConvention);
    assert_eq!(v.code, "B003");
    assert_eq!(v.line, 1);
    assert_eq!(
        v.message,
        "Based on the filepath, this file defines `Tool`, but it should be namespaced as `Apples::Tool` with path `packs/apples/app/services/apples/tool.rb`."
    );
    assert_eq!(
        v.fix_hint.as_deref(),
        Some("Move this file to packs/apples/app/services/apples/tool.rb")
    );
}

#[test]
fn test_other_package_inside_reserved_namespace() {
    let repo = repo(&namespace_config(&["packs/apples"], &[]));
    let result = repo
        .engine()
        .check(&["packs/tools/app/services/apples/blah.rb".to_string()])
        .unwrap();
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0]
        .message
        .contains("`packs/apples` prevents other packs from sitting in the `Apples` namespace"));
}

#[test]
fn test_packages_not_opted_in_are_free() {
    let repo = repo(&namespace_config(&[], &[]));
    let result = repo.engine().check_all().unwrap();
    assert!(result.errors.is_empty());
}

#[test]
fn test_globally_permitted_namespace() {
    let repo = repo(&namespace_config(&["packs/apples"], &["Tool"]));
    let result = repo
        .engine()
        .check(&["packs/apples/app/services/tool.rb".to_string()])
        .unwrap();
    assert!(result.errors.is_empty());
}

#[test]
fn test_root_package_is_never_checked() {
    let repo = repo(&namespace_config(&["packs/apples", "."], &[]));
    let result = repo.engine().check(&["app/services/tool.rb".to_string()]).unwrap();
    assert!(result.errors.is_empty());
}

#[test]
fn test_automatic_namespace_package_is_exempt() {
    let repo = repo(&namespace_config(&["packs/apples"], &[]));
    repo.write_package_yml("packs/apples", "metadata:\n  automatic_pack_namespace: true\n");
    let result = repo
        .engine()
        .check(&["packs/apples/app/services/tool.rb".to_string()])
        .unwrap();
    assert!(result.errors.is_empty());
}

#[test]
fn test_enablement_include_restricts_rule_to_enabling_packs() {
    let repo = repo(&namespace_config(&["packs/apples"], &[]));
    repo.write_file("packs/tools/package_palisade.yml", "namespace_convention:\n  Enabled: true\n");
    let result = repo
        .engine()
        .check(&[
            "packs/apples/app/services/tool.rb".to_string(),
            "packs/tools/app/services/apples/blah.rb".to_string(),
        ])
        .unwrap();
    let files: Vec<&str> = result.errors.iter().map(|v| v.file.as_str()).collect();
    assert_eq!(files, vec!["packs/tools/app/services/apples/blah.rb"]);
}
