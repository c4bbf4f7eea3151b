// Tests for B001 dependency violations over on-disk repositories.

use palisade_core::types::Rule;

use crate::common::{apples_and_tools, boundary_config, TOOL};

#[test]
fn test_undeclared_dependency_reported_at_reference_site() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    repo.write_config(&boundary_config());
    let result = repo.engine().check(&[TOOL.to_string()]).unwrap();

    assert_eq!(result.status, "error");
    assert_eq!(result.errors.len(), 1);
    let v = &result.errors[0];
    assert_eq!(v.rule, Rule::Dependency);
    assert_eq!(v.code, "B001");
    assert_eq!(v.file, TOOL);
    assert_eq!((v.line, v.column), (3, 4));
    assert_eq!(v.constant.as_deref(), Some("Apples"));
    assert!(v.message.contains("`packs/apples`"));
    assert!(v.message.contains("`packs/tools`"));
    assert_eq!(
        v.fix_hint.as_deref(),
        Some("Add `packs/apples` to the dependencies in packs/tools/package.yml")
    );
}

#[test]
fn test_declaring_dependency_removes_violation() {
    let repo = apples_and_tools("enforce_dependencies: true\ndependencies:\n  - packs/apples\n");
    repo.write_config(&boundary_config());
    let result = repo.engine().check(&[TOOL.to_string()]).unwrap();
    assert_eq!(result.status, "ok");
    assert!(result.errors.is_empty());
}

#[test]
fn test_strict_enforcement_counts_as_enforcing() {
    let repo = apples_and_tools("enforce_dependencies: strict\n");
    repo.write_config(&boundary_config());
    let result = repo.engine().check(&[TOOL.to_string()]).unwrap();
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn test_unenforced_package_may_use_anything() {
    let repo = apples_and_tools("enforce_dependencies: false\n");
    repo.write_config(&boundary_config());
    let result = repo.engine().check(&[TOOL.to_string()]).unwrap();
    assert!(result.errors.is_empty());
    assert_eq!(result.info.references_resolved, 1);
}

#[test]
fn test_unresolvable_constant_is_a_soft_miss() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    repo.write_config(&boundary_config());
    repo.write_file(TOOL, "class Tool\n  def prune\n    Rails.logger.info(Bananas::Peel)\n  end\nend\n");
    let result = repo.engine().check(&[TOOL.to_string()]).unwrap();
    assert!(result.errors.is_empty());
    assert_eq!(result.info.references_resolved, 0);
}

#[test]
fn test_check_all_walks_every_file() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    repo.write_config(&boundary_config());
    repo.write_file("packs/tools/app/services/tools/sharpener.rb", "module Tools\n  class Sharpener\n    Apples::Basket\n  end\nend\n");
    repo.write_file("packs/apples/app/public/apples/basket.rb", "module Apples\n  class Basket\n  end\nend\n");

    let result = repo.engine().check_all().unwrap();
    assert_eq!(
        result.files_analyzed,
        vec![
            "packs/apples/app/public/apples.rb",
            "packs/apples/app/public/apples/basket.rb",
            "packs/tools/app/public/tool.rb",
            "packs/tools/app/services/tools/sharpener.rb",
        ]
    );
    let files: Vec<&str> = result.errors.iter().map(|v| v.file.as_str()).collect();
    assert_eq!(files, vec![TOOL, "packs/tools/app/services/tools/sharpener.rb"]);
}

#[test]
fn test_ignore_patterns_skip_files() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    let mut config = boundary_config();
    config.ignore_patterns = vec!["packs/tools/**".to_string()];
    repo.write_config(&config);

    let result = repo.engine().check_all().unwrap();
    assert_eq!(result.files_analyzed, vec!["packs/apples/app/public/apples.rb"]);
    assert!(result.errors.is_empty());
}
