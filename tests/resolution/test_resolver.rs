// Tests for constant resolution through the engine.

use palisade_enforce::EnforceError;

use crate::common::{apples_and_tools, TestRepo, TOOL};

#[test]
fn test_resolve_public_constant() {
    let repo = apples_and_tools("enforce_dependencies: true\n");
    let result = repo.engine().resolve("Apples", TOOL).unwrap();
    assert_eq!(result.command, "resolve");
    assert_eq!(result.referencing_package.as_deref(), Some("packs/tools"));
    let reference = result.reference.unwrap();
    assert_eq!(reference.defining_package.name, "packs/apples");
    assert_eq!(reference.definition_path, "packs/apples/app/public/apples.rb");
    assert_eq!(reference.root_namespace, "Apples");
    assert!(reference.is_public);
}

#[test]
fn test_resolve_strips_leading_scope() {
    let repo = apples_and_tools("");
    let result = repo.engine().resolve("::Apples", TOOL).unwrap();
    assert_eq!(result.reference.unwrap().identifier, "Apples");
}

#[test]
fn test_resolve_nested_package_by_last_name() {
    let repo = TestRepo::new();
    repo.write_package_yml("packs/fruits/apple_trees", "")
        .write_file("packs/fruits/apple_trees/app/models/apple_trees/orchard.rb", "");
    let result = repo
        .engine()
        .resolve("AppleTrees::Orchard", "app/models/user.rb")
        .unwrap();
    let reference = result.reference.unwrap();
    assert_eq!(reference.defining_package.name, "packs/fruits/apple_trees");
    assert!(!reference.is_public);
    assert!(result.referencing_package.is_none());
}

#[test]
fn test_resolve_shared_concern() {
    let repo = TestRepo::new();
    repo.write_package_yml("packs/apples", "")
        .write_file("packs/apples/app/models/concerns/apples/ripe.rb", "");
    let reference = repo
        .engine()
        .resolve("Apples::Ripe", "app/x.rb")
        .unwrap()
        .reference
        .unwrap();
    assert_eq!(reference.definition_path, "packs/apples/app/models/concerns/apples/ripe.rb");
}

#[test]
fn test_resolve_without_matching_package_is_none() {
    let repo = apples_and_tools("");
    assert!(repo.engine().resolve("ActiveRecord::Base", TOOL).unwrap().reference.is_none());
    assert!(repo.engine().resolve("Apples::Missing", TOOL).unwrap().reference.is_none());
}

#[test]
fn test_two_definitions_are_fatal() {
    let repo = TestRepo::new();
    repo.write_package_yml("packs/apples", "")
        .write_file("packs/apples/app/public/apples/tool.rb", "")
        .write_file("packs/apples/app/services/apples/tool.rb", "");
    let err = repo.engine().resolve("Apples::Tool", "app/x.rb").unwrap_err();
    match err {
        EnforceError::AmbiguousConstant { constant, candidates } => {
            assert_eq!(constant, "Apples::Tool");
            assert_eq!(
                candidates,
                vec![
                    "packs/apples/app/public/apples/tool.rb",
                    "packs/apples/app/services/apples/tool.rb",
                ]
            );
        }
        other => panic!("expected AmbiguousConstant, got {other:?}"),
    }
}

#[test]
fn test_new_file_seen_after_bust_cache() {
    let repo = apples_and_tools("");
    let mut engine = repo.engine();
    assert!(engine.resolve("Apples::Basket", TOOL).unwrap().reference.is_none());

    repo.write_file("packs/apples/app/public/apples/basket.rb", "");
    assert!(engine.resolve("Apples::Basket", TOOL).unwrap().reference.is_none());
    engine.bust_cache();
    assert!(engine.resolve("Apples::Basket", TOOL).unwrap().reference.is_some());
}
