// Tests for package discovery and file ownership.

use palisade_core::store::{PackageIndex, PackageSource};
use palisade_parsers::packages::ManifestReader;
use palisade_parsers::walker::FileWalker;

use crate::common::TestRepo;

fn nested_repo() -> TestRepo {
    let repo = TestRepo::new();
    repo.write_package_yml(".", "")
        .write_package_yml("packs/fruits", "")
        .write_package_yml("packs/fruits/apples", "enforce_privacy: true\n")
        .write_package_yml("packs/tools", "dependencies:\n  - packs/fruits\n")
        .write_file("app/models/user.rb", "")
        .write_file("packs/fruits/app/services/fruits.rb", "")
        .write_file("packs/fruits/apples/app/public/apples.rb", "")
        .write_file("packs/tools/app/services/tools/saw.rb", "");
    repo
}

fn index(repo: &TestRepo) -> PackageIndex {
    PackageIndex::new(ManifestReader::new(repo.root()).load_packages().unwrap()).unwrap()
}

#[test]
fn test_every_file_has_exactly_one_owner() {
    let repo = nested_repo();
    let index = index(&repo);
    let expected = [
        ("app/models/user.rb", "."),
        ("packs/fruits/app/services/fruits.rb", "packs/fruits"),
        ("packs/fruits/apples/app/public/apples.rb", "packs/fruits/apples"),
        ("packs/tools/app/services/tools/saw.rb", "packs/tools"),
    ];
    let files = FileWalker::new(repo.root()).walk();
    assert_eq!(files.len(), expected.len());
    for (file, owner) in expected {
        assert!(files.iter().any(|f| f == file));
        assert_eq!(index.owner_of(file).map(|p| p.name.as_str()), Some(owner), "{file}");
    }
}

#[test]
fn test_manifest_fields() {
    let repo = nested_repo();
    let index = index(&repo);
    assert_eq!(index.len(), 4);
    assert!(index.find("packs/fruits/apples").unwrap().enforces_privacy);
    assert!(index.find("packs/tools").unwrap().depends_on("packs/fruits"));
    assert!(index.root().is_some());
}

#[test]
fn test_root_package_optional() {
    let repo = TestRepo::new();
    repo.write_package_yml("packs/apples", "");
    let index = index(&repo);
    assert!(index.root().is_none());
    assert!(index.owner_of("lib/tasks/cleanup.rb").is_none());
}
