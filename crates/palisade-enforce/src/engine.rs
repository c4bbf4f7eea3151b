use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use palisade_core::config::PalisadeConfig;
use palisade_core::store::PackageSource;
use palisade_core::types::{Package, Rule};
use palisade_parsers::packages::ManifestReader;
use palisade_parsers::ruby::{ParsedFile, RubyParser};
use palisade_parsers::walker::FileWalker;

use crate::constant_filename::check_constant_filename;
use crate::constant_resolver::ConstantResolver;
use crate::context::{AnalysisContext, Loaded};
use crate::error::EnforceError;
use crate::ledger;
use crate::public_api::check_class_methods_as_public_apis;
use crate::types::{
    LedgerWrite, RegenerateSummary, ResolveResult, ScanInfo, ScanResult, ValidateResult, Violation,
};
use crate::violations;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Whether ledger exclusions hide findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Excluded findings are counted as suppressed and left out of the result.
    Report,
    /// Every finding is returned; used to rebuild todo files.
    Regenerate,
}

/// Core enforcement engine. Owns the analysis context, the resolver and the
/// parser, and runs every enabled rule over a set of files.
pub struct EnforcementEngine {
    pub(crate) ctx: AnalysisContext,
    pub(crate) resolver: ConstantResolver,
    pub(crate) parser: RubyParser,
}

impl EnforcementEngine {
    /// Engine for the repository at `root`, reading `.palisade/palisade.json`
    /// and every `package.yml` beneath it.
    pub fn new(root: &Path) -> Self {
        let config = PalisadeConfig::load(root);
        Self::with_config(root, config, Box::new(ManifestReader::new(root)))
    }

    pub fn with_config(
        root: &Path,
        config: PalisadeConfig,
        source: Box<dyn PackageSource>,
    ) -> Self {
        let ctx = AnalysisContext::new(root, config, source);
        let resolver = ConstantResolver::new(
            root,
            ctx.convention().clone(),
            &ctx.config().convention.public_path,
        );
        Self {
            ctx,
            resolver,
            parser: RubyParser::new(),
        }
    }

    pub fn root(&self) -> &Path {
        self.ctx.root()
    }

    pub fn config(&self) -> &PalisadeConfig {
        self.ctx.config()
    }

    /// Forget packages, ledger files and resolutions; the next call re-reads disk.
    pub fn bust_cache(&mut self) {
        self.ctx.bust_cache();
        self.resolver.bust_cache();
    }

    /// Every source file in the repository, minus ignored paths.
    pub fn source_files(&self) -> Vec<String> {
        self.walker().walk()
    }

    /// Check the given repo-relative files.
    pub fn check(&mut self, files: &[String]) -> Result<ScanResult, EnforceError> {
        self.scan(files, ScanMode::Report)
    }

    /// Check every source file in the repository.
    pub fn check_all(&mut self) -> Result<ScanResult, EnforceError> {
        let files = self.source_files();
        self.check(&files)
    }

    /// Check in-memory source as if it lived at `path`.
    pub fn check_source(&mut self, path: &str, source: &str) -> Result<Vec<Violation>, EnforceError> {
        let path = self.relative_path(path);
        let parsed = self.parser.parse_source(&path, source)?;
        self.analyze(&parsed, ScanMode::Report, &mut ScanInfo::default())
    }

    pub fn scan(&mut self, files: &[String], mode: ScanMode) -> Result<ScanResult, EnforceError> {
        let mut info = ScanInfo::default();
        let mut errors = Vec::new();
        let mut analyzed = Vec::with_capacity(files.len());

        for file in files {
            let path = self.relative_path(file);
            let parsed = self.parser.parse_file(self.ctx.root(), &path)?;
            errors.extend(self.analyze(&parsed, mode, &mut info)?);
            analyzed.push(path);
        }
        info.packages = self.ctx.packages()?.len() as u32;

        let status = if errors.is_empty() { "ok" } else { "error" };
        Ok(ScanResult {
            version: VERSION.to_string(),
            command: "check".to_string(),
            status: status.to_string(),
            files_analyzed: analyzed,
            errors,
            info,
        })
    }

    /// Show how `constant`, written in `from`, resolves.
    pub fn resolve(&mut self, constant: &str, from: &str) -> Result<ResolveResult, EnforceError> {
        let from = self.relative_path(from);
        let loaded = self.ctx.load()?;
        let reference = self.resolver.resolve(loaded.index, constant, &from)?;
        Ok(ResolveResult {
            version: VERSION.to_string(),
            command: "resolve".to_string(),
            constant: constant.to_string(),
            referencing_package: loaded.index.owner_of(&from).map(|p| p.name.clone()),
            from,
            reference,
        })
    }

    /// Check hand-edited todo and enablement files.
    pub fn validate(&mut self) -> Result<ValidateResult, EnforceError> {
        let loaded = self.ctx.load()?;
        let errors = loaded.ledger.validate(loaded.index, &loaded.config.pack_level);
        Ok(ValidateResult {
            version: VERSION.to_string(),
            command: "validate".to_string(),
            status: if errors.is_empty() { "ok" } else { "error" }.to_string(),
            errors,
        })
    }

    /// Rebuild the todo file of each named package (all non-root packages
    /// when `packages` is empty) from a fresh scan of its files. Existing
    /// todo files are only replaced once the scan has succeeded, and new ones
    /// are written only for packages with an enablement file.
    pub fn regenerate_todo(&mut self, packages: &[String]) -> Result<RegenerateSummary, EnforceError> {
        let targets = self.target_packages(packages)?;
        let rules: BTreeSet<Rule> = {
            let config = self.ctx.config();
            config
                .enforce
                .enabled_rules()
                .into_iter()
                .filter(|r| config.pack_level.is_permitted(*r))
                .collect()
        };

        let walker = self.walker();
        let mut files: Vec<String> = targets
            .iter()
            .flat_map(|p| walker.walk_under(&p.path_prefix()))
            .collect();
        files.sort();
        files.dedup();

        // Regenerate mode ignores todo exclusions, so the current files can
        // stay in place until the scan is done.
        let result = self.scan(&files, ScanMode::Regenerate)?;
        let mut grouped: BTreeMap<String, BTreeMap<Rule, BTreeSet<String>>> = BTreeMap::new();
        let opted_in: BTreeSet<String> = {
            let loaded = self.ctx.load()?;
            for violation in result.errors.iter().filter(|v| rules.contains(&v.rule)) {
                let Some(owner) = loaded.index.owner_of(&violation.file) else {
                    continue;
                };
                if !targets.iter().any(|t| t.name == owner.name) {
                    continue;
                }
                grouped
                    .entry(owner.name.clone())
                    .or_default()
                    .entry(violation.rule)
                    .or_default()
                    .insert(violation.file.clone());
            }
            targets
                .iter()
                .filter(|p| loaded.ledger.enablement_for(&p.name).is_some())
                .map(|p| p.name.clone())
                .collect()
        };

        let existing: BTreeSet<String> = targets
            .iter()
            .filter(|p| self.ctx.root().join(ledger::todo_path(p)).is_file())
            .map(|p| p.name.clone())
            .collect();
        let mut summary = RegenerateSummary {
            version: VERSION.to_string(),
            command: "regenerate-todo".to_string(),
            files_analyzed: result.files_analyzed.len() as u32,
            ..RegenerateSummary::default()
        };
        for package in &targets {
            let entries = grouped.remove(&package.name).unwrap_or_default();
            let written = if opted_in.contains(&package.name) {
                ledger::write_todo(self.ctx.root(), package, &entries)?
            } else {
                if !entries.is_empty() {
                    tracing::debug!(
                        package = %package.name,
                        "no enablement file, not writing todo file"
                    );
                }
                ledger::delete_todo(self.ctx.root(), package)?;
                None
            };
            match written {
                Some(path) => {
                    tracing::debug!(package = %package.name, path = %path, "wrote todo file");
                    summary.written.push(LedgerWrite {
                        package: package.name.clone(),
                        path,
                        entries: entries.values().map(|f| f.len() as u32).sum(),
                    });
                }
                None if existing.contains(&package.name) => summary.cleared.push(package.name.clone()),
                None => {}
            }
        }

        self.bust_cache();
        Ok(summary)
    }

    /// Write a default enablement file for each named package (all non-root
    /// packages when `packages` is empty). Returns the written paths.
    pub fn init(&mut self, packages: &[String]) -> Result<Vec<String>, EnforceError> {
        let targets = self.target_packages(packages)?;
        let required = self.ctx.config().pack_level.required_rules.clone();
        let mut written = Vec::with_capacity(targets.len());
        for package in &targets {
            written.push(ledger::write_default_enablement(self.ctx.root(), package, &required)?);
        }
        self.bust_cache();
        Ok(written)
    }

    // -- Private helpers --

    /// Run every enabled rule over one parsed file.
    pub(crate) fn analyze(
        &mut self,
        file: &ParsedFile,
        mode: ScanMode,
        info: &mut ScanInfo,
    ) -> Result<Vec<Violation>, EnforceError> {
        let Loaded {
            index,
            ledger,
            namespaces,
            config,
            convention,
        } = self.ctx.load()?;
        let Some(owner) = index.owner_of(&file.path) else {
            tracing::debug!(path = %file.path, "file is not owned by any package");
            return Ok(Vec::new());
        };
        tracing::debug!(
            path = %file.path,
            package = %owner.name,
            top_level = ?file.top_level_constant(),
            "checking file"
        );

        let enabled = |rule: Rule| config.enforce.is_enabled(rule) && ledger.applies_to(rule, &file.path);
        let mut found = Vec::new();

        // B003
        if enabled(Rule::NamespaceConvention) {
            found.extend(namespaces.check(&file.path, owner));
        }
        // B004
        if enabled(Rule::ConstantFilename) {
            found.extend(check_constant_filename(file, convention));
        }
        // B005
        if enabled(Rule::ClassMethodsAsPublicApis) {
            found.extend(check_class_methods_as_public_apis(
                file,
                owner,
                &config.convention.public_path,
                &config.public_api,
            ));
        }

        // B001 / B002
        let check_dependency = enabled(Rule::Dependency);
        let check_privacy = enabled(Rule::Privacy);
        if check_dependency || check_privacy {
            for site in file.references() {
                if !violations::should_resolve(site, &config.exempt_constant_substrings) {
                    continue;
                }
                info.references_checked += 1;
                let Some(reference) = self.resolver.resolve(index, &site.name, &file.path)? else {
                    continue;
                };
                info.references_resolved += 1;
                if check_dependency {
                    found.extend(violations::check_dependency(&reference, owner, site, ledger));
                }
                if check_privacy {
                    found.extend(violations::check_privacy(
                        &reference,
                        owner,
                        site,
                        ledger,
                        &config.convention.public_path,
                    ));
                }
            }
        }

        if mode == ScanMode::Regenerate {
            return Ok(found);
        }
        let mut reported = Vec::with_capacity(found.len());
        for violation in found {
            let violation = ledger.apply(violation);
            if violation.suppressed {
                info.suppressed += 1;
            } else {
                reported.push(violation);
            }
        }
        Ok(reported)
    }

    fn target_packages(&mut self, names: &[String]) -> Result<Vec<Package>, EnforceError> {
        let index = self.ctx.packages()?;
        if names.is_empty() {
            return Ok(index.all().iter().filter(|p| !p.is_root()).cloned().collect());
        }
        let mut targets = Vec::with_capacity(names.len());
        for name in names {
            let name = name.trim_end_matches('/');
            match index.find(name) {
                Some(p) if !p.is_root() => targets.push(p.clone()),
                Some(_) => tracing::debug!("skipping root package"),
                None => tracing::warn!(package = %name, "unknown package, skipping"),
            }
        }
        Ok(targets)
    }

    fn walker(&self) -> FileWalker {
        let config = self.ctx.config();
        FileWalker::new(self.ctx.root())
            .with_extension(&config.convention.extension)
            .with_ignore_patterns(&config.ignore_patterns)
    }

    /// Repo-relative, `/`-separated form of a path given on the command line.
    fn relative_path(&self, path: &str) -> String {
        let as_path = Path::new(path);
        let relative = as_path.strip_prefix(self.ctx.root()).unwrap_or(as_path);
        let relative = relative.to_string_lossy().replace('\\', "/");
        relative.strip_prefix("./").map(str::to_string).unwrap_or(relative)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
