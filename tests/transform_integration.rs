//! Integration tests for the transformation engine.
//!
//! These tests exercise the full command flow against real files:
//! Parse → Project → Locate → Transact → Verify → Commit, plus the
//! rollback path for every failure inside the mutation window.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tempfile::TempDir;

use graftwork::core::command::parse;
use graftwork::core::synth::render_component;
use graftwork::core::tree::Node;
use graftwork::core::ProjectDocument;
use graftwork::engine::{self, Engine, EngineError};
use graftwork::pipeline::{DeployError, MockDeployer};
use graftwork::survey::{MockSurveyor, SurveyError};
use graftwork::ui::{Logger, Verbosity};

// =============================================================================
// Test Fixtures
// =============================================================================

/// A project on disk: a component tree document plus the component
/// source file rendered from it, so the before-text check finds its
/// exactly-one occurrence.
struct TestProject {
    dir: TempDir,
    document: ProjectDocument,
}

impl TestProject {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let header_path = dir.path().join("Header.tsx");
        let footer_path = dir.path().join("Footer.tsx");

        let document = ProjectDocument::from_value(json!({
            "projectName": "Navigator",
            "rootDirectory": "client",
            "tree": {
                "type": "directory",
                "name": "src",
                "path": "client/src",
                "children": [
                    {
                        "type": "Component",
                        "name": "Header",
                        "fileName": "Header.tsx",
                        "path": header_path.display().to_string(),
                        "imports": [
                            { "source": "react", "specifiers": ["useState"] }
                        ],
                        "hooks": [
                            { "type": "CallExpression", "name": "useState",
                              "props": { "arguments": [false] } }
                        ],
                        "definition": {
                            "rootElementType": "header",
                            "elements": [
                                {
                                    "type": "Program",
                                    "children": [
                                        {
                                            "type": "FunctionDeclaration",
                                            "name": "Header",
                                            "props": { "className": "header-light" },
                                            "children": [
                                                { "type": "text",
                                                  "props": { "content": "Welcome" } }
                                            ]
                                        }
                                    ]
                                }
                            ]
                        }
                    },
                    {
                        "type": "Component",
                        "name": "Footer",
                        "fileName": "Footer.tsx",
                        "path": footer_path.display().to_string(),
                        "definition": {
                            "rootElementType": "footer",
                            "elements": [
                                {
                                    "type": "Program",
                                    "children": [
                                        {
                                            "type": "FunctionDeclaration",
                                            "name": "Footer",
                                            "props": { "className": "footer" }
                                        }
                                    ]
                                }
                            ]
                        }
                    }
                ]
            }
        }))
        .expect("fixture document parses");

        let project = Self { dir, document };
        project.materialize("Header");
        project.materialize("Footer");
        project
    }

    /// Render a component's current tree state to its source file.
    fn materialize(&self, name: &str) {
        let component = self.component(name);
        fs::write(&component.path, render_component(component)).expect("write component file");
    }

    fn component(&self, name: &str) -> &graftwork::core::tree::ComponentNode {
        self.document
            .tree
            .components()
            .into_iter()
            .find(|c| c.name == name)
            .expect("fixture component exists")
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{name}.tsx"))
    }

    /// Prime the mock surveyor with the intended post-commit snapshot
    /// for a command, so round-trip verification passes.
    fn prime(&self, surveyor: &MockSurveyor, raw: &str) -> ProjectDocument {
        let command = parse(raw).expect("fixture command parses");
        let intended = engine::apply(&self.document, &command).expect("projection succeeds");
        let owner = graftwork::core::find_owning_component(&intended.tree, &command.target)
            .expect("owner exists");
        surveyor.set_snapshot(Path::new(&owner.path), Node::Component(owner.clone()));
        intended
    }

    fn engine<'a>(
        &'a self,
        surveyor: &'a MockSurveyor,
        deployer: &'a MockDeployer,
    ) -> Engine<'a> {
        Engine::new(
            &self.document,
            surveyor,
            deployer,
            Logger::new(Verbosity::Quiet),
        )
    }
}

const SCENARIO_A: &str =
    "/Program/FunctionDeclaration[name=Header].props.className=\"header-dark\"";

/// Pull the backup staging directory out of a captured log, from the
/// "transaction opened" entry.
fn staging_dir(entries: &Arc<Mutex<Vec<Value>>>) -> PathBuf {
    let entries = entries.lock().unwrap();
    let opened = entries
        .iter()
        .find(|e| e["message"] == "transaction opened")
        .expect("transaction opened was logged");
    PathBuf::from(opened["staging"].as_str().expect("staging field is a path"))
}

// =============================================================================
// Scenario A: happy path
// =============================================================================

#[test]
fn scenario_a_commits_the_property_change() {
    let project = TestProject::new();
    let surveyor = MockSurveyor::new();
    let deployer = MockDeployer::new();
    project.prime(&surveyor, SCENARIO_A);

    let engine = project.engine(&surveyor, &deployer);
    let outcome = engine.run(SCENARIO_A).expect("transformation commits");

    let on_disk = fs::read_to_string(project.file("Header")).unwrap();
    assert!(on_disk.contains("className=\"header-dark\""));
    assert!(!on_disk.contains("header-light"));
    // The untouched parts of the file survive the substitution.
    assert!(on_disk.contains("import { useState } from 'react';"));
    assert!(on_disk.contains("useState(false);"));
    assert!(on_disk.contains("export default Header;"));

    assert!(outcome.deploy_ok());
    assert_eq!(deployer.deploy_count(), 1);
}

#[test]
fn scenario_a_leaves_the_other_component_alone() {
    let project = TestProject::new();
    let surveyor = MockSurveyor::new();
    let deployer = MockDeployer::new();
    project.prime(&surveyor, SCENARIO_A);

    let footer_before = fs::read(project.file("Footer")).unwrap();
    project
        .engine(&surveyor, &deployer)
        .run(SCENARIO_A)
        .expect("transformation commits");
    assert_eq!(fs::read(project.file("Footer")).unwrap(), footer_before);
}

// =============================================================================
// Scenario B: absent target
// =============================================================================

#[test]
fn scenario_b_absent_path_touches_nothing() {
    let project = TestProject::new();
    let surveyor = MockSurveyor::new();
    let deployer = MockDeployer::new();

    let header_before = fs::read(project.file("Header")).unwrap();
    let err = project
        .engine(&surveyor, &deployer)
        .run("/Program/FunctionDeclaration[name=Sidebar].props.x=1")
        .unwrap_err();

    assert_eq!(err.code(), "target_not_found");
    assert_eq!(fs::read(project.file("Header")).unwrap(), header_before);
    assert_eq!(surveyor.call_count(), 0);
    assert_eq!(deployer.deploy_count(), 0);
}

// =============================================================================
// Scenario C: drifted file
// =============================================================================

#[test]
fn scenario_c_drifted_file_reports_and_restores() {
    let project = TestProject::new();
    let surveyor = MockSurveyor::new();
    let deployer = MockDeployer::new();

    // Hand-edit the file so the rendered before-text no longer occurs.
    fs::write(
        project.file("Header"),
        "// manually rewritten\nexport function Header() { return null; }\n",
    )
    .unwrap();
    let drifted = fs::read(project.file("Header")).unwrap();

    let err = project
        .engine(&surveyor, &deployer)
        .run(SCENARIO_A)
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::BeforeTextNotFound { occurrences: 0, .. }
    ));
    assert_eq!(fs::read(project.file("Header")).unwrap(), drifted);
    assert_eq!(deployer.deploy_count(), 0);
}

#[test]
fn duplicated_before_text_is_ambiguous() {
    let project = TestProject::new();
    let surveyor = MockSurveyor::new();
    let deployer = MockDeployer::new();

    // Duplicate the rendered text: two occurrences, no unique site.
    let rendered = fs::read_to_string(project.file("Header")).unwrap();
    fs::write(project.file("Header"), format!("{rendered}{rendered}")).unwrap();
    let doubled = fs::read(project.file("Header")).unwrap();

    let err = project
        .engine(&surveyor, &deployer)
        .run(SCENARIO_A)
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::BeforeTextNotFound { occurrences: 2, .. }
    ));
    assert_eq!(fs::read(project.file("Header")).unwrap(), doubled);
}

// =============================================================================
// Atomicity on verification failure
// =============================================================================

#[test]
fn failed_verification_restores_original_bytes() {
    let project = TestProject::new();
    let surveyor = MockSurveyor::new();
    let deployer = MockDeployer::new();

    // The re-parse reports the pre-mutation structure: verification
    // must fail and the file must come back byte-identical.
    let owner = project.component("Header");
    surveyor.set_snapshot(Path::new(&owner.path), Node::Component(owner.clone()));
    let before = fs::read(project.file("Header")).unwrap();

    let err = project
        .engine(&surveyor, &deployer)
        .run(SCENARIO_A)
        .unwrap_err();

    assert_eq!(err.code(), "verification_failed");
    assert_eq!(fs::read(project.file("Header")).unwrap(), before);
    assert_eq!(deployer.deploy_count(), 0);
}

#[test]
fn surveyor_crash_restores_original_bytes() {
    let project = TestProject::new();
    let surveyor = MockSurveyor::new();
    let deployer = MockDeployer::new();
    surveyor.fail_with(SurveyError::Process("parser exited 1".to_string()));
    let before = fs::read(project.file("Header")).unwrap();

    let err = project
        .engine(&surveyor, &deployer)
        .run(SCENARIO_A)
        .unwrap_err();

    assert_eq!(err.code(), "collaborator_failed");
    assert_eq!(fs::read(project.file("Header")).unwrap(), before);
}

// =============================================================================
// Verification idempotence
// =============================================================================

#[test]
fn verification_is_idempotent_against_a_stable_snapshot() {
    let project = TestProject::new();
    let surveyor = MockSurveyor::new();
    let intended = project.prime(&surveyor, SCENARIO_A);
    let owner = intended
        .tree
        .components()
        .into_iter()
        .find(|c| c.name == "Header")
        .unwrap();
    let log = Logger::new(Verbosity::Quiet);

    let first = engine::verify::verify(&surveyor, Path::new(&owner.path), owner, &log).unwrap();
    let second = engine::verify::verify(&surveyor, Path::new(&owner.path), owner, &log).unwrap();

    assert!(first);
    assert_eq!(first, second);
    assert_eq!(surveyor.call_count(), 2);
}

// =============================================================================
// Scenario D: sequential commits
// =============================================================================

#[test]
fn scenario_d_sequential_commits_compose_without_staging_residue() {
    let first_project = TestProject::new();
    let surveyor = MockSurveyor::new();
    let deployer = MockDeployer::new();
    let intended = first_project.prime(&surveyor, SCENARIO_A);

    let (first_log, first_entries) = Logger::captured(Verbosity::Debug);
    Engine::new(&first_project.document, &surveyor, &deployer, first_log)
        .run(SCENARIO_A)
        .expect("first commit");
    assert!(!staging_dir(&first_entries).exists());

    // Second run works from the updated tree, exactly as a reload
    // through the surveyor would produce it.
    let second_doc = intended;
    const SECOND: &str = "/Program/FunctionDeclaration[name=Header].props.id=\"site-header\"";
    let command = parse(SECOND).unwrap();
    let second_intended = engine::apply(&second_doc, &command).unwrap();
    let owner = graftwork::core::find_owning_component(&second_intended.tree, &command.target)
        .unwrap();
    surveyor.set_snapshot(Path::new(&owner.path), Node::Component(owner.clone()));

    let (second_log, second_entries) = Logger::captured(Verbosity::Debug);
    Engine::new(&second_doc, &surveyor, &deployer, second_log)
        .run(SECOND)
        .expect("second commit");
    assert!(!staging_dir(&second_entries).exists());

    let on_disk = fs::read_to_string(first_project.file("Header")).unwrap();
    assert!(on_disk.contains("className=\"header-dark\""));
    assert!(on_disk.contains("id=\"site-header\""));
    assert_eq!(deployer.deploy_count(), 2);
}

// =============================================================================
// Deploy is fire-and-forget
// =============================================================================

#[test]
fn deploy_failure_reported_but_commit_stands() {
    let project = TestProject::new();
    let surveyor = MockSurveyor::new();
    let deployer = MockDeployer::new();
    project.prime(&surveyor, SCENARIO_A);
    deployer.fail_with(DeployError::Process("build exited 1".to_string()));

    let outcome = project
        .engine(&surveyor, &deployer)
        .run(SCENARIO_A)
        .expect("transformation still commits");

    assert!(!outcome.deploy_ok());
    let on_disk = fs::read_to_string(project.file("Header")).unwrap();
    assert!(on_disk.contains("className=\"header-dark\""));
}
