//! engine::projector
//!
//! Intended-state projection: applying a command to a cloned snapshot.
//!
//! # Design
//!
//! The projector never touches the filesystem. It deep-clones the
//! document and performs one depth-first traversal, setting the property
//! on the first location whose computed address equals the command's
//! target. Duplicate addresses (possible through relations outside the
//! recognized disambiguation set) silently shadow one another by
//! first-match-wins; that is a documented consequence of the addressing
//! rules, not a uniqueness guarantee.

use serde_json::Value;
use thiserror::Error;

use crate::core::path::{enumerate, Locus};
use crate::core::project::ProjectDocument;
use crate::core::tree::Element;
use crate::core::types::{AstPath, TransformCommand};

/// Errors from projection.
#[derive(Debug, Error, PartialEq)]
pub enum ProjectError {
    /// No location in the tree has the target address.
    #[error("target path not found: {0}")]
    TargetNotFound(AstPath),
}

/// Apply a command to a clone of the document, producing the intended
/// state. The input document is never modified.
pub fn apply(
    document: &ProjectDocument,
    command: &TransformCommand,
) -> Result<ProjectDocument, ProjectError> {
    let mut intended = document.clone();
    let mut applied = false;

    'components: for component in intended.tree.components_mut() {
        let addresses = enumerate(component);
        for address in addresses {
            if address.path != command.target {
                continue;
            }
            // Steps come from the enumeration of this very component, so
            // resolution can only fail if the tree changed underneath us.
            let Some(element) = component.element_mut(&address.steps) else {
                continue;
            };
            set_property(element, address.locus, &command.property, command.value.clone());
            applied = true;
            break 'components;
        }
    }

    if applied {
        Ok(intended)
    } else {
        Err(ProjectError::TargetNotFound(command.target.clone()))
    }
}

/// Set a property on an element, creating it if absent.
///
/// On a `.props` locus the property always lands in the property map. On
/// a node locus, `name` updates the element's declared name (the
/// identifying attribute); everything else lands in the property map.
fn set_property(element: &mut Element, locus: Locus, property: &str, value: Value) {
    match locus {
        Locus::Props => {
            element.props.insert(property.to_string(), value);
        }
        Locus::Node => {
            if property == "name" {
                if let Value::String(name) = value {
                    element.name = Some(name);
                    return;
                }
            }
            element.props.insert(property.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::parse;
    use serde_json::json;

    fn document() -> ProjectDocument {
        ProjectDocument::from_value(json!({
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
                        "path": "client/src/components/Header.tsx",
                        "hooks": [
                            { "type": "CallExpression", "name": "useState",
                              "props": { "arguments": [0] } },
                            { "type": "CallExpression", "name": "useState",
                              "props": { "arguments": [1] } }
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
                                            "props": { "className": "header-light" }
                                        }
                                    ]
                                }
                            ]
                        }
                    }
                ]
            }
        }))
        .expect("document parses")
    }

    mod apply {
        use super::*;

        #[test]
        fn sets_an_existing_property() {
            let doc = document();
            let command = parse(
                "/Program/FunctionDeclaration[name=Header].props.className=\"header-dark\"",
            )
            .unwrap();

            let intended = apply(&doc, &command).unwrap();
            let header = intended.tree.components()[0];
            let decl = &header.definition.elements[0].children[0];
            assert_eq!(decl.prop_str("className"), Some("header-dark"));

            // The input document is untouched.
            let original = doc.tree.components()[0];
            assert_eq!(
                original.definition.elements[0].children[0].prop_str("className"),
                Some("header-light")
            );
        }

        #[test]
        fn creates_an_absent_property() {
            let doc = document();
            let command =
                parse("/Program/FunctionDeclaration[name=Header].props.id=\"main\"").unwrap();

            let intended = apply(&doc, &command).unwrap();
            let decl = &intended.tree.components()[0].definition.elements[0].children[0];
            assert_eq!(decl.prop_str("id"), Some("main"));
        }

        #[test]
        fn everything_else_is_structurally_unchanged() {
            let doc = document();
            let command = parse(
                "/Program/FunctionDeclaration[name=Header].props.className=\"header-dark\"",
            )
            .unwrap();

            let mut intended = apply(&doc, &command).unwrap();
            // Undo the single intended change; the documents must then be equal.
            intended.tree.components_mut()[0].definition.elements[0].children[0]
                .props
                .insert("className".to_string(), json!("header-light"));
            assert_eq!(intended, doc);
        }

        #[test]
        fn absent_target_is_target_not_found() {
            let doc = document();
            let command = parse("/Program/FunctionDeclaration[name=Nope].props.x=1").unwrap();
            assert_eq!(
                apply(&doc, &command),
                Err(ProjectError::TargetNotFound(command.target.clone()))
            );
        }

        #[test]
        fn duplicate_addresses_shadow_first_match_wins() {
            // Both useState hooks share the address
            // /CallExpression[name=useState]; only the first is mutated.
            let doc = document();
            let command = parse("/CallExpression[name=useState].props.lazy=true").unwrap();

            let intended = apply(&doc, &command).unwrap();
            let hooks = &intended.tree.components()[0].hooks;
            assert_eq!(hooks[0].props.get("lazy"), Some(&json!(true)));
            assert_eq!(hooks[1].props.get("lazy"), None);
        }

        #[test]
        fn node_locus_name_updates_the_declared_name() {
            let doc = document();
            let command =
                parse("/Program/FunctionDeclaration[name=Header].name=\"Banner\"").unwrap();

            let intended = apply(&doc, &command).unwrap();
            let decl = &intended.tree.components()[0].definition.elements[0].children[0];
            assert_eq!(decl.name.as_deref(), Some("Banner"));
        }
    }
}
