//! core::path
//!
//! Canonical node addressing within a component snapshot.
//!
//! # Address Scheme
//!
//! An address is a `/`-joined list of segments, one per element on the
//! walk from the component's AST root. Each segment is the element kind,
//! optionally suffixed with an identifying attribute:
//!
//! - `[name=X]` for declaration-like kinds and recognized calls
//! - `[tag=X]` for `JSXElement` (markup whose kind is itself the tag,
//!   such as `div`, needs no suffix)
//!
//! and optionally a sibling ordinal `[i]` when more than one same-kind
//! sibling exists under a recognized child-bearing relation. In addition
//! to its node address, every element's property map is addressable as
//! `<address>.props`, which is the form the command grammar's last-dot
//! split produces for property-map assignments.
//!
//! Addresses are deterministic functions of structure, so independently
//! constructed snapshots of equivalent source yield the same address for
//! the same logical node. That stability is what makes round-trip
//! verification meaningful.
//!
//! # Known Limitation
//!
//! Ordinal disambiguation applies only to the recognized relations
//! (`elements`, `children`). Elements reachable through other relations
//! (`hooks`) can collapse to identical addresses; lookups then resolve to
//! the first match in traversal order. This is covered by tests rather
//! than silently corrected.

use crate::core::tree::{ComponentNode, Element, Node, Relation, Step};
use crate::core::types::AstPath;

/// What an address refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locus {
    /// The element itself.
    Node,
    /// The element's property map.
    Props,
}

/// One addressable location within a component.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    /// The canonical address string.
    pub path: AstPath,
    /// Replayable steps from the component to the element.
    pub steps: Vec<Step>,
    /// Whether the address names the node or its property map.
    pub locus: Locus,
}

/// Enumerate every addressable location in a component.
///
/// This is the single traversal primitive: `contains`, owning-component
/// lookup, projection, and inspection are all filters over its output.
/// Entries appear in depth-first document order, definition elements
/// before hooks; each element contributes its node address followed by
/// its `.props` address.
pub fn enumerate(component: &ComponentNode) -> Vec<Address> {
    let mut out = Vec::new();
    walk_siblings(
        &component.definition.elements,
        Relation::Elements,
        "",
        &[],
        &mut out,
    );
    walk_siblings(&component.hooks, Relation::Hooks, "", &[], &mut out);
    out
}

fn walk_siblings(
    siblings: &[Element],
    relation: Relation,
    prefix: &str,
    steps: &[Step],
    out: &mut Vec<Address>,
) {
    for (index, element) in siblings.iter().enumerate() {
        let ordinal = sibling_ordinal(siblings, index, relation);
        let address = format!("{}/{}", prefix, segment(element, ordinal));

        let mut element_steps = steps.to_vec();
        element_steps.push(Step::new(relation, index));

        out.push(Address {
            path: AstPath::new(address.clone()),
            steps: element_steps.clone(),
            locus: Locus::Node,
        });
        out.push(Address {
            path: AstPath::new(format!("{}.props", address)),
            steps: element_steps.clone(),
            locus: Locus::Props,
        });

        walk_siblings(
            &element.children,
            Relation::Children,
            &address,
            &element_steps,
            out,
        );
    }
}

/// Ordinal among same-kind siblings, when disambiguation applies.
fn sibling_ordinal(siblings: &[Element], index: usize, relation: Relation) -> Option<usize> {
    if !relation.is_recognized() {
        return None;
    }
    let kind = &siblings[index].kind;
    let same_kind = siblings.iter().filter(|s| &s.kind == kind).count();
    if same_kind <= 1 {
        return None;
    }
    Some(
        siblings[..index]
            .iter()
            .filter(|s| &s.kind == kind)
            .count(),
    )
}

/// Compute one address segment for an element.
fn segment(element: &Element, ordinal: Option<usize>) -> String {
    let mut seg = element.kind.clone();

    if let Some(attr) = identifying_attribute(element) {
        seg.push_str(&attr);
    }
    if let Some(i) = ordinal {
        seg.push_str(&format!("[{}]", i));
    }
    seg
}

fn identifying_attribute(element: &Element) -> Option<String> {
    let kind = element.kind.as_str();
    if kind.ends_with("Declaration") || kind.ends_with("Declarator") || kind == "CallExpression" {
        return element.name.as_ref().map(|name| format!("[name={}]", name));
    }
    if kind == "JSXElement" {
        return element.prop_str("tag").map(|tag| format!("[tag={}]", tag));
    }
    None
}

/// True iff some addressable location in the component exactly equals
/// `target`. Exact string match; no prefix or wildcard semantics.
pub fn contains(component: &ComponentNode, target: &AstPath) -> bool {
    enumerate(component)
        .iter()
        .any(|address| &address.path == target)
}

/// The first component in depth-first tree order whose subtree contains
/// `target`.
pub fn find_owning_component<'a>(tree: &'a Node, target: &AstPath) -> Option<&'a ComponentNode> {
    tree.components()
        .into_iter()
        .find(|component| contains(component, target))
}
