//! core::tree
//!
//! The typed component-tree model.
//!
//! # Schema Design
//!
//! The persisted snapshot uses a closed set of node shapes, dispatched on
//! the `type` field:
//!
//! - `directory` nodes form the project skeleton and carry ordered children
//! - `Component` nodes carry imports, hooks, and a definition (the parsed
//!   body of one component in one source file)
//!
//! Inside a definition, [`Element`] is the generic AST node: a kind string
//! (`Program`, `FunctionDeclaration`, `CallExpression`, markup tags such as
//! `div`, or `text`), an optional declared name, a property map, and
//! ordered children. The external parser represents a component function
//! fused with the root markup element it returns as a single
//! `FunctionDeclaration` node, so declaration-level property edits are
//! renderable.
//!
//! # Traversal
//!
//! Elements hang off a component through three child-bearing relations:
//! `elements` (the definition list), `children` (element nesting), and
//! `hooks`. A position in that space is a replayable list of [`Step`]s,
//! so the same enumeration can serve lookup, mutation, and address
//! computation without repeated ad hoc walks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A node of the project tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    /// A directory grouping further nodes.
    #[serde(rename = "directory")]
    Directory(DirectoryNode),

    /// A parsed component.
    #[serde(rename = "Component")]
    Component(ComponentNode),
}

impl Node {
    /// Display name of the node.
    pub fn name(&self) -> &str {
        match self {
            Node::Directory(dir) => &dir.name,
            Node::Component(component) => &component.name,
        }
    }

    /// All components in this subtree, depth-first in document order.
    pub fn components(&self) -> Vec<&ComponentNode> {
        let mut found = Vec::new();
        self.collect_components(&mut found);
        found
    }

    fn collect_components<'a>(&'a self, into: &mut Vec<&'a ComponentNode>) {
        match self {
            Node::Component(component) => into.push(component),
            Node::Directory(dir) => {
                for child in &dir.children {
                    child.collect_components(into);
                }
            }
        }
    }

    /// Mutable access to all components, depth-first in document order.
    pub fn components_mut(&mut self) -> Vec<&mut ComponentNode> {
        let mut found = Vec::new();
        self.collect_components_mut(&mut found);
        found
    }

    fn collect_components_mut<'a>(&'a mut self, into: &mut Vec<&'a mut ComponentNode>) {
        match self {
            Node::Component(component) => into.push(component),
            Node::Directory(dir) => {
                for child in &mut dir.children {
                    child.collect_components_mut(into);
                }
            }
        }
    }
}

/// A directory node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryNode {
    /// Directory name.
    pub name: String,
    /// Project-relative path.
    pub path: String,
    /// Ordered children.
    #[serde(default)]
    pub children: Vec<Node>,
}

/// A component node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    /// Declared component name.
    pub name: String,
    /// Source file name.
    #[serde(rename = "fileName", default)]
    pub file_name: String,
    /// Path of the source file the component lives in.
    pub path: String,
    /// Import declarations of the source file.
    #[serde(default)]
    pub imports: Vec<Import>,
    /// Hook-like calls in the component body.
    #[serde(default)]
    pub hooks: Vec<Element>,
    /// The parsed component body.
    #[serde(default)]
    pub definition: ComponentDef,
}

impl ComponentNode {
    /// Resolve a step list to an element, if it exists.
    pub fn element(&self, steps: &[Step]) -> Option<&Element> {
        let (first, rest) = steps.split_first()?;
        let mut current = match first.relation {
            Relation::Elements => self.definition.elements.get(first.index)?,
            Relation::Hooks => self.hooks.get(first.index)?,
            Relation::Children => return None,
        };
        for step in rest {
            if step.relation != Relation::Children {
                return None;
            }
            current = current.children.get(step.index)?;
        }
        Some(current)
    }

    /// Resolve a step list to a mutable element, if it exists.
    pub fn element_mut(&mut self, steps: &[Step]) -> Option<&mut Element> {
        let (first, rest) = steps.split_first()?;
        let mut current = match first.relation {
            Relation::Elements => self.definition.elements.get_mut(first.index)?,
            Relation::Hooks => self.hooks.get_mut(first.index)?,
            Relation::Children => return None,
        };
        for step in rest {
            if step.relation != Relation::Children {
                return None;
            }
            current = current.children.get_mut(step.index)?;
        }
        Some(current)
    }
}

/// The parsed body of a component.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentDef {
    /// Tag of the root markup element, when the parser recorded one.
    #[serde(rename = "rootElementType", default, skip_serializing_if = "Option::is_none")]
    pub root_element_type: Option<String>,
    /// Ordered top-level elements.
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// An import declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Import {
    /// Module specifier.
    pub source: String,
    /// Imported names.
    #[serde(default)]
    pub specifiers: Vec<String>,
}

/// A generic AST element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Node kind: `Program`, `FunctionDeclaration`, `CallExpression`,
    /// `JSXElement`, a markup tag such as `div`, or `text`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Declared name or recognized call name, when the kind has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Property map.
    #[serde(default)]
    pub props: Map<String, Value>,
    /// Ordered children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element of the given kind with no properties.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            props: Map::new(),
            children: Vec::new(),
        }
    }

    /// A string-valued property, if present.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }
}

/// Child-bearing relations an element can be reached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// A component definition's top-level element list.
    Elements,
    /// A component's hook call list.
    Hooks,
    /// An element's nested children.
    Children,
}

impl Relation {
    /// Whether sibling-ordinal disambiguation applies to this relation.
    ///
    /// The recognized set is fixed; siblings reachable through other
    /// relations can collapse to identical addresses. That limitation is
    /// covered by tests, not corrected here.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Relation::Hooks)
    }
}

/// One step from a parent to a child element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Relation followed.
    pub relation: Relation,
    /// Index within that relation.
    pub index: usize,
}

impl Step {
    /// Convenience constructor.
    pub fn new(relation: Relation, index: usize) -> Self {
        Self { relation, index }
    }
}
