//! core::synth
//!
//! Deterministic rendering of a component node to source text.
//!
//! # Design
//!
//! Rendering is a pure function of the node passed in. The engine renders
//! the Before text from the pre-mutation component and the After text from
//! the corresponding component inside the intended state; there is no
//! internal before/after toggle, because the two renders must reflect
//! genuinely different underlying data.
//!
//! Output shape (the template the external parser round-trips):
//!
//! ```text
//! import { A, B } from 'source';
//!
//! export function Name() {
//!   useThing();
//!   return (
//!     <root ...>...</root>
//!   );
//! }
//!
//! export default Name;
//! ```
//!
//! Attribute rendering: `name="literal"` for strings, `name={literal}`
//! for numbers and booleans, `name={jsonLiteral}` otherwise. Elements
//! with no children self-close.

use serde_json::Value;

use crate::core::tree::{ComponentNode, Element};

/// Keys of the property map that are structural, not markup attributes.
const NON_ATTRIBUTE_PROPS: &[&str] = &["tag", "children", "content"];

/// Render a component node to source text.
pub fn render_component(component: &ComponentNode) -> String {
    let mut sections: Vec<String> = Vec::new();

    let imports: Vec<String> = component
        .imports
        .iter()
        .filter(|import| !import.specifiers.is_empty())
        .map(|import| {
            format!(
                "import {{ {} }} from '{}';",
                import.specifiers.join(", "),
                import.source
            )
        })
        .collect();
    if !imports.is_empty() {
        sections.push(imports.join("\n"));
    }

    let ctx = RenderCtx {
        root_tag: component
            .definition
            .root_element_type
            .as_deref()
            .unwrap_or("div"),
        hook_statements: hook_statements(component),
    };

    let body: Vec<String> = component
        .definition
        .elements
        .iter()
        .map(|element| render_element(element, &ctx))
        .collect();
    if !body.is_empty() {
        sections.push(body.join("\n\n"));
    }

    sections.push(format!("export default {};", component.name));

    let mut out = sections.join("\n\n");
    out.push('\n');
    out
}

struct RenderCtx<'a> {
    root_tag: &'a str,
    hook_statements: Vec<String>,
}

fn hook_statements(component: &ComponentNode) -> Vec<String> {
    component
        .hooks
        .iter()
        .filter_map(|hook| {
            let name = hook.name.as_deref()?;
            let args = hook
                .props
                .get("arguments")
                .and_then(Value::as_array)
                .map(|args| {
                    args.iter()
                        .map(render_json_literal)
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            Some(format!("  {}({});", name, args))
        })
        .collect()
}

fn render_element(element: &Element, ctx: &RenderCtx<'_>) -> String {
    match element.kind.as_str() {
        "Program" => element
            .children
            .iter()
            .map(|child| render_element(child, ctx))
            .collect::<Vec<_>>()
            .join("\n\n"),

        "FunctionDeclaration" => {
            let name = element.name.as_deref().unwrap_or("UnknownComponent");
            let tag = element.prop_str("tag").unwrap_or(ctx.root_tag);
            let markup = render_markup(element, tag);

            let mut lines = vec![format!("export function {}() {{", name)];
            lines.extend(ctx.hook_statements.iter().cloned());
            lines.push("  return (".to_string());
            lines.push(format!("    {}", markup));
            lines.push("  );".to_string());
            lines.push("}".to_string());
            lines.join("\n")
        }

        "text" => element.prop_str("content").unwrap_or("").to_string(),

        "JSXElement" => {
            let tag = element.prop_str("tag").unwrap_or("div").to_string();
            render_markup(element, &tag)
        }

        // Markup whose kind is itself the tag.
        _ => render_markup(element, &element.kind),
    }
}

fn render_markup(element: &Element, tag: &str) -> String {
    let mut attrs = String::new();
    for (name, value) in &element.props {
        if NON_ATTRIBUTE_PROPS.contains(&name.as_str()) {
            continue;
        }
        attrs.push_str(&render_attribute(name, value));
    }

    let children: String = element
        .children
        .iter()
        .map(|child| {
            render_element(
                child,
                &RenderCtx {
                    root_tag: "div",
                    hook_statements: Vec::new(),
                },
            )
        })
        .collect();

    if children.is_empty() {
        format!("<{}{} />", tag, attrs)
    } else {
        format!("<{}{}>{}</{}>", tag, attrs, children, tag)
    }
}

fn render_attribute(name: &str, value: &Value) -> String {
    match value {
        Value::String(s) => format!(" {}=\"{}\"", name, s),
        Value::Bool(_) | Value::Number(_) => format!(" {}={{{}}}", name, value),
        other => format!(" {}={{{}}}", name, render_json_literal(other)),
    }
}

fn render_json_literal(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}
