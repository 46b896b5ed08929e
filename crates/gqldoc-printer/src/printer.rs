//! Per-element document printing.
//!
//! One handler per element kind, dispatched over the closed [`TypeDef`]
//! union so a new kind cannot be forgotten silently. Every generated
//! document has the same shape: front matter, the `Tag` MDX snippet, a
//! description block, a canonical ```graphql``` code block, and the kind's
//! metadata sections.

use gqldoc_schema::{
    Category, Deprecation, EnumValue, Field, InputValue, SchemaElement, SchemaGraph, TypeDef,
    TypeRef,
};

use crate::prettify::prettify_markdown;
use crate::slug::to_slug;

/// Section heading level.
const TITLE: &str = "###";
/// Section item heading level.
const SUB_TITLE: &str = "####";
/// Argument sub-item level.
const LIST_ITEM: &str = "- #####";

/// Placeholder used when an element carries no description.
pub const NO_DESCRIPTION_TEXT: &str = "No description";

/// MDX tag component injected into every page, used for the deprecation
/// badge.
const TAG: &str = "export const Tag = ({children, color}) => (
  <span
    style={{
      backgroundColor: color,
      borderRadius: '2px',
      color: '#fff',
      padding: '0.2rem',
    }}>
    {children}
  </span>
);";

/// One entry of a metadata section.
enum SectionItem<'a> {
    /// An object/interface field (renders its arguments as sub-items).
    Field(&'a Field),
    /// An argument or input-object field.
    Input(&'a InputValue),
    /// A named type reference, resolved against the schema for linking.
    TypeName(&'a str),
    /// An enum member.
    EnumValue(&'a EnumValue),
}

/// Pure schema-element-to-Markdown printer.
///
/// Holds only borrowed schema context and link configuration; each
/// [`Printer::print_type`] call is independent.
pub struct Printer<'a> {
    schema: &'a SchemaGraph,
    base_url: String,
    link_root: String,
}

impl<'a> Printer<'a> {
    /// Create a printer for one schema.
    #[must_use]
    pub fn new(
        schema: &'a SchemaGraph,
        base_url: impl Into<String>,
        link_root: impl Into<String>,
    ) -> Self {
        Self {
            schema,
            base_url: base_url.into(),
            link_root: link_root.into(),
        }
    }

    /// Print the complete MDX document for one element.
    #[must_use]
    pub fn print_type(&self, slug: &str, element: &SchemaElement<'a>) -> String {
        let header = print_header(slug, element.name());
        let description = self.print_element_description(element);
        let code = self.print_code(element);
        let metadata = self.print_metadata(element);
        prettify_markdown(&format!(
            "{header}\n\n{TAG}\n\n{description}\n\n{code}\n\n{metadata}\n\n"
        ))
    }

    /// Cross-reference link for a (possibly wrapped) type reference. The
    /// link text keeps the decorations; the target is the named type's page.
    /// Unclassifiable targets degrade to plain inline code.
    #[must_use]
    pub fn to_link(&self, ty: &TypeRef) -> String {
        self.link_for(ty.named_type(), &ty.to_string())
    }

    fn link_for(&self, name: &str, text: &str) -> String {
        match self.schema.get_type(name) {
            Some(def) => {
                let path = join_url(&[
                    &self.link_root,
                    &self.base_url,
                    Category::of_type(def).as_str(),
                    &to_slug(name),
                ]);
                format!("[`{text}`]({path})")
            }
            None => format!("`{text}`"),
        }
    }

    fn print_element_description(&self, element: &SchemaElement<'a>) -> String {
        let badge = match *element {
            SchemaElement::Operation(field) => print_deprecation(&field.deprecation),
            SchemaElement::Directive(_) | SchemaElement::Type(_) => String::new(),
        };
        format!(
            "{badge}{}",
            element.description().unwrap_or(NO_DESCRIPTION_TEXT)
        )
    }

    fn print_code(&self, element: &SchemaElement<'a>) -> String {
        let body = match *element {
            SchemaElement::Operation(field) => print_code_field(field),
            SchemaElement::Directive(directive) => format!(
                "directive @{}{}",
                directive.name,
                print_code_arguments(&directive.args)
            ),
            SchemaElement::Type(def) => match def {
                TypeDef::Enum(e) => {
                    let values: Vec<String> =
                        e.values.iter().map(|v| format!("  {}", v.name)).collect();
                    format!("enum {} {{\n{}\n}}", e.name, values.join("\n"))
                }
                TypeDef::Union(u) => format!("union {} = {}", u.name, u.types.join(" | ")),
                TypeDef::Object(o) => print_code_type("type", &o.name, &o.interfaces, &o.fields),
                TypeDef::Interface(i) => {
                    print_code_type("interface", &i.name, &i.interfaces, &i.fields)
                }
                TypeDef::InputObject(input) => {
                    let fields: Vec<String> = input
                        .fields
                        .iter()
                        .map(|f| format!("  {}: {}", f.name, f.ty))
                        .collect();
                    format!("type {} {{\n{}\n}}", input.name, fields.join("\n"))
                }
                TypeDef::Scalar(s) => format!("scalar {}", s.name),
            },
        };
        format!("\n```graphql\n{body}\n```\n")
    }

    fn print_metadata(&self, element: &SchemaElement<'a>) -> String {
        match *element {
            SchemaElement::Type(def) => match def {
                TypeDef::Enum(e) => {
                    let values: Vec<SectionItem<'a>> =
                        e.values.iter().map(SectionItem::EnumValue).collect();
                    self.print_section(&values, "Values")
                }
                TypeDef::Union(u) => {
                    let members: Vec<SectionItem<'a>> = u
                        .types
                        .iter()
                        .map(|name| SectionItem::TypeName(name))
                        .collect();
                    self.print_section(&members, "Possible types")
                }
                TypeDef::Object(o) => {
                    self.fields_and_interfaces(&o.fields, &o.interfaces)
                }
                TypeDef::Interface(i) => {
                    self.fields_and_interfaces(&i.fields, &i.interfaces)
                }
                TypeDef::InputObject(input) => {
                    let fields: Vec<SectionItem<'a>> =
                        input.fields.iter().map(SectionItem::Input).collect();
                    self.print_section(&fields, "Fields")
                }
                TypeDef::Scalar(_) => String::new(),
            },
            SchemaElement::Operation(field) => {
                let args: Vec<SectionItem<'a>> =
                    field.args.iter().map(SectionItem::Input).collect();
                let mut metadata = self.print_section(&args, "Arguments");
                // Strip list/non-null decorations and re-resolve the named
                // return type so the section links its page.
                let return_type = [SectionItem::TypeName(field.ty.named_type())];
                metadata.push_str(&self.print_section(&return_type, "Type"));
                metadata
            }
            SchemaElement::Directive(directive) => {
                let args: Vec<SectionItem<'a>> =
                    directive.args.iter().map(SectionItem::Input).collect();
                self.print_section(&args, "Arguments")
            }
        }
    }

    fn fields_and_interfaces(&self, fields: &'a [Field], interfaces: &'a [String]) -> String {
        let field_items: Vec<SectionItem<'a>> = fields.iter().map(SectionItem::Field).collect();
        let mut metadata = self.print_section(&field_items, "Fields");
        let interface_items: Vec<SectionItem<'a>> = interfaces
            .iter()
            .map(|name| SectionItem::TypeName(name))
            .collect();
        metadata.push_str(&self.print_section(&interface_items, "Interfaces"));
        metadata
    }

    fn print_section(&self, items: &[SectionItem<'a>], title: &str) -> String {
        if items.is_empty() {
            return String::new();
        }
        format!(
            "{TITLE} {title}\n\n{}\n\n",
            self.print_section_items(items, SUB_TITLE)
        )
    }

    fn print_section_items(&self, items: &[SectionItem<'a>], level: &str) -> String {
        items
            .iter()
            .map(|item| self.print_section_item(item, level))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn print_section_item(&self, item: &SectionItem<'a>, level: &str) -> String {
        match item {
            SectionItem::Field(field) => {
                let mut section = format!(
                    "{level} `{}` ({})\n\n{}{}\n",
                    field.name,
                    self.to_link(&field.ty),
                    print_deprecation(&field.deprecation),
                    field.description.as_deref().unwrap_or_default()
                );
                if !field.args.is_empty() {
                    let args: Vec<SectionItem<'a>> =
                        field.args.iter().map(SectionItem::Input).collect();
                    section.push_str(&self.print_section_items(&args, LIST_ITEM));
                }
                section
            }
            SectionItem::Input(value) => format!(
                "{level} `{}` ({})\n\n{}\n",
                value.name,
                self.to_link(&value.ty),
                value.description.as_deref().unwrap_or_default()
            ),
            SectionItem::TypeName(name) => {
                let description = self
                    .schema
                    .get_type(name)
                    .and_then(TypeDef::description)
                    .unwrap_or_default();
                format!(
                    "{level} {}\n\n{description}\n",
                    self.link_for(name, name)
                )
            }
            SectionItem::EnumValue(value) => format!(
                "{level} `{}`\n\n{}{}\n",
                value.name,
                print_deprecation(&value.deprecation),
                value.description.as_deref().unwrap_or_default()
            ),
        }
    }
}

/// Default-value clause of an argument, or `None` when the argument renders
/// without an `=` clause.
///
/// The per-type policy is part of the generated syntax and must stay
/// stable: list-typed arguments render `[value-or-empty]`, `ID`/`Int`
/// default to `0`, `Float` defaults to `0.0`, strings and every other type
/// are double-quoted when present and omitted entirely when absent.
#[must_use]
pub fn default_value(argument: &InputValue) -> Option<String> {
    let ty = argument.ty.strip_non_null();
    if ty.is_list() {
        let inner = argument
            .default_value
            .as_ref()
            .map(gqldoc_schema::Value::display_bare)
            .unwrap_or_default();
        return Some(format!("[{inner}]"));
    }
    match ty.named_type() {
        "ID" | "Int" => Some(
            argument
                .default_value
                .as_ref()
                .map_or_else(|| "0".to_owned(), gqldoc_schema::Value::display_bare),
        ),
        "Float" => Some(
            argument
                .default_value
                .as_ref()
                .map_or_else(|| "0.0".to_owned(), gqldoc_schema::Value::display_bare),
        ),
        _ => argument
            .default_value
            .as_ref()
            .map(|value| format!("\"{}\"", value.display_bare())),
    }
}

fn print_header(id: &str, title: &str) -> String {
    format!("---\nid: {id}\ntitle: {title}\n---\n")
}

fn print_deprecation(deprecation: &Deprecation) -> String {
    if !deprecation.is_deprecated {
        return String::new();
    }
    format!(
        "<sub><sup><Tag color=\"#ffba00\">DEPRECATED</Tag> {}</sup></sub>\n\n",
        deprecation.reason.as_deref().unwrap_or_default()
    )
}

fn print_code_arguments(args: &[InputValue]) -> String {
    if args.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = args
        .iter()
        .map(|arg| match default_value(arg) {
            Some(default) => format!("{}: {} = {default}", arg.name, arg.ty),
            None => format!("{}: {}", arg.name, arg.ty),
        })
        .collect();
    format!("({})", rendered.join(", "))
}

fn print_code_field(field: &Field) -> String {
    format!(
        "{}{}: {}",
        field.name,
        print_code_arguments(&field.args),
        field.ty
    )
}

fn print_code_type(keyword: &str, name: &str, interfaces: &[String], fields: &[Field]) -> String {
    let implements = if interfaces.is_empty() {
        String::new()
    } else {
        format!(" implements {}", interfaces.join(", "))
    };
    let lines: Vec<String> = fields
        .iter()
        .map(|field| format!("  {}", print_code_field(field)))
        .collect();
    format!("{keyword} {name}{implements} {{\n{}\n}}", lines.join("\n"))
}

fn join_url(parts: &[&str]) -> String {
    let mut out = String::new();
    for part in parts {
        if part.is_empty() {
            continue;
        }
        if out.is_empty() {
            out.push_str(part);
        } else {
            match (out.ends_with('/'), part.starts_with('/')) {
                (true, true) => out.push_str(&part[1..]),
                (false, false) => {
                    out.push('/');
                    out.push_str(part);
                }
                _ => out.push_str(part),
            }
        }
    }
    out
}
