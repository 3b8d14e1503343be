//! Canonical printing of GraphQL documents.
//!
//! Output follows the conventional GraphQL print layout: two-space
//! indentation, one selection per line, `, `-separated arguments and
//! definitions separated by a blank line. Operation bodies stored in the
//! persisted registry are produced by this printer, so the layout is part of
//! the hash contract.

use crate::ast::*;
use gschema_core::Interner;

pub struct Printer<'a> {
    interner: &'a Interner,
    output: String,
    indent: usize,
}

/// Prints a whole document.
#[must_use]
pub fn print(document: &Document, interner: &Interner) -> String {
    Printer::new(interner).print_document(document)
}

impl<'a> Printer<'a> {
    pub fn new(interner: &'a Interner) -> Self {
        Self {
            interner,
            output: String::new(),
            indent: 0,
        }
    }

    fn take(&mut self) -> String {
        self.indent = 0;
        std::mem::take(&mut self.output)
    }

    pub fn print_document(&mut self, document: &Document) -> String {
        for (i, def) in document.definitions.iter().enumerate() {
            if i > 0 {
                self.output.push_str("\n\n");
            }
            self.write_definition(def);
        }
        self.take()
    }

    pub fn print_definition(&mut self, def: &Definition) -> String {
        self.write_definition(def);
        self.take()
    }

    pub fn print_operation(&mut self, op: &OperationDefinition) -> String {
        self.write_operation(op);
        self.take()
    }

    pub fn print_fragment(&mut self, fragment: &FragmentDefinition) -> String {
        self.write_fragment(fragment);
        self.take()
    }

    pub fn print_type(&mut self, ty: &Type) -> String {
        self.write_type(ty);
        self.take()
    }

    pub fn print_value(&mut self, value: &Value) -> String {
        self.write_value(value);
        self.take()
    }

    fn name(&mut self, name: &Name) {
        if let Some(s) = self.interner.resolve(name.value) {
            self.output.push_str(&s);
        }
    }

    fn push_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
    }

    fn newline(&mut self) {
        self.output.push('\n');
        self.push_indent();
    }

    fn write_definition(&mut self, def: &Definition) {
        match def {
            Definition::Schema(s) => self.write_schema(s),
            Definition::Type(t) => self.write_type_definition(t, false),
            Definition::Extension(t) => self.write_type_definition(t, true),
            Definition::Directive(d) => self.write_directive_definition(d),
            Definition::Operation(o) => self.write_operation(o),
            Definition::Fragment(f) => self.write_fragment(f),
        }
    }

    fn write_description(&mut self, description: Option<&Description>) {
        let Some(desc) = description else {
            return;
        };
        if desc.block {
            self.output.push_str("\"\"\"");
            if desc.value.contains('\n') {
                for line in desc.value.lines() {
                    self.newline();
                    self.output.push_str(line);
                }
                self.newline();
            } else {
                self.output.push_str(&desc.value);
            }
            self.output.push_str("\"\"\"");
        } else {
            write_quoted(&mut self.output, &desc.value);
        }
        self.newline();
    }

    fn write_schema(&mut self, schema: &SchemaDefinition) {
        self.write_description(schema.description.as_ref());
        self.output.push_str("schema");
        self.write_directives(&schema.directives);
        self.output.push_str(" {");
        self.indent += 1;
        for op in &schema.operations {
            self.newline();
            self.output.push_str(op.operation.as_str());
            self.output.push_str(": ");
            self.name(&op.type_name);
        }
        self.indent -= 1;
        self.newline();
        self.output.push('}');
    }

    fn write_type_definition(&mut self, def: &TypeDefinition, extension: bool) {
        if !extension {
            self.write_description(def.description());
        }
        if extension {
            self.output.push_str("extend ");
        }
        self.output.push_str(def.keyword());
        self.output.push(' ');
        self.name(&def.name());

        match def {
            TypeDefinition::Object(ObjectTypeDefinition {
                implements,
                directives,
                fields,
                ..
            })
            | TypeDefinition::Interface(InterfaceTypeDefinition {
                implements,
                directives,
                fields,
                ..
            }) => {
                if !implements.is_empty() {
                    self.output.push_str(" implements ");
                    for (i, name) in implements.iter().enumerate() {
                        if i > 0 {
                            self.output.push_str(" & ");
                        }
                        self.name(name);
                    }
                }
                self.write_directives(directives);
                self.write_block(fields, Self::write_field_definition);
            }
            TypeDefinition::Union(union) => {
                self.write_directives(&union.directives);
                if !union.members.is_empty() {
                    self.output.push_str(" = ");
                    for (i, member) in union.members.iter().enumerate() {
                        if i > 0 {
                            self.output.push_str(" | ");
                        }
                        self.name(member);
                    }
                }
            }
            TypeDefinition::Enum(en) => {
                self.write_directives(&en.directives);
                self.write_block(&en.values, |p, value| {
                    p.write_description(value.description.as_ref());
                    p.name(&value.name);
                    p.write_directives(&value.directives);
                });
            }
            TypeDefinition::Input(input) => {
                self.write_directives(&input.directives);
                self.write_block(&input.fields, |p, field| {
                    p.write_description(field.description.as_ref());
                    p.write_input_value(field);
                });
            }
            TypeDefinition::Scalar(scalar) => self.write_directives(&scalar.directives),
        }
    }

    fn write_block<T>(&mut self, items: &[T], mut write: impl FnMut(&mut Self, &T)) {
        if items.is_empty() {
            return;
        }
        self.output.push_str(" {");
        self.indent += 1;
        for item in items {
            self.newline();
            write(self, item);
        }
        self.indent -= 1;
        self.newline();
        self.output.push('}');
    }

    fn write_field_definition(&mut self, field: &FieldDefinition) {
        self.write_description(field.description.as_ref());
        self.name(&field.name);
        if !field.arguments.is_empty() {
            self.output.push('(');
            for (i, arg) in field.arguments.iter().enumerate() {
                if i > 0 {
                    self.output.push_str(", ");
                }
                self.write_input_value(arg);
            }
            self.output.push(')');
        }
        self.output.push_str(": ");
        self.write_type(&field.ty);
        self.write_directives(&field.directives);
    }

    fn write_input_value(&mut self, value: &InputValueDefinition) {
        self.name(&value.name);
        self.output.push_str(": ");
        self.write_type(&value.ty);
        if let Some(default) = &value.default_value {
            self.output.push_str(" = ");
            self.write_value(default);
        }
        self.write_directives(&value.directives);
    }

    fn write_directive_definition(&mut self, def: &DirectiveDefinitionNode) {
        self.write_description(def.description.as_ref());
        self.output.push_str("directive @");
        self.name(&def.name);
        if !def.arguments.is_empty() {
            self.output.push('(');
            for (i, arg) in def.arguments.iter().enumerate() {
                if i > 0 {
                    self.output.push_str(", ");
                }
                self.write_input_value(arg);
            }
            self.output.push(')');
        }
        if def.repeatable {
            self.output.push_str(" repeatable");
        }
        self.output.push_str(" on ");
        let locations: Vec<&str> = def.locations.iter().map(|l| l.as_str()).collect();
        self.output.push_str(&locations.join(" | "));
    }

    fn write_operation(&mut self, op: &OperationDefinition) {
        let shorthand = op.operation == OperationType::Query
            && op.name.is_none()
            && op.variables.is_empty()
            && op.directives.is_empty();
        if !shorthand {
            self.output.push_str(op.operation.as_str());
            if let Some(name) = &op.name {
                self.output.push(' ');
                self.name(name);
            }
            if !op.variables.is_empty() {
                if op.name.is_none() {
                    self.output.push(' ');
                }
                self.output.push('(');
                for (i, var) in op.variables.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.output.push('$');
                    self.name(&var.variable);
                    self.output.push_str(": ");
                    self.write_type(&var.ty);
                    if let Some(default) = &var.default_value {
                        self.output.push_str(" = ");
                        self.write_value(default);
                    }
                    self.write_directives(&var.directives);
                }
                self.output.push(')');
            }
            self.write_directives(&op.directives);
            self.output.push(' ');
        }
        self.write_selection_set(&op.selection_set);
    }

    fn write_fragment(&mut self, fragment: &FragmentDefinition) {
        self.output.push_str("fragment ");
        self.name(&fragment.name);
        self.output.push_str(" on ");
        self.name(&fragment.type_condition);
        self.write_directives(&fragment.directives);
        self.output.push(' ');
        self.write_selection_set(&fragment.selection_set);
    }

    fn write_selection_set(&mut self, set: &SelectionSet) {
        self.output.push('{');
        self.indent += 1;
        for selection in &set.selections {
            self.newline();
            self.write_selection(selection);
        }
        self.indent -= 1;
        self.newline();
        self.output.push('}');
    }

    fn write_selection(&mut self, selection: &Selection) {
        match selection {
            Selection::Field(field) => {
                if let Some(alias) = &field.alias {
                    self.name(alias);
                    self.output.push_str(": ");
                }
                self.name(&field.name);
                self.write_arguments(&field.arguments);
                self.write_directives(&field.directives);
                if let Some(set) = &field.selection_set {
                    self.output.push(' ');
                    self.write_selection_set(set);
                }
            }
            Selection::FragmentSpread(spread) => {
                self.output.push_str("...");
                self.name(&spread.name);
                self.write_directives(&spread.directives);
            }
            Selection::InlineFragment(inline) => {
                self.output.push_str("...");
                if let Some(cond) = &inline.type_condition {
                    self.output.push_str(" on ");
                    self.name(cond);
                }
                self.write_directives(&inline.directives);
                self.output.push(' ');
                self.write_selection_set(&inline.selection_set);
            }
        }
    }

    fn write_directives(&mut self, directives: &[Directive]) {
        for directive in directives {
            self.output.push_str(" @");
            self.name(&directive.name);
            self.write_arguments(&directive.arguments);
        }
    }

    fn write_arguments(&mut self, arguments: &[Argument]) {
        if arguments.is_empty() {
            return;
        }
        self.output.push('(');
        for (i, arg) in arguments.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.name(&arg.name);
            self.output.push_str(": ");
            self.write_value(&arg.value);
        }
        self.output.push(')');
    }

    fn write_type(&mut self, ty: &Type) {
        match ty {
            Type::Named(named) => self.name(&named.name),
            Type::List(inner, _) => {
                self.output.push('[');
                self.write_type(inner);
                self.output.push(']');
            }
            Type::NonNull(inner, _) => {
                self.write_type(inner);
                self.output.push('!');
            }
        }
    }

    fn write_value(&mut self, value: &Value) {
        match value {
            Value::Variable(name) => {
                self.output.push('$');
                self.name(name);
            }
            Value::Int(raw, _) | Value::Float(raw, _) => self.output.push_str(raw),
            Value::String(s) => {
                if s.block {
                    self.output.push_str("\"\"\"");
                    self.output.push_str(&s.value.replace("\"\"\"", "\\\"\"\""));
                    self.output.push_str("\"\"\"");
                } else {
                    write_quoted(&mut self.output, &s.value);
                }
            }
            Value::Boolean(b, _) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Null(_) => self.output.push_str("null"),
            Value::Enum(name) => self.name(name),
            Value::List(items, _) => {
                self.output.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_value(item);
                }
                self.output.push(']');
            }
            Value::Object(fields, _) => {
                self.output.push('{');
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.name(&field.name);
                    self.output.push_str(": ");
                    self.write_value(&field.value);
                }
                self.output.push('}');
            }
        }
    }
}

fn write_quoted(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn quoting_escapes_control_characters() {
        let mut out = String::new();
        write_quoted(&mut out, "a\"b\\c\nd\u{1}");
        assert_eq!(out, r#""a\"b\\c\nd\u0001""#);
    }

    #[test]
    fn shorthand_query_prints_bare_selection() {
        let interner = Interner::new();
        let result = parse("{ a b }", &interner);
        assert_eq!(print(&result.document, &interner), "{\n  a\n  b\n}");
    }

    #[test]
    fn printing_is_stable() {
        let interner = Interner::new();
        let source = "query Q($id: ID = \"x\") @live {\n  user(id: $id, tags: [A, B], where: {a: 1.5, b: null}) {\n    ...F\n  }\n}";
        let first = print(&parse(source, &interner).document, &interner);
        assert_eq!(first, source);
        let second = print(&parse(&first, &interner).document, &interner);
        assert_eq!(first, second);
    }
}
