//! Recursive descent parser for GraphQL documents.
//!
//! Parsing stops at the first error: the diagnostic is recorded and the
//! remaining input is treated as end of file, so the returned document holds
//! every definition completed before the error.

use crate::ast::*;
use crate::lexer::{block_string_value, unescape_string, Lexer};
use crate::token::{DirectiveLocation, Token, TokenKind};
use gschema_core::{diagnostics::codes, DiagnosticBag, Interner, Span};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    prev_end: u32,
    halted: bool,
    diagnostics: DiagnosticBag,
}

pub struct ParseResult {
    pub document: Document,
    pub diagnostics: DiagnosticBag,
}

impl ParseResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Parses a source string into a document.
pub fn parse(source: &str, interner: &Interner) -> ParseResult {
    let mut parser = Parser::new(source, interner);
    let document = parser.parse_document();
    ParseResult {
        document,
        diagnostics: parser.diagnostics,
    }
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, interner: &'a Interner) -> Self {
        let mut lexer = Lexer::new(source, interner);
        let current = lexer.next_token();
        let mut parser = Self {
            lexer,
            current,
            prev_end: 0,
            halted: false,
            diagnostics: DiagnosticBag::new(),
        };
        parser.check_lex_error();
        parser
    }

    #[inline]
    fn at(&self) -> TokenKind {
        self.current.kind
    }

    #[inline]
    fn at_kind(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    #[inline]
    fn start(&self) -> u32 {
        self.current.span.start
    }

    #[inline]
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    fn advance(&mut self) {
        if self.halted {
            return;
        }
        self.prev_end = self.current.span.end;
        self.current = self.lexer.next_token();
        self.check_lex_error();
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at_kind(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error_expected(kind.as_str());
            false
        }
    }

    fn check_lex_error(&mut self) {
        if self.current.kind != TokenKind::Error {
            return;
        }
        let text = self.lexer.span_text(self.current.span);
        if text.starts_with('"') {
            self.report(
                codes::UNTERMINATED_STRING,
                "unterminated string",
                "string literal is not closed".to_string(),
            );
        } else {
            self.report(
                codes::INVALID_SYNTAX,
                "invalid token",
                format!("unexpected character sequence `{text}`"),
            );
        }
    }

    /// Records the first error and halts.
    fn report(&mut self, code: &'static str, title: &str, message: String) {
        if self.halted {
            return;
        }
        let span = self.current.span;
        let code = if self.at_kind(TokenKind::Eof) {
            codes::UNEXPECTED_EOF
        } else {
            code
        };
        self.diagnostics.error(code, title, span, message);
        self.halted = true;
        self.current = Token::new(TokenKind::Eof, Span::empty(span.start));
    }

    fn error(&mut self, message: &str) {
        self.report(codes::INVALID_SYNTAX, "syntax error", message.to_string());
    }

    fn error_expected(&mut self, expected: &str) {
        let found = self.at();
        self.report(
            codes::UNEXPECTED_TOKEN,
            "unexpected token",
            format!("expected `{expected}`, found `{found}`"),
        );
    }

    #[inline]
    fn at_list_end(&self, close: TokenKind) -> bool {
        self.at_kind(close) || self.at_kind(TokenKind::Eof)
    }

    pub fn parse_document(&mut self) -> Document {
        let start = self.start();
        let mut definitions = Vec::new();

        while !self.at_kind(TokenKind::Eof) {
            if let Some(def) = self.parse_definition() {
                if !self.halted {
                    definitions.push(def);
                }
            }
        }

        Document {
            definitions,
            span: self.span_from(start),
        }
    }

    fn parse_definition(&mut self) -> Option<Definition> {
        let description = self.parse_description();

        match self.at() {
            TokenKind::Schema => Some(Definition::Schema(self.parse_schema_definition(description))),
            TokenKind::Type
            | TokenKind::Interface
            | TokenKind::Union
            | TokenKind::Enum
            | TokenKind::Input
            | TokenKind::Scalar => self
                .parse_type_definition(description)
                .map(Definition::Type),
            TokenKind::Extend => {
                self.advance();
                self.parse_type_definition(None).map(Definition::Extension)
            }
            TokenKind::Directive => Some(Definition::Directive(
                self.parse_directive_definition(description),
            )),
            TokenKind::Query | TokenKind::Mutation | TokenKind::Subscription | TokenKind::LBrace => {
                Some(Definition::Operation(self.parse_operation()))
            }
            TokenKind::Fragment => Some(Definition::Fragment(self.parse_fragment_definition())),
            _ => {
                self.error("expected a definition");
                None
            }
        }
    }

    fn parse_description(&mut self) -> Option<Description> {
        let span = self.current.span;
        let raw = self.lexer.span_text(span);
        let (value, block) = match self.at() {
            TokenKind::StringLiteral => (self.decode_string(raw)?, false),
            TokenKind::BlockStringLiteral => (block_string_value(raw), true),
            _ => return None,
        };
        self.advance();
        Some(Description { value, block, span })
    }

    fn decode_string(&mut self, raw: &str) -> Option<String> {
        let decoded = unescape_string(raw);
        if decoded.is_none() {
            self.error("invalid escape sequence in string");
        }
        decoded
    }

    fn parse_name(&mut self) -> Name {
        let span = self.current.span;
        if self.at().is_name() {
            let value = self.lexer.intern_span(span);
            self.advance();
            Name::new(value, span)
        } else {
            self.error_expected("name");
            Name::new(self.lexer.intern_span(Span::empty(span.start)), span)
        }
    }

    fn parse_schema_definition(&mut self, description: Option<Description>) -> SchemaDefinition {
        let start = description.as_ref().map_or(self.start(), |d| d.span.start);
        self.expect(TokenKind::Schema);
        let directives = self.parse_directives();

        let mut operations = Vec::new();
        if self.expect(TokenKind::LBrace) {
            while !self.at_list_end(TokenKind::RBrace) {
                let op_start = self.start();
                let operation = match self.at() {
                    TokenKind::Query => OperationType::Query,
                    TokenKind::Mutation => OperationType::Mutation,
                    TokenKind::Subscription => OperationType::Subscription,
                    _ => {
                        self.error("expected `query`, `mutation` or `subscription`");
                        break;
                    }
                };
                self.advance();
                self.expect(TokenKind::Colon);
                let type_name = self.parse_name();
                operations.push(OperationTypeDefinition {
                    operation,
                    type_name,
                    span: self.span_from(op_start),
                });
            }
            self.expect(TokenKind::RBrace);
        }

        SchemaDefinition {
            description,
            directives,
            operations,
            span: self.span_from(start),
        }
    }

    fn parse_type_definition(&mut self, description: Option<Description>) -> Option<TypeDefinition> {
        let start = description.as_ref().map_or(self.start(), |d| d.span.start);
        let keyword = self.at();
        match keyword {
            TokenKind::Type | TokenKind::Interface => {
                self.advance();
                let name = self.parse_name();
                let implements = self.parse_implements();
                let directives = self.parse_directives();
                let fields = self.parse_field_definitions();
                let span = self.span_from(start);
                Some(if keyword == TokenKind::Type {
                    TypeDefinition::Object(ObjectTypeDefinition {
                        description,
                        name,
                        implements,
                        directives,
                        fields,
                        span,
                    })
                } else {
                    TypeDefinition::Interface(InterfaceTypeDefinition {
                        description,
                        name,
                        implements,
                        directives,
                        fields,
                        span,
                    })
                })
            }
            TokenKind::Union => {
                self.advance();
                let name = self.parse_name();
                let directives = self.parse_directives();
                let mut members = Vec::new();
                if self.eat(TokenKind::Eq) {
                    self.eat(TokenKind::Pipe);
                    members.push(self.parse_name());
                    while self.eat(TokenKind::Pipe) {
                        members.push(self.parse_name());
                    }
                }
                Some(TypeDefinition::Union(UnionTypeDefinition {
                    description,
                    name,
                    directives,
                    members,
                    span: self.span_from(start),
                }))
            }
            TokenKind::Enum => {
                self.advance();
                let name = self.parse_name();
                let directives = self.parse_directives();
                let values = self.parse_enum_values();
                Some(TypeDefinition::Enum(EnumTypeDefinition {
                    description,
                    name,
                    directives,
                    values,
                    span: self.span_from(start),
                }))
            }
            TokenKind::Input => {
                self.advance();
                let name = self.parse_name();
                let directives = self.parse_directives();
                let fields = if self.at_kind(TokenKind::LBrace) {
                    self.parse_input_value_definitions(TokenKind::LBrace, TokenKind::RBrace)
                } else {
                    Vec::new()
                };
                Some(TypeDefinition::Input(InputObjectTypeDefinition {
                    description,
                    name,
                    directives,
                    fields,
                    span: self.span_from(start),
                }))
            }
            TokenKind::Scalar => {
                self.advance();
                let name = self.parse_name();
                let directives = self.parse_directives();
                Some(TypeDefinition::Scalar(ScalarTypeDefinition {
                    description,
                    name,
                    directives,
                    span: self.span_from(start),
                }))
            }
            _ => {
                self.error("expected a type definition after `extend`");
                None
            }
        }
    }

    fn parse_implements(&mut self) -> Vec<Name> {
        let mut implements = Vec::new();
        if self.eat(TokenKind::Implements) {
            self.eat(TokenKind::Amp);
            implements.push(self.parse_name());
            while self.eat(TokenKind::Amp) {
                implements.push(self.parse_name());
            }
        }
        implements
    }

    fn parse_field_definitions(&mut self) -> Vec<FieldDefinition> {
        let mut fields = Vec::new();
        if !self.eat(TokenKind::LBrace) {
            return fields;
        }
        while !self.at_list_end(TokenKind::RBrace) {
            fields.push(self.parse_field_definition());
        }
        self.expect(TokenKind::RBrace);
        fields
    }

    fn parse_field_definition(&mut self) -> FieldDefinition {
        let description = self.parse_description();
        let start = description.as_ref().map_or(self.start(), |d| d.span.start);
        let name = self.parse_name();
        let arguments = if self.at_kind(TokenKind::LParen) {
            self.parse_input_value_definitions(TokenKind::LParen, TokenKind::RParen)
        } else {
            Vec::new()
        };
        self.expect(TokenKind::Colon);
        let ty = self.parse_type();
        let directives = self.parse_directives();

        FieldDefinition {
            description,
            name,
            arguments,
            ty,
            directives,
            span: self.span_from(start),
        }
    }

    fn parse_input_value_definitions(
        &mut self,
        open: TokenKind,
        close: TokenKind,
    ) -> Vec<InputValueDefinition> {
        let mut values = Vec::new();
        self.expect(open);
        while !self.at_list_end(close) {
            values.push(self.parse_input_value_definition());
        }
        self.expect(close);
        values
    }

    fn parse_input_value_definition(&mut self) -> InputValueDefinition {
        let description = self.parse_description();
        let start = description.as_ref().map_or(self.start(), |d| d.span.start);
        let name = self.parse_name();
        self.expect(TokenKind::Colon);
        let ty = self.parse_type();
        let default_value = if self.eat(TokenKind::Eq) {
            Some(self.parse_value())
        } else {
            None
        };
        let directives = self.parse_directives();

        InputValueDefinition {
            description,
            name,
            ty,
            default_value,
            directives,
            span: self.span_from(start),
        }
    }

    fn parse_enum_values(&mut self) -> Vec<EnumValueDefinition> {
        let mut values = Vec::new();
        if !self.eat(TokenKind::LBrace) {
            return values;
        }
        while !self.at_list_end(TokenKind::RBrace) {
            let description = self.parse_description();
            let start = description.as_ref().map_or(self.start(), |d| d.span.start);
            let name = self.parse_name();
            let directives = self.parse_directives();
            values.push(EnumValueDefinition {
                description,
                name,
                directives,
                span: self.span_from(start),
            });
        }
        self.expect(TokenKind::RBrace);
        values
    }

    fn parse_directive_definition(&mut self, description: Option<Description>) -> DirectiveDefinitionNode {
        let start = description.as_ref().map_or(self.start(), |d| d.span.start);
        self.expect(TokenKind::Directive);
        self.expect(TokenKind::At);
        let name = self.parse_name();
        let arguments = if self.at_kind(TokenKind::LParen) {
            self.parse_input_value_definitions(TokenKind::LParen, TokenKind::RParen)
        } else {
            Vec::new()
        };
        let repeatable = self.eat(TokenKind::Repeatable);
        self.expect(TokenKind::On);

        let mut locations = Vec::new();
        self.eat(TokenKind::Pipe);
        loop {
            let text = self.lexer.span_text(self.current.span);
            match DirectiveLocation::parse(text) {
                Some(location) if self.at_kind(TokenKind::Ident) => {
                    locations.push(location);
                    self.advance();
                }
                _ => {
                    self.error_expected("directive location");
                    break;
                }
            }
            if !self.eat(TokenKind::Pipe) {
                break;
            }
        }

        DirectiveDefinitionNode {
            description,
            name,
            arguments,
            repeatable,
            locations,
            span: self.span_from(start),
        }
    }

    fn parse_type(&mut self) -> Type {
        let start = self.start();
        let base = if self.eat(TokenKind::LBracket) {
            let inner = self.parse_type();
            self.expect(TokenKind::RBracket);
            Type::List(Box::new(inner), self.span_from(start))
        } else {
            Type::Named(NamedType {
                name: self.parse_name(),
            })
        };

        if self.eat(TokenKind::Bang) {
            Type::NonNull(Box::new(base), self.span_from(start))
        } else {
            base
        }
    }

    fn parse_directives(&mut self) -> Vec<Directive> {
        let mut directives = Vec::new();
        while self.at_kind(TokenKind::At) {
            let start = self.start();
            self.advance();
            let name = self.parse_name();
            let arguments = self.parse_arguments();
            directives.push(Directive {
                name,
                arguments,
                span: self.span_from(start),
            });
        }
        directives
    }

    fn parse_arguments(&mut self) -> Vec<Argument> {
        let mut arguments = Vec::new();
        if !self.eat(TokenKind::LParen) {
            return arguments;
        }
        while !self.at_list_end(TokenKind::RParen) {
            let start = self.start();
            let name = self.parse_name();
            self.expect(TokenKind::Colon);
            let value = self.parse_value();
            arguments.push(Argument {
                name,
                value,
                span: self.span_from(start),
            });
        }
        self.expect(TokenKind::RParen);
        arguments
    }

    fn parse_value(&mut self) -> Value {
        let start = self.start();
        let span = self.current.span;
        let raw = self.lexer.span_text(span);

        match self.at() {
            TokenKind::Dollar => {
                self.advance();
                Value::Variable(self.parse_name())
            }
            TokenKind::IntLiteral => {
                self.advance();
                Value::Int(raw.to_string(), span)
            }
            TokenKind::FloatLiteral => {
                self.advance();
                Value::Float(raw.to_string(), span)
            }
            TokenKind::StringLiteral => {
                let value = self.decode_string(raw).unwrap_or_default();
                self.advance();
                Value::String(StringValue {
                    value,
                    block: false,
                    span,
                })
            }
            TokenKind::BlockStringLiteral => {
                self.advance();
                Value::String(StringValue {
                    value: block_string_value(raw),
                    block: true,
                    span,
                })
            }
            TokenKind::True | TokenKind::False => {
                let value = self.at_kind(TokenKind::True);
                self.advance();
                Value::Boolean(value, span)
            }
            TokenKind::Null => {
                self.advance();
                Value::Null(span)
            }
            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                while !self.at_list_end(TokenKind::RBracket) {
                    items.push(self.parse_value());
                }
                self.expect(TokenKind::RBracket);
                Value::List(items, self.span_from(start))
            }
            TokenKind::LBrace => {
                self.advance();
                let mut fields = Vec::new();
                while !self.at_list_end(TokenKind::RBrace) {
                    let field_start = self.start();
                    let name = self.parse_name();
                    self.expect(TokenKind::Colon);
                    let value = self.parse_value();
                    fields.push(ObjectField {
                        name,
                        value,
                        span: self.span_from(field_start),
                    });
                }
                self.expect(TokenKind::RBrace);
                Value::Object(fields, self.span_from(start))
            }
            kind if kind.is_name() => Value::Enum(self.parse_name()),
            _ => {
                self.error_expected("value");
                Value::Null(span)
            }
        }
    }

    fn parse_operation(&mut self) -> OperationDefinition {
        let start = self.start();

        if self.at_kind(TokenKind::LBrace) {
            let selection_set = self.parse_selection_set();
            return OperationDefinition {
                operation: OperationType::Query,
                name: None,
                variables: Vec::new(),
                directives: Vec::new(),
                selection_set,
                span: self.span_from(start),
            };
        }

        let operation = match self.at() {
            TokenKind::Mutation => OperationType::Mutation,
            TokenKind::Subscription => OperationType::Subscription,
            _ => OperationType::Query,
        };
        self.advance();

        let name = if self.at().is_name() {
            Some(self.parse_name())
        } else {
            None
        };
        let variables = self.parse_variable_definitions();
        let directives = self.parse_directives();
        let selection_set = self.parse_selection_set();

        OperationDefinition {
            operation,
            name,
            variables,
            directives,
            selection_set,
            span: self.span_from(start),
        }
    }

    fn parse_variable_definitions(&mut self) -> Vec<VariableDefinition> {
        let mut variables = Vec::new();
        if !self.eat(TokenKind::LParen) {
            return variables;
        }
        while !self.at_list_end(TokenKind::RParen) {
            let start = self.start();
            self.expect(TokenKind::Dollar);
            let variable = self.parse_name();
            self.expect(TokenKind::Colon);
            let ty = self.parse_type();
            let default_value = if self.eat(TokenKind::Eq) {
                Some(self.parse_value())
            } else {
                None
            };
            let directives = self.parse_directives();
            variables.push(VariableDefinition {
                variable,
                ty,
                default_value,
                directives,
                span: self.span_from(start),
            });
        }
        self.expect(TokenKind::RParen);
        variables
    }

    fn parse_fragment_definition(&mut self) -> FragmentDefinition {
        let start = self.start();
        self.expect(TokenKind::Fragment);
        if self.at_kind(TokenKind::On) {
            self.error("fragment name cannot be `on`");
        }
        let name = self.parse_name();
        self.expect(TokenKind::On);
        let type_condition = self.parse_name();
        let directives = self.parse_directives();
        let selection_set = self.parse_selection_set();

        FragmentDefinition {
            name,
            type_condition,
            directives,
            selection_set,
            span: self.span_from(start),
        }
    }

    fn parse_selection_set(&mut self) -> SelectionSet {
        let start = self.start();
        let mut selections = Vec::new();
        if self.expect(TokenKind::LBrace) {
            while !self.at_list_end(TokenKind::RBrace) {
                selections.push(self.parse_selection());
            }
            self.expect(TokenKind::RBrace);
        }
        SelectionSet {
            selections,
            span: self.span_from(start),
        }
    }

    fn parse_selection(&mut self) -> Selection {
        let start = self.start();

        if !self.eat(TokenKind::Spread) {
            return Selection::Field(self.parse_field());
        }

        if self.at().is_name() && !self.at_kind(TokenKind::On) {
            let name = self.parse_name();
            let directives = self.parse_directives();
            return Selection::FragmentSpread(FragmentSpread {
                name,
                directives,
                span: self.span_from(start),
            });
        }

        let type_condition = if self.eat(TokenKind::On) {
            Some(self.parse_name())
        } else {
            None
        };
        let directives = self.parse_directives();
        let selection_set = self.parse_selection_set();
        Selection::InlineFragment(InlineFragment {
            type_condition,
            directives,
            selection_set,
            span: self.span_from(start),
        })
    }

    fn parse_field(&mut self) -> Field {
        let start = self.start();
        let first = self.parse_name();
        let (alias, name) = if self.eat(TokenKind::Colon) {
            (Some(first), self.parse_name())
        } else {
            (None, first)
        };
        let arguments = self.parse_arguments();
        let directives = self.parse_directives();
        let selection_set = if self.at_kind(TokenKind::LBrace) {
            Some(self.parse_selection_set())
        } else {
            None
        };

        Field {
            alias,
            name,
            arguments,
            directives,
            selection_set,
            span: self.span_from(start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str, interner: &Interner) -> Document {
        let result = parse(source, interner);
        assert!(
            !result.has_errors(),
            "unexpected diagnostics: {:?}",
            result.diagnostics.iter().collect::<Vec<_>>()
        );
        result.document
    }

    #[test]
    fn parses_object_with_wiring_directives() {
        let interner = Interner::new();
        let doc = parse_ok(
            r#"
            "A registered user"
            type User implements Node & Entity @f(resolver: "Users::field") {
              id: ID!
              posts(first: Int = 10, order: Order = ASC): [Post!]! @r(resolver: "Di->posts") @auth(role: "admin")
            }
            "#,
            &interner,
        );

        assert_eq!(doc.definitions.len(), 1);
        let Definition::Type(TypeDefinition::Object(user)) = &doc.definitions[0] else {
            panic!("expected object type");
        };
        assert_eq!(interner.get(user.name.value), "User");
        assert_eq!(user.description.as_ref().map(|d| d.value.as_str()), Some("A registered user"));
        assert_eq!(user.implements.len(), 2);
        assert_eq!(user.directives.len(), 1);
        assert_eq!(user.fields.len(), 2);

        let posts = &user.fields[1];
        assert_eq!(posts.arguments.len(), 2);
        assert!(matches!(posts.ty, Type::NonNull(..)));
        assert_eq!(interner.get(posts.ty.named().name.value), "Post");
        assert_eq!(posts.directives.len(), 2);
        assert_eq!(
            posts.directives[0].arguments[0].value.as_str(),
            Some("Di->posts")
        );
        assert!(matches!(
            posts.arguments[1].default_value,
            Some(Value::Enum(_))
        ));
    }

    #[test]
    fn parses_extensions_and_other_kinds() {
        let interner = Interner::new();
        let doc = parse_ok(
            r#"
            extend type Query { me: User }
            union SearchResult @t(resolver: "Search::type") = | User | Post
            enum Order { ASC DESC }
            input Filter @v(resolver: "Filters::validate") { q: String = "x" }
            scalar Date @scalar(serialize: "Scalar\\Date::serialize")
            directive @auth(role: String) repeatable on FIELD_DEFINITION | OBJECT
            schema { query: Query mutation: Mutation }
            "#,
            &interner,
        );

        assert!(matches!(
            doc.definitions[0],
            Definition::Extension(TypeDefinition::Object(_))
        ));
        let Definition::Type(TypeDefinition::Union(union)) = &doc.definitions[1] else {
            panic!("expected union");
        };
        assert_eq!(union.members.len(), 2);
        let Definition::Directive(directive) = &doc.definitions[5] else {
            panic!("expected directive definition");
        };
        assert!(directive.repeatable);
        assert_eq!(
            directive.locations,
            vec![DirectiveLocation::FieldDefinition, DirectiveLocation::Object]
        );
        let Definition::Schema(schema) = &doc.definitions[6] else {
            panic!("expected schema definition");
        };
        assert_eq!(schema.operations.len(), 2);
    }

    #[test]
    fn parses_operations_and_fragments() {
        let interner = Interner::new();
        let doc = parse_ok(
            r"
            query GetUser($id: ID!, $withPosts: Boolean = false) {
              user(id: $id) {
                ...UserFields
                ... on Admin { level }
                ... @include(if: $withPosts) { posts { title } }
                alias: name
              }
            }
            fragment UserFields on User { id }
            { anonymous }
            ",
            &interner,
        );

        let ops: Vec<_> = doc.operations().collect();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].variables.len(), 2);
        assert!(ops[1].name.is_none());
        assert_eq!(doc.fragments().count(), 1);

        let Selection::Field(user) = &ops[0].selection_set.selections[0] else {
            panic!("expected field");
        };
        let inner = user.selection_set.as_ref().map(|s| s.selections.len());
        assert_eq!(inner, Some(4));
        let spreads = ops[0].selection_set.fragment_spreads();
        assert_eq!(spreads, vec![interner.intern("UserFields")]);
    }

    #[test]
    fn stops_at_first_error() {
        let interner = Interner::new();
        let result = parse("type A { a: Int }\ntype B { b: }\ntype C { c: Int }", &interner);
        assert!(result.has_errors());
        assert_eq!(result.diagnostics.error_count(), 1);
        assert_eq!(result.document.definitions.len(), 1);
        let diag = result.diagnostics.iter().next().map(|d| d.code);
        assert_eq!(diag, Some(codes::UNEXPECTED_TOKEN));
    }

    #[test]
    fn unterminated_string_is_reported() {
        let interner = Interner::new();
        let result = parse("type A @r(resolver: \"oops\n) { a: Int }", &interner);
        let codes_seen: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes_seen, vec![codes::UNTERMINATED_STRING]);
    }

    #[test]
    fn escape_at_end_of_input_is_unterminated() {
        let interner = Interner::new();
        let result = parse("type A @d(x: \"a\\", &interner);
        let codes_seen: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes_seen, vec![codes::UNTERMINATED_STRING]);
    }

    #[test]
    fn truncated_input_reports_eof() {
        let interner = Interner::new();
        let result = parse("query Q { a", &interner);
        let codes_seen: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes_seen, vec![codes::UNEXPECTED_EOF]);
    }
}
