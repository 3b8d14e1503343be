use gschema_compiler::{CompileError, CompilerConfig, ModuleLayout, SchemaCompiler};
use gschema_core::SourceFile;
use gschema_descriptor::{CallableRef, DescriptorSet, DescriptorTable, TypeBody};
use std::fmt::Write;

fn compile_with(config: &CompilerConfig, files: &[(&str, &str)]) -> Result<Vec<DescriptorTable>, CompileError> {
    let sources: Vec<_> = files
        .iter()
        .map(|(path, text)| SourceFile::new(*path, *text))
        .collect();
    SchemaCompiler::new(config).compile(&sources)
}

fn compile(files: &[(&str, &str)]) -> Result<Vec<DescriptorTable>, CompileError> {
    compile_with(&CompilerConfig::default(), files)
}

/// One line per partial: `module: Type(kind) field, field`.
fn outline(tables: &[DescriptorTable]) -> String {
    let mut out = String::new();
    for table in tables {
        for partials in table.types.values() {
            for partial in partials {
                let names: Vec<_> = match &partial.body {
                    TypeBody::Enum { values } => values.keys().cloned().collect(),
                    TypeBody::Union { members, .. } => members.clone(),
                    body => body.fields().iter().map(|f| format!("{}: {}", f.name, f.ty)).collect(),
                };
                writeln!(
                    out,
                    "{}: {}({}) {}",
                    table.module,
                    partial.name,
                    partial.kind(),
                    names.join(", ")
                )
                .unwrap();
            }
        }
    }
    out
}

const USERS: &str = r#"
type Query @f(resolver: "Users\\QueryFields::class") {
  me: User
}

type User @f(resolver: "Di->userFields") {
  id: ID!
  name: String @upper
}

enum Role { ADMIN MEMBER }
"#;

const POSTS: &str = r#"
extend type Query {
  posts(first: Int = 10): [Post!]! @r(resolver: "Posts\\Resolver::list")
}

extend type User {
  posts: [Post!]!
}

type Post {
  id: ID!
  title: String @auth(role: ADMIN) @trim
}
"#;

#[test]
fn object_fields_are_partitioned_by_module() {
    let tables = compile(&[("users/users.graphql", USERS), ("posts/posts.graphql", POSTS)]).unwrap();
    insta::assert_snapshot!(outline(&tables), @r"
    users: Query(object) me: User
    users: User(object) id: ID!, name: String
    users: Role(enum) ADMIN, MEMBER
    posts: Query(object) posts: [Post!]!
    posts: User(object) posts: [Post!]!
    posts: Post(object) id: ID!, title: String
    ");
}

#[test]
fn owning_module_gets_empty_partial() {
    let tables = compile(&[
        ("base.graphql", "type Mutation"),
        ("users.graphql", "extend type Mutation { saveUser: Boolean }"),
    ])
    .unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].types["Mutation"][0].body.fields().len(), 0);
    assert_eq!(tables[1].types["Mutation"][0].body.fields()[0].name, "saveUser");
}

#[test]
fn wiring_is_parsed_and_generic_directives_are_kept_in_order() {
    let tables = compile(&[("users/users.graphql", USERS), ("posts/posts.graphql", POSTS)]).unwrap();
    let set: DescriptorSet = tables.into_iter().collect();

    let query = set.partials("Query");
    assert_eq!(query.len(), 2);
    match &query[0].body {
        TypeBody::Object { field_resolver, .. } => {
            assert_eq!(field_resolver, &Some(CallableRef::constructor("Users\\QueryFields")));
        }
        other => panic!("unexpected body {other:?}"),
    }
    let posts = &query[1].body.fields()[0];
    assert_eq!(posts.resolver, Some(CallableRef::static_method("Posts\\Resolver", "list")));
    assert_eq!(posts.arguments[0].name, "first");

    let title = &set.partials("post")[0].body.fields()[1];
    let names: Vec<_> = title.directives.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["auth", "trim"]);
    assert_eq!(title.directives[0].args["role"], serde_json::json!("ADMIN"));

    match &set.partials("User")[0].body {
        TypeBody::Object { field_resolver, .. } => {
            assert_eq!(field_resolver, &Some(CallableRef::service("userFields")));
        }
        other => panic!("unexpected body {other:?}"),
    }
}

#[test]
fn overlapping_fields_across_modules_fail() {
    let err = compile(&[
        ("users.graphql", "type User { id: ID! name: String }"),
        ("profiles.graphql", "extend type User { name: String }"),
    ])
    .unwrap_err();
    match err {
        CompileError::DuplicateField {
            type_name,
            field,
            other_module,
            location,
        } => {
            assert_eq!(type_name, "User");
            assert_eq!(field, "name");
            assert_eq!(other_module, "users");
            assert_eq!(location.path, "profiles.graphql");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn non_object_extensions_merge_into_owner() {
    let tables = compile(&[
        ("core.graphql", "enum Role { ADMIN }\nunion Item @t(resolver: \"Items::type\") = Post"),
        ("extra.graphql", "extend enum Role { GUEST }\nextend union Item = Comment"),
    ])
    .unwrap();
    insta::assert_snapshot!(outline(&tables), @r"
    core: Role(enum) ADMIN, GUEST
    core: Item(union) Post, Comment
    ");
    assert!(tables[1].types.is_empty());
}

#[test]
fn nested_layout_requires_module_directory() {
    let config = CompilerConfig {
        module_layout: ModuleLayout::Nested {
            root_marker: "application".into(),
        },
        ..CompilerConfig::default()
    };
    let tables = compile_with(
        &config,
        &[("app/application/users/users.graphql", "type User { id: ID }")],
    )
    .unwrap();
    assert_eq!(tables[0].module, "users");

    let err = compile_with(&config, &[("app/application/users/extra.graphql", "type User { id: ID }")])
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_module_path");
}

#[test]
fn tables_round_trip_through_json() {
    let tables = compile(&[("users/users.graphql", USERS)]).unwrap();
    let json = tables[0].to_json().unwrap();
    assert_eq!(DescriptorTable::from_json(&json).unwrap(), tables[0]);
}
