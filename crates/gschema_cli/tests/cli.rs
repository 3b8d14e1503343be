use clap::Parser;
use gschema_cli::{run, Cli};
use gschema_descriptor::{DescriptorTable, OperationRegistry};
use std::path::Path;
use tempfile::TempDir;

fn workspace() -> TempDir {
    tempfile::tempdir().unwrap()
}

fn write(dir: &Path, relative: &str, text: &str) -> String {
    let path = dir.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, text).unwrap();
    path.display().to_string()
}

fn gschema(args: &[&str]) -> i32 {
    let argv = std::iter::once("gschema").chain(args.iter().copied());
    run(Cli::parse_from(argv)).unwrap()
}

#[test]
fn schema_writes_one_table_per_module() {
    let tmp = workspace();
    let dir = tmp.path();
    let users = write(
        dir,
        "users/users.graphql",
        "type Query { me: User }\ntype User { id: ID! }",
    );
    let posts = write(dir, "posts/posts.graphql", "extend type User { posts: [String!]! }");
    let out = dir.join("out");

    assert_eq!(gschema(&["-q", "schema", &users, &posts, "-o", &out.display().to_string()]), 0);

    let table = DescriptorTable::from_json(&std::fs::read_to_string(out.join("posts.json")).unwrap()).unwrap();
    assert_eq!(table.module, "posts");
    assert_eq!(table.types["User"][0].body.fields()[0].name, "posts");
    assert!(out.join("users.json").exists());
}

#[test]
fn schema_errors_exit_nonzero() {
    let tmp = workspace();
    let dir = tmp.path();
    let users = write(dir, "users/users.graphql", "scalar Date");
    let out = dir.join("out");

    assert_eq!(gschema(&["-q", "schema", &users, "-o", &out.display().to_string()]), 1);
    assert!(!out.exists());
}

#[test]
fn operations_are_written_per_destination() {
    let tmp = workspace();
    let dir = tmp.path();
    let host = write(
        dir,
        "web/src/users/gql.ts",
        "/** @mDest admin */\nexport const QUERY_ME = gql`\n  query Me { me { id } }\n`;\n",
    );
    let plain = write(dir, "web/src/shared/ping.graphql", "query Ping { ping }");
    let out = dir.join("out");

    assert_eq!(gschema(&["-q", "operations", &host, &plain, "-o", &out.display().to_string()]), 0);

    let admin = OperationRegistry::from_json(&std::fs::read_to_string(out.join("admin.json")).unwrap()).unwrap();
    assert!(admin.hash_for("Me").is_some());
    assert_eq!(admin.operations[0].module, "users");
    let default = OperationRegistry::from_json(&std::fs::read_to_string(out.join("default.json")).unwrap()).unwrap();
    assert_eq!(default.constants().keys().copied().collect::<Vec<_>>(), ["QUERY_PING"]);
}

#[test]
fn check_reports_syntax_errors() {
    let tmp = workspace();
    let dir = tmp.path();
    let good = write(dir, "good.graphql", "type User { id: ID! }");
    let bad = write(dir, "bad.graphql", "type User { id: }");

    assert_eq!(gschema(&["-q", "check", &good]), 0);
    assert_eq!(gschema(&["-q", "check", &good, &bad]), 1);
}

#[test]
fn config_file_is_applied() {
    let tmp = workspace();
    let dir = tmp.path();
    let config = write(dir, "gschema.json", r#"{ "scalar_prefix": "Scalar\\" }"#);
    let users = write(dir, "users/users.graphql", r#"scalar Date @scalar(class: "Other\\Date")"#);
    let out = dir.join("out").display().to_string();

    assert_eq!(gschema(&["-q", "schema", &users, "-o", &out]), 0);
    assert_eq!(gschema(&["-q", "--config", &config, "schema", &users, "-o", &out]), 1);
}
