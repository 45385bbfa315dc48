//! Command-level checks of the CLI against a local mock server.

use std::path::Path;

use clap::Parser;
use sehat_cli::{
    cli::{ArticleCommands, Cli, Commands, StatusArg},
    commands,
};
use sehat_frontend::session::{FileSessionStore, SessionStore, AUTH_FLAG_KEY, TOKEN_KEY};
use serde_json::json;
use tempfile::TempDir;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn cli(server: &MockServer, session_file: &Path, args: &[&str]) -> Cli {
    let mut argv = vec![
        "sehat-cli".to_string(),
        "--api-url".to_string(),
        server.uri(),
        "--session-file".to_string(),
        session_file.display().to_string(),
    ];
    argv.extend(args.iter().map(|arg| arg.to_string()));
    Cli::try_parse_from(argv).expect("valid arguments")
}

fn article(id: i64, status: &str, image: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Sarapan",
        "content": "Buah dan oat.",
        "image": image,
        "read_time": 5,
        "status": status,
        "views": 0,
        "created_at": "2025-01-15T08:00:00Z",
    })
}

#[test]
fn article_flags_parse_into_fields() {
    let cli = Cli::try_parse_from([
        "sehat-cli",
        "articles",
        "create",
        "--title",
        "Sarapan",
        "--content",
        "Buah",
        "--read-time",
        "7",
        "--publish",
    ])
    .expect("parse");

    assert_eq!(cli.session_file, Path::new("./data/session.json"));
    let Commands::Articles {
        command: ArticleCommands::Create {
            fields,
        },
    } = cli.command
    else {
        panic!("expected articles create");
    };
    assert_eq!(fields.title.as_deref(), Some("Sarapan"));
    assert_eq!(fields.read_time.as_deref(), Some("7"));
    assert!(fields.publish);
    assert!(!fields.remove_image);
}

#[test]
fn list_filters_accept_status_values() {
    let cli = Cli::try_parse_from(["sehat-cli", "articles", "list", "--status", "published"])
        .expect("parse");
    let Commands::Articles {
        command: ArticleCommands::List {
            status, ..
        },
    } = cli.command
    else {
        panic!("expected articles list");
    };
    assert_eq!(status, Some(StatusArg::Published));

    assert!(Cli::try_parse_from(["sehat-cli", "articles", "list", "--status", "hidden"]).is_err());
}

#[test]
fn content_and_content_file_conflict() {
    let result = Cli::try_parse_from([
        "sehat-cli",
        "articles",
        "create",
        "--content",
        "x",
        "--content-file",
        "body.txt",
    ]);
    assert!(result.is_err());
}

#[tokio::test]
async fn login_then_logout_round_trips_the_session_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({ "username": "admin" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "access_token": "jwt-abc" })))
        .mount(&server)
        .await;
    let dir = TempDir::new().expect("tempdir");
    let session_file = dir.path().join("nested").join("session.json");

    commands::run(cli(
        &server,
        &session_file,
        &["login", "--username", "admin", "--password", "admin123"],
    ))
    .await
    .expect("login");

    let store = FileSessionStore::new(&session_file);
    assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("jwt-abc"));
    assert_eq!(store.get(AUTH_FLAG_KEY).as_deref(), Some("true"));

    commands::run(cli(&server, &session_file, &["logout"]))
        .await
        .expect("logout");
    assert!(store.token().is_none());
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn rejected_login_reports_friendly_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })))
        .mount(&server)
        .await;
    let dir = TempDir::new().expect("tempdir");
    let session_file = dir.path().join("session.json");

    let err = commands::run(cli(
        &server,
        &session_file,
        &["login", "--username", "admin", "--password", "salah"],
    ))
    .await
    .expect_err("rejected");

    assert_eq!(err.to_string(), "Username atau password salah");
}

#[tokio::test]
async fn admin_commands_require_a_session() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("tempdir");
    let session_file = dir.path().join("session.json");

    let err = commands::run(cli(&server, &session_file, &["dashboard"]))
        .await
        .expect_err("no session");

    assert!(err.to_string().contains("not signed in"));
    assert!(server
        .received_requests()
        .await
        .expect("recording enabled")
        .is_empty());
}

#[tokio::test]
async fn create_uploads_image_before_publishing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "url": "/uploads/oat.png" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .and(body_partial_json(json!({
            "title": "Sarapan",
            "image": "/uploads/oat.png",
            "status": "published",
            "read_time": 5,
            "category_id": null,
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(article(21, "published", Some("/uploads/oat.png"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    let session_file = dir.path().join("session.json");
    FileSessionStore::new(&session_file)
        .begin("tok")
        .expect("seed session");
    let image = dir.path().join("oat.png");
    std::fs::write(&image, b"png").expect("write image");
    let image = image.display().to_string();

    commands::run(cli(
        &server,
        &session_file,
        &[
            "articles",
            "create",
            "--title",
            "Sarapan",
            "--content",
            "Buah dan oat.",
            "--read-time",
            "abc",
            "--image",
            &image,
            "--publish",
        ],
    ))
    .await
    .expect("create");
}

#[tokio::test]
async fn update_keeps_stored_fields_and_saves_as_draft() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/21"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(article(21, "published", Some("/uploads/oat.png"))),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/articles/21"))
        .and(body_partial_json(json!({
            "title": "Sarapan pagi",
            "content": "Buah dan oat.",
            "image": "/uploads/oat.png",
            "status": "draft",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(article(21, "draft", None)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("tempdir");
    let session_file = dir.path().join("session.json");
    FileSessionStore::new(&session_file)
        .begin("tok")
        .expect("seed session");

    commands::run(cli(
        &server,
        &session_file,
        &["articles", "update", "21", "--title", "Sarapan pagi"],
    ))
    .await
    .expect("update");
}
