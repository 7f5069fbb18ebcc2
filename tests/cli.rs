use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;

/// The binary with no inherited configuration from the environment.
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("belenios-bootstrap").expect("binary");
    for var in [
        "BELENIOS_URL",
        "BELENIOS_TOKEN",
        "BELENIOS_USERNAME",
        "BELENIOS_PASSWORD",
        "BELENIOS_FALLBACK_TOKEN",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_lists_subcommands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bootstrap"))
        .stdout(predicate::str::contains("whoami"));
}

#[test]
fn unknown_admin_action_is_rejected() {
    cli()
        .args(["--token", "t", "action", "u-1", "Reopen"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn list_prints_server_json() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/elections")
            .header("authorization", "Bearer t");
        then.status(200).json_body(json!([{"uuid": "u-1", "name": "Test"}]));
    });

    cli()
        .args(["--url", server.base_url().as_str(), "--token", "t", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"uuid\": \"u-1\""));
    mock.assert();
}

#[test]
fn api_failure_exits_with_code_two() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/elections/u-9");
        then.status(404).body("no such election");
    });

    cli()
        .args(["--url", server.base_url().as_str(), "--token", "t", "status", "u-9"])
        .assert()
        .code(2)
        .stderr(predicate::str::starts_with("[erro] HTTP 404"))
        .stderr(predicate::str::contains("elections/u-9"));
}

#[test]
fn delete_reports_removal() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/api/elections/u-1");
        then.status(200);
    });

    cli()
        .args(["--url", server.base_url().as_str(), "--token", "t", "delete", "u-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ok] Election u-1 deleted"));
    mock.assert();
}

#[test]
fn action_posts_the_action_name() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/elections/u-1")
            .json_body(json!("ReleaseTally"));
        then.status(200);
    });

    cli()
        .args(["--url", server.base_url().as_str(), "--token", "t", "action", "u-1", "ReleaseTally"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ReleaseTally"));
    mock.assert();
}

#[test]
fn whoami_uses_token_from_web_login() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/auth/password");
        then.status(200)
            .body(r#"<form><input type="hidden" name="state" value="s1"></form>"#);
    });
    server.mock(|when, then| {
        when.method(POST).path("/auth/password").body_contains("state=s1");
        then.status(200);
    });
    server.mock(|when, then| {
        when.method(GET).path("/api-token");
        then.status(200).body("tok-login");
    });
    let account = server.mock(|when, then| {
        when.method(GET)
            .path("/api/account")
            .header("authorization", "Bearer tok-login");
        then.status(200).json_body(json!({"id": 1, "name": "admin"}));
    });

    cli()
        .args([
            "--url",
            server.base_url().as_str(),
            "--username",
            "admin",
            "--password",
            "pw",
            "whoami",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": 1"));
    account.assert();
}

#[test]
fn whoami_falls_back_when_login_is_forbidden() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/auth/password");
        then.status(403).body("Forbidden");
    });
    let account = server.mock(|when, then| {
        when.method(GET)
            .path("/api/account")
            .header("authorization", "Bearer fb");
        then.status(200).json_body(json!({"id": 2}));
    });

    cli()
        .args([
            "--url",
            server.base_url().as_str(),
            "--username",
            "admin",
            "--password",
            "pw",
            "--fallback-token",
            "fb",
            "whoami",
        ])
        .assert()
        .success();
    account.assert();
}

#[test]
fn empty_token_still_tries_web_login() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/auth/password");
        then.status(200)
            .body(r#"<form><input type="hidden" name="state" value="s2"></form>"#);
    });
    let submit = server.mock(|when, then| {
        when.method(POST).path("/auth/password").body_contains("state=s2");
        then.status(200);
    });
    server.mock(|when, then| {
        when.method(GET).path("/api-token");
        then.status(200).body("tok-login");
    });
    let account = server.mock(|when, then| {
        when.method(GET)
            .path("/api/account")
            .header("authorization", "Bearer tok-login");
        then.status(200).json_body(json!({"id": 3}));
    });

    cli()
        .args([
            "--url",
            server.base_url().as_str(),
            "--token",
            "",
            "--username",
            "admin",
            "--password",
            "pw",
            "whoami",
        ])
        .assert()
        .success();
    submit.assert();
    account.assert();
}

#[test]
fn oversized_http_timeout_is_a_usage_error() {
    cli()
        .args(["--token", "t", "--timeout", "18446744073709551615", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--timeout"));
}
