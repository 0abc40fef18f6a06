use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

fn mailmerge_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mailmerge"));
    cmd.env_remove("MAILMERGE_LOG");
    cmd
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write fixture");
    path
}

const PEOPLE_CSV: &str = "Name,Email\nAnn,ann@example.com\nBob,bob@example.com\n";

#[test]
fn scan_lists_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let tpl = write_file(dir.path(), "t.txt", "Hi {{ name }}, {{code}}");

    let output = mailmerge_bin()
        .args(["scan", tpl.to_str().unwrap()])
        .output()
        .expect("failed to execute mailmerge");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("name"), "Expected name token, got: {stdout}");
    assert!(stdout.contains("3..13"), "Expected offsets, got: {stdout}");
    assert!(stdout.contains("code"), "Expected code token, got: {stdout}");
}

#[test]
fn scan_reads_stdin() {
    let mut child = mailmerge_bin()
        .args(["scan", "-", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to execute mailmerge");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"{{a}}{{b}}")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let tokens: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tokens.as_array().map(Vec::len), Some(2));
    assert_eq!(tokens[1]["name"], "b");
    assert_eq!(tokens[1]["start"], 5);
}

#[test]
fn check_reports_unknown_fields() {
    let dir = tempfile::tempdir().unwrap();
    let tpl = write_file(dir.path(), "t.txt", "Hi {{name}}, {{Email}}");
    let data = write_file(dir.path(), "d.csv", PEOPLE_CSV);

    let output = mailmerge_bin()
        .args(["check", tpl.to_str().unwrap(), "--data", data.to_str().unwrap()])
        .output()
        .expect("failed to execute mailmerge");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stdout.contains("unknown field 'Email'"),
        "Expected case-sensitive mismatch, got: {stdout}"
    );
    assert!(stdout.contains("available: name, email"));
}

#[test]
fn preview_marks_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let tpl = write_file(dir.path(), "t.txt", "Hi {{name}}, {{code}}");

    let output = mailmerge_bin()
        .args(["preview", tpl.to_str().unwrap(), "--fields", "name,email"])
        .current_dir(dir.path())
        .output()
        .expect("failed to execute mailmerge");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "Hi [{{name}}], [!{{code}}]");
}

#[test]
fn preview_uses_config_markers() {
    let dir = tempfile::tempdir().unwrap();
    let tpl = write_file(dir.path(), "t.txt", "{{name}} {{x}}");
    let cfg = write_file(
        dir.path(),
        "c.toml",
        "[preview]\nvalid_open = \"<\"\nvalid_close = \">\"\ninvalid_open = \"?\"\ninvalid_close = \"?\"\n",
    );

    let output = mailmerge_bin()
        .args([
            "--config",
            cfg.to_str().unwrap(),
            "preview",
            tpl.to_str().unwrap(),
            "--fields",
            "name",
        ])
        .output()
        .expect("failed to execute mailmerge");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "<{{name}}> ?{{x}}?");
}

#[test]
fn merge_prints_one_document_per_row() {
    let dir = tempfile::tempdir().unwrap();
    let tpl = write_file(dir.path(), "t.txt", "Hello {{name}}");
    let data = write_file(dir.path(), "d.csv", PEOPLE_CSV);

    let output = mailmerge_bin()
        .args(["merge", tpl.to_str().unwrap(), "--data", data.to_str().unwrap(), "--json"])
        .current_dir(dir.path())
        .output()
        .expect("failed to execute mailmerge");

    let docs: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(docs, vec!["Hello Ann", "Hello Bob"]);
}

#[test]
fn merge_warns_on_residual_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let tpl = write_file(dir.path(), "t.txt", "Hi {{name}}, code {{code}}");
    let data = write_file(dir.path(), "d.csv", PEOPLE_CSV);

    let output = mailmerge_bin()
        .args(["merge", tpl.to_str().unwrap(), "--data", data.to_str().unwrap()])
        .current_dir(dir.path())
        .output()
        .expect("failed to execute mailmerge");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stdout, "Hi Ann, code {{code}}\n---\nHi Bob, code {{code}}");
    assert!(
        stderr.contains("still contain placeholders"),
        "Expected warning, got: {stderr}"
    );
}

#[test]
fn merge_with_subject_composes_messages() {
    let dir = tempfile::tempdir().unwrap();
    let tpl = write_file(dir.path(), "t.txt", "Dear {{name}}");
    let data = write_file(dir.path(), "d.csv", PEOPLE_CSV);

    let output = mailmerge_bin()
        .args([
            "merge",
            tpl.to_str().unwrap(),
            "--data",
            data.to_str().unwrap(),
            "--subject",
            "Hi {{name}}",
            "--json",
        ])
        .current_dir(dir.path())
        .output()
        .expect("failed to execute mailmerge");

    let messages: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(messages[0]["to"][0], "ann@example.com");
    assert_eq!(messages[1]["subject"], "Hi Bob");
    assert_eq!(messages[1]["body"], "Dear Bob");
}

#[test]
fn merge_with_bad_recipient_field_fails() {
    let dir = tempfile::tempdir().unwrap();
    let tpl = write_file(dir.path(), "t.txt", "Dear {{name}}");
    let data = write_file(dir.path(), "d.csv", PEOPLE_CSV);

    let output = mailmerge_bin()
        .args([
            "merge",
            tpl.to_str().unwrap(),
            "--data",
            data.to_str().unwrap(),
            "--subject",
            "s",
            "--to-field",
            "mail",
        ])
        .current_dir(dir.path())
        .output()
        .expect("failed to execute mailmerge");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("recipient field 'mail'"), "got: {stderr}");
}

#[test]
fn insert_prints_template_and_cursor() {
    let dir = tempfile::tempdir().unwrap();
    let tpl = write_file(dir.path(), "t.txt", "Hello ");

    let output = mailmerge_bin()
        .args(["insert", tpl.to_str().unwrap(), "--at", "6", "--field", "name"])
        .output()
        .expect("failed to execute mailmerge");

    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hello {{name}}");
    assert!(String::from_utf8_lossy(&output.stderr).contains("cursor: 14"));
}

#[test]
fn recipients_validate_rejects_missing_headers() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_file(dir.path(), "d.csv", PEOPLE_CSV);

    let output = mailmerge_bin()
        .args(["recipients", "validate", data.to_str().unwrap()])
        .current_dir(dir.path())
        .output()
        .expect("failed to execute mailmerge");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("missing required headers"), "got: {stdout}");
}

#[test]
fn recipients_template_prints_header() {
    let dir = tempfile::tempdir().unwrap();
    let output = mailmerge_bin()
        .args(["recipients", "template"])
        .current_dir(dir.path())
        .output()
        .expect("failed to execute mailmerge");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("user_code,student_id,full_name,email_hcmut"));
}

#[test]
fn samples_list_and_show() {
    let output = mailmerge_bin()
        .args(["samples"])
        .output()
        .expect("failed to execute mailmerge");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("welcome"), "got: {stdout}");

    let output = mailmerge_bin()
        .args(["samples", "welcome"])
        .output()
        .expect("failed to execute mailmerge");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("{{full_name}}"), "got: {stdout}");

    let output = mailmerge_bin()
        .args(["samples", "nope"])
        .output()
        .expect("failed to execute mailmerge");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn config_prints_defaults_as_toml() {
    let dir = tempfile::tempdir().unwrap();
    let output = mailmerge_bin()
        .args(["config"])
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .output()
        .expect("failed to execute mailmerge");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Built-in defaults"), "got: {stdout}");
    assert!(stdout.contains("recipient_field = \"email\""), "got: {stdout}");
}
