use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn write_package(root: &Path, name: &str, deps: &[&str], build: bool) {
    let pkg_dir = root.join("packages").join(name);
    fs::create_dir_all(&pkg_dir).unwrap();
    let deps = deps
        .iter()
        .map(|d| format!("\"{}\": \"^1.0.0\"", d))
        .collect::<Vec<_>>()
        .join(", ");
    let scripts = if build {
        r#""scripts": { "build": "tsc" },"#
    } else {
        ""
    };
    fs::write(
        pkg_dir.join("package.json"),
        format!(
            r#"{{ "name": "{}", "version": "1.0.0", {} "dependencies": {{ {} }} }}"#,
            name, scripts, deps
        ),
    )
    .unwrap();
}

/// Workspace with a <- b <- c.
fn create_workspace() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_package(temp_dir.path(), "a", &[], true);
    write_package(temp_dir.path(), "b", &["a"], false);
    write_package(temp_dir.path(), "c", &["b"], true);
    temp_dir
}

fn polypub(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_polypub"))
        .arg("--root")
        .arg(root)
        .arg("--quiet")
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute polypub")
}

#[test]
fn test_list_json_prints_publish_order() {
    let workspace = create_workspace();
    let output = polypub(workspace.path(), &["--list", "--json"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = json["packages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(json["degraded"], false);
}

#[test]
fn test_list_with_only_and_exclude() {
    let workspace = create_workspace();
    let output = polypub(
        workspace.path(),
        &["--list", "--json", "--only", "c", "--exclude", "a"],
    );

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["packages"].as_array().unwrap().len(), 2);
}

#[test]
fn test_empty_workspace_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = polypub(temp_dir.path(), &["--list"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No publishable packages"));
}

#[test]
fn test_unknown_only_fails() {
    let workspace = create_workspace();
    let output = polypub(workspace.path(), &["--list", "--only", "nope", "--only", "zip"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nope, zip"));
}

#[test]
fn test_invalid_tag_fails() {
    let workspace = create_workspace();
    let output = polypub(workspace.path(), &["--tag", "has space"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid tag"));
}

#[test]
fn test_tag_is_required_to_publish() {
    let workspace = create_workspace();
    let output = polypub(workspace.path(), &[]);
    assert!(!output.status.success());
}

#[cfg(unix)]
mod fake_client {
    use std::os::unix::fs::PermissionsExt;

    use super::*;

    /// Installs a client script that logs `<package dir> <args>` and fails
    /// when `$FAIL_ON` matches `<package dir>:<first arg>`.
    fn install_client(dir: &Path) -> (PathBuf, PathBuf) {
        let script = dir.join("fake-client.sh");
        let log = dir.join("calls.log");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\n\
                 pkg=$(basename \"$PWD\")\n\
                 echo \"$pkg $*\" >> \"{}\"\n\
                 if [ \"$pkg:$1\" = \"$FAIL_ON\" ]; then exit 3; fi\n\
                 exit 0\n",
                log.display()
            ),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        (script, log)
    }

    fn run(root: &Path, client: &Path, fail_on: &str, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_polypub"))
            .arg("--root")
            .arg(root)
            .arg("--quiet")
            .arg("--client")
            .arg(client)
            .args(args)
            .env("FAIL_ON", fail_on)
            .stdin(Stdio::null())
            .output()
            .expect("Failed to execute polypub")
    }

    fn calls(log: &Path) -> Vec<String> {
        fs::read_to_string(log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_dry_run_by_default() {
        let workspace = create_workspace();
        let bin = TempDir::new().unwrap();
        let (client, log) = install_client(bin.path());

        let output = run(workspace.path(), &client, "", &["--tag", "next"]);

        assert!(output.status.success());
        assert_eq!(
            calls(&log),
            vec![
                "a run build",
                "a publish --tag next --dry-run --ignore-scripts",
                "b publish --tag next --dry-run --ignore-scripts",
                "c run build",
                "c publish --tag next --dry-run --ignore-scripts",
            ]
        );
    }

    #[test]
    fn test_failure_stops_run_and_propagates_exit_code() {
        let workspace = create_workspace();
        let bin = TempDir::new().unwrap();
        let (client, log) = install_client(bin.path());
        let report = bin.path().join("report.json");

        let output = run(
            workspace.path(),
            &client,
            "b:publish",
            &["--tag", "next", "--report", report.to_str().unwrap()],
        );

        assert_eq!(output.status.code(), Some(3));
        let calls = calls(&log);
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| !c.starts_with("c ")));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["failure"]["package"], "b");
        assert_eq!(json["failure"]["exit_code"], 3);
    }

    #[test]
    fn test_unwritable_report_keeps_failing_step_exit_code() {
        let workspace = create_workspace();
        let bin = TempDir::new().unwrap();
        let (client, _log) = install_client(bin.path());
        let report = bin.path().join("missing-dir").join("report.json");

        let output = run(
            workspace.path(),
            &client,
            "b:publish",
            &["--tag", "next", "--report", report.to_str().unwrap()],
        );

        assert_eq!(output.status.code(), Some(3));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("failed to write report"));
    }

    #[test]
    fn test_unwritable_report_fails_a_successful_run() {
        let workspace = create_workspace();
        let bin = TempDir::new().unwrap();
        let (client, _log) = install_client(bin.path());
        let report = bin.path().join("missing-dir").join("report.json");

        let output = run(
            workspace.path(),
            &client,
            "",
            &["--tag", "next", "--report", report.to_str().unwrap()],
        );

        assert_eq!(output.status.code(), Some(1));
    }

    #[test]
    fn test_yes_publishes_for_real() {
        let workspace = create_workspace();
        let bin = TempDir::new().unwrap();
        let (client, log) = install_client(bin.path());

        let output = run(
            workspace.path(),
            &client,
            "",
            &[
                "--tag",
                "latest",
                "--yes",
                "--allow-dirty",
                "--skip-build",
                "--only",
                "a",
                "--access",
                "public",
            ],
        );

        assert!(output.status.success());
        assert_eq!(
            calls(&log),
            vec!["a publish --tag latest --ignore-scripts --access public"]
        );
    }

    #[test]
    fn test_publish_without_confirmation_aborts() {
        let workspace = create_workspace();
        let bin = TempDir::new().unwrap();
        let (client, log) = install_client(bin.path());

        let output = run(
            workspace.path(),
            &client,
            "",
            &["--tag", "latest", "--publish", "--allow-dirty"],
        );

        assert!(output.status.success());
        assert!(calls(&log).is_empty());
        assert!(String::from_utf8_lossy(&output.stderr).contains("Aborted"));
    }

    #[test]
    fn test_dirty_tree_blocks_real_publish() {
        let workspace = create_workspace();
        let bin = TempDir::new().unwrap();
        let (client, log) = install_client(bin.path());

        // Not a git repository at all, so the cleanliness check cannot pass.
        let output = run(workspace.path(), &client, "", &["--tag", "latest", "--yes"]);

        assert_eq!(output.status.code(), Some(1));
        assert!(calls(&log).is_empty());
    }
}
