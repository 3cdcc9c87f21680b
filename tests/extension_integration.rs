//! Integration tests for the extension system
//!
//! These tests drive the built binary the way the host startup sequence
//! runs: load config, apply extensions, then read agent state. They verify:
//! - the compiled-in override is visible through the CLI
//! - disabling it keeps the host default
//! - directory extensions apply after the compiled-in one and win
//! - a missing override target aborts with a nonzero exit
//! - listing and status output

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Helper to get the orbx binary path
fn orbx_binary() -> PathBuf {
    // When running tests, the binary is in target/debug/orbx
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps
    path.push("orbx");
    path
}

/// Helper to run orbx with a custom orbx directory
fn run_orbx(orbx_dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(orbx_binary())
        .env("ORBX_DIR", orbx_dir)
        .env_remove("ORBX_CONFIG")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute orbx")
}

/// Helper to run orbx and get stdout as string
fn run_orbx_stdout(orbx_dir: &Path, args: &[&str]) -> String {
    let output = run_orbx(orbx_dir, args);
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Helper to create a directory extension with an inline prompt
fn create_prompt_extension(extensions_dir: &Path, name: &str, agent: &str, text: &str) {
    let extension_dir = extensions_dir.join(name);
    fs::create_dir_all(&extension_dir).unwrap();

    let manifest = format!(
        r#"extension:
  name: {name}
  version: 0.1.0
  description: Test extension for integration tests
prompt:
  agent: {agent}
  text: "{text}"
"#
    );
    fs::write(extension_dir.join("extension.yaml"), manifest).unwrap();
}

/// Helper to setup a test orbx environment
fn setup_test_env(builtin_enabled: bool) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let orbx_dir = temp.path().join(".config").join("orbx");
    let extensions_dir = orbx_dir.join("extensions");

    fs::create_dir_all(&extensions_dir).unwrap();

    // Minimal config with absolute paths to the test directory
    let config = format!(
        r#"paths:
  extensions: "{extensions}"

extensions:
  builtin_enabled: {builtin_enabled}

log_level: error
"#,
        extensions = extensions_dir.display(),
    );
    fs::write(orbx_dir.join("orbx.yaml"), config).unwrap();

    (temp, orbx_dir)
}

// ============================================================================
// Integration Tests
// ============================================================================

#[test]
fn test_builtin_override_is_visible() {
    let (_temp, orbx_dir) = setup_test_env(true);

    let stdout = run_orbx_stdout(&orbx_dir, &["agent", "prompt", "chat"]);

    assert!(stdout.starts_with("You are orb"), "Got: {}", &stdout[..stdout.len().min(80)]);
    assert!(stdout.contains("sonos-mux"));
}

#[test]
fn test_builtin_disabled_keeps_host_default() {
    let (_temp, orbx_dir) = setup_test_env(false);

    let stdout = run_orbx_stdout(&orbx_dir, &["agent", "prompt", "chat"]);

    assert_eq!(stdout.trim_end(), "You are a generic assistant.");
}

#[test]
fn test_default_kind_is_chat() {
    let (_temp, orbx_dir) = setup_test_env(true);

    let stdout = run_orbx_stdout(&orbx_dir, &["agent", "prompt"]);

    assert!(stdout.starts_with("You are orb"));
}

#[test]
fn test_directory_extension_wins_over_builtin() {
    let (_temp, orbx_dir) = setup_test_env(true);
    create_prompt_extension(
        &orbx_dir.join("extensions"),
        "studio-notes",
        "chat",
        "You are the studio assistant.",
    );

    let stdout = run_orbx_stdout(&orbx_dir, &["agent", "prompt", "chat"]);

    assert_eq!(stdout.trim_end(), "You are the studio assistant.");
}

#[test]
fn test_unknown_target_aborts_startup() {
    let (_temp, orbx_dir) = setup_test_env(true);
    create_prompt_extension(&orbx_dir.join("extensions"), "lost-notes", "jukebox", "You are lost.");

    let output = run_orbx(&orbx_dir, &["agent", "prompt", "chat"]);

    assert!(!output.status.success(), "Startup should fail on a missing target");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("jukebox"), "Got: {}", stderr);
}

#[test]
fn test_unknown_kind_prompt_fails() {
    let (_temp, orbx_dir) = setup_test_env(true);

    let output = run_orbx(&orbx_dir, &["agent", "prompt", "percussion"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("percussion"), "Got: {}", stderr);
}

#[test]
fn test_extension_list_json() {
    let (_temp, orbx_dir) = setup_test_env(true);
    create_prompt_extension(
        &orbx_dir.join("extensions"),
        "studio-notes",
        "chat",
        "You are the studio assistant.",
    );

    let stdout = run_orbx_stdout(&orbx_dir, &["extension", "list", "--format", "json"]);
    let extensions: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();

    assert_eq!(extensions.len(), 2);

    // Application order: compiled-in first, then directory extensions
    assert_eq!(extensions[0]["name"], "sonos-mux");
    assert_eq!(extensions[0]["builtin"], true);
    assert_eq!(extensions[0]["state"], "applied");
    assert_eq!(extensions[0]["target"], "chat");

    assert_eq!(extensions[1]["name"], "studio-notes");
    assert_eq!(extensions[1]["builtin"], false);
    assert_eq!(extensions[1]["state"], "applied");
}

#[test]
fn test_extension_info() {
    let (_temp, orbx_dir) = setup_test_env(true);

    let stdout = run_orbx_stdout(&orbx_dir, &["extension", "info", "sonos-mux"]);

    assert!(stdout.contains("sonos-mux"));
    assert!(stdout.contains("chat"));
    assert!(stdout.contains("compiled-in"));
}

#[test]
fn test_agent_list_shows_provenance() {
    let (_temp, orbx_dir) = setup_test_env(true);

    let stdout = run_orbx_stdout(&orbx_dir, &["agent", "list", "--format", "json"]);
    let agents: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();

    let chat = agents.iter().find(|a| a["kind"] == "chat").expect("chat kind listed");
    assert_eq!(chat["source"], "extension:sonos-mux");
}

#[test]
fn test_status_json() {
    let (_temp, orbx_dir) = setup_test_env(true);

    let stdout = run_orbx_stdout(&orbx_dir, &["status", "--format", "json"]);
    let status: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(status["builtin_enabled"], true);
    let agents = status["agents"].as_array().unwrap();
    assert!(agents.iter().any(|a| a["kind"] == "chat" && a["source"] == "extension:sonos-mux"));
    let extensions = status["extensions"].as_array().unwrap();
    assert!(extensions.iter().any(|e| e["name"] == "sonos-mux" && e["state"] == "applied"));
}

#[test]
fn test_status_reports_failed_extension() {
    let (_temp, orbx_dir) = setup_test_env(true);
    create_prompt_extension(&orbx_dir.join("extensions"), "lost-notes", "jukebox", "You are lost.");

    let output = run_orbx(&orbx_dir, &["status", "--format", "json"]);
    assert!(output.status.success(), "status should report, not abort");

    let status: serde_json::Value = serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    let extensions = status["extensions"].as_array().unwrap();
    let lost = extensions.iter().find(|e| e["name"] == "lost-notes").unwrap();
    assert!(lost["state"].as_str().unwrap().starts_with("failed"));
}

#[test]
fn test_doctor_reports_broken_extension() {
    let (_temp, orbx_dir) = setup_test_env(true);
    let broken_dir = orbx_dir.join("extensions").join("broken");
    fs::create_dir_all(&broken_dir).unwrap();
    fs::write(broken_dir.join("extension.yaml"), "not: [valid").unwrap();

    let output = run_orbx(&orbx_dir, &["doctor"]);

    assert!(output.status.success(), "doctor should diagnose, not abort");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("issue(s) found"), "Got: {}", stdout);
}

#[test]
fn test_doctor_clean_environment() {
    let (_temp, orbx_dir) = setup_test_env(true);

    let output = run_orbx(&orbx_dir, &["doctor"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("All checks passed"), "Got: {}", stdout);
}
