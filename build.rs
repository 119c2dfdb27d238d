use std::env;
use std::process::Command;

/// Embeds build metadata as `FLOWMATCH_BUILD_*` environment variables.
fn main() {
    for path in ["build.rs", ".git/HEAD", ".git/refs"] {
        println!("cargo:rerun-if-changed={path}");
    }

    let hash = command_output("git", &["rev-parse", "--short", "HEAD"])
        .unwrap_or_else(|| "unknown".to_string());
    let status = match command_output("git", &["status", "--porcelain"]) {
        Some(changes) if changes.is_empty() => "clean",
        Some(_) => "dirty",
        None => "unknown",
    };
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let rustc = command_output("rustc", &["--version"]).unwrap_or_else(|| "unknown".to_string());

    let vars = [
        ("HASH", hash),
        ("STATUS", status.to_string()),
        ("TIMESTAMP", timestamp),
        ("TARGET", env_or("TARGET", "unknown-target")),
        ("PROFILE", env_or("PROFILE", "unknown-profile")),
        ("RUSTC", rustc),
    ];
    for (key, value) in vars {
        println!("cargo:rustc-env=FLOWMATCH_BUILD_{key}={value}");
    }
}

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

/// Trimmed stdout of a successful command. `git status` may legitimately be empty.
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
