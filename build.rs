//! Build script for keyspaces-bench
//!
//! Exposes build time, git revision and compiler version to `build_info()`.

use std::process::Command;

fn main() {
    let build_time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    println!("cargo:rustc-env=BUILD_TIME={}", build_time);

    let docs_rs = std::env::var("DOCS_RS").is_ok();

    let git_hash = if docs_rs {
        Some("docs-rs-build".to_string())
    } else {
        command_output("git", &["rev-parse", "--short", "HEAD"])
    };
    println!(
        "cargo:rustc-env=GIT_HASH={}",
        git_hash.unwrap_or_else(|| "unknown".to_string())
    );

    let rust_version = if docs_rs {
        Some("stable".to_string())
    } else {
        command_output("rustc", &["--version"])
    };
    println!(
        "cargo:rustc-env=RUST_VERSION={}",
        rust_version.unwrap_or_else(|| "unknown".to_string())
    );

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=Cargo.toml");
}

/// Trimmed stdout of a successful command
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}
