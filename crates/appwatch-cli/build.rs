//! Build script to derive version from git tags
//!
//! The reported version follows `git describe`, so Cargo.toml does not need
//! to be bumped in step with tags.

fn main() {
    // Rerun if git HEAD changes (workspace root)
    println!("cargo:rerun-if-changed=../../.git/HEAD");

    let version = std::process::Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty=-dev"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().trim_start_matches('v').to_string())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=APPWATCH_VERSION={version}");
}
