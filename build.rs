//! Build script for autoapprove: embeds a human-readable version string.
//!
//! The string has the form `<pkg version> (<git version>) <rustc version>`,
//! where the git version is `git describe --tags --always --dirty` when a tag
//! is reachable, and otherwise a pseudo-version
//! `v<pkg version>-<YYYYmmddHHMMSS>-<12 char sha>[+dirty]`. Clean trees use
//! the commit time so the same commit always yields the same string; dirty
//! trees and builds outside git use the build time.

use std::process::Command;

use chrono::{DateTime, Utc};

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

fn main() {
    for path in ["src", "build.rs", "Cargo.toml", "Cargo.lock"] {
        println!("cargo:rerun-if-changed={path}");
    }

    let version = [
        Some(PKG_VERSION.to_string()),
        Some(format!("({})", git_version())),
        capture("rustc", &["--version"]),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={version}");
}

/// Trimmed stdout of a successful command with non-empty output.
fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn git(args: &[&str]) -> Option<String> {
    capture("git", args)
}

fn git_version() -> String {
    match git(&["describe", "--tags", "--always", "--dirty"]) {
        // A bare hash means no tag was reachable.
        Some(desc) if desc.contains('v') || desc.contains("-g") => desc,
        _ => pseudo_version(),
    }
}

/// `None` outside a git checkout. `.cargo-ok` is written by `cargo install
/// --git` and does not count as a change.
fn is_dirty() -> Option<bool> {
    git(&["status", "--porcelain"])
        .map(|status| status.lines().any(|line| line.get(3..) != Some(".cargo-ok")))
        .or_else(|| git(&["rev-parse", "--git-dir"]).map(|_| false))
}

fn pseudo_version() -> String {
    let commit = git(&["rev-parse", "--short=12", "HEAD"]).unwrap_or_else(|| "unknown".into());
    let dirty = is_dirty();

    let commit_time = || {
        git(&["log", "-1", "--format=%ct"])
            .and_then(|secs| secs.parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    };
    let timestamp = match dirty {
        Some(false) => commit_time().unwrap_or_else(Utc::now),
        _ => Utc::now(),
    }
    .format(TIMESTAMP_FORMAT);

    let suffix = if dirty == Some(true) { "+dirty" } else { "" };
    format!("v{PKG_VERSION}-{timestamp}-{commit}{suffix}")
}
