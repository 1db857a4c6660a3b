//! Stamps the simulator's `--version` line with commit, date and profile.

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn git_short_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let commit = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!commit.is_empty()).then_some(commit)
}

fn main() -> io::Result<()> {
    // CI exports these; local builds ask git and the clock
    let commit = env::var("FAVOR_BUILD_COMMIT")
        .ok()
        .or_else(git_short_commit)
        .unwrap_or_else(|| UNKNOWN.to_string());
    let date = env::var("FAVOR_BUILD_DATE")
        .unwrap_or_else(|_| chrono::Utc::now().format("%Y-%m-%d").to_string());
    let profile = env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string());

    let out_dir = env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "OUT_DIR is not set"))?;

    fs::write(
        out_dir.join("build_info.rs"),
        format!(
            "pub const BUILD_COMMIT: &str = {:?};\n\
             pub const BUILD_DATE: &str = {:?};\n\
             pub const BUILD_PROFILE: &str = {:?};\n",
            commit, date, profile
        ),
    )?;

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=FAVOR_BUILD_COMMIT");
    println!("cargo:rerun-if-env-changed=FAVOR_BUILD_DATE");
    Ok(())
}
