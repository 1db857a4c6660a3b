//! Build stamp generated by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// One-line description of this build, e.g. `favor 0.1.0 (3f2a9c1, 2026-10-17, release)`.
pub fn version_line() -> String {
    format!(
        "favor {} ({}, {}, {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_COMMIT,
        BUILD_DATE,
        BUILD_PROFILE
    )
}
