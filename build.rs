use std::env;
use std::process::Command;
use time::OffsetDateTime;

fn main() {
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    println!("cargo:rerun-if-env-changed=CARGO_PKG_VERSION");

    let build_year = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|raw| raw.parse::<i64>().ok())
        .and_then(|epoch| OffsetDateTime::from_unix_timestamp(epoch).ok())
        .map(|dt| dt.year())
        .unwrap_or_else(|| OffsetDateTime::now_utc().year());

    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());

    // Release builds skip git so they stay reproducible from a tarball
    let profile = env::var("PROFILE").unwrap_or_default();
    let display = if profile == "release" {
        version.clone()
    } else {
        println!("cargo:rerun-if-changed=.git/HEAD");
        let short_rev = Command::new("git")
            .args(["rev-parse", "--short", "HEAD"])
            .output()
            .ok()
            .filter(|output| output.status.success())
            .and_then(|output| String::from_utf8(output.stdout).ok())
            .map(|rev| rev.trim().to_string())
            .filter(|rev| !rev.is_empty());

        match short_rev {
            Some(rev) => format!("{version}-dev+{rev}"),
            None => format!("{version}-dev"),
        }
    };

    println!("cargo:rustc-env=ROW_LOCATE_BUILD_YEAR={build_year}");
    println!("cargo:rustc-env=ROW_LOCATE_VERSION_DISPLAY={display}");
}
