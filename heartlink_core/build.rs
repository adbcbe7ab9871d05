// Build script for heartlink_core - embeds the toolchain version at compile time

use std::process::Command;

fn main() {
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());

    let version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|version| !version.is_empty())
        .unwrap_or_else(|| "rustc (unknown version)".to_string());

    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown-target".to_string());

    // rustc-env values must stay on one line
    println!("cargo:rustc-env=HEARTLINK_RUSTC_VERSION={}", version.replace(['\n', '\r'], " "));
    println!("cargo:rustc-env=HEARTLINK_BUILD_TARGET={}", target);

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=RUSTC");
}
