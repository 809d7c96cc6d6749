use std::process::Command;

// Captures the compiler identity so isa::compiler_identity() can report it
// at runtime, mirroring what __VERSION__-style macros provide elsewhere.
fn main() {
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "rustc (unknown version)".to_string());

    println!("cargo:rustc-env=MOLINO_RUSTC_VERSION={version}");
    println!("cargo:rerun-if-changed=build.rs");
}
