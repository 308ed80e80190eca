use std::process::Command;

fn main() {
    // Prefer the git describe output; fall back to the crate version for
    // builds outside a checkout (e.g. from a source tarball).
    let described = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string());

    let version = match described {
        Some(tag) => tag.strip_prefix('v').unwrap_or(&tag).to_string(),
        None => env!("CARGO_PKG_VERSION").to_string(),
    };

    println!("cargo:rustc-env=GIT_VERSION={version}");
}
