use std::process::Command;

fn main() {
    // RUFF_SYNC_VERSION from the environment wins (release builds); otherwise
    // use git describe for local builds.
    if let Ok(version) = std::env::var("RUFF_SYNC_VERSION") {
        println!("cargo:rustc-env=RUFF_SYNC_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=RUFF_SYNC_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=RUFF_SYNC_VERSION");
}
