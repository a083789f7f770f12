use std::process::Command;

fn main() {
    // Embed git commit hash; builds from a source tarball have none.
    let git_hash = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_owned())
        .unwrap_or_else(|| "unknown".to_owned());
    println!("cargo:rustc-env=GIT_HASH={}", git_hash);

    // Embed build time
    let build_time = chrono::Utc::now().to_rfc3339();
    println!("cargo:rustc-env=BUILD_TIME={}", build_time);

    // The relay key is read with option_env! in bridge-ui-adapters.
    println!("cargo:rerun-if-env-changed=BRIDGE_RELAY_API_KEY");
}
