use std::env;
use std::process::Command;

/// Trimmed stdout of a git command, if git is present and the command worked.
fn git(args: &[&str]) -> Option<String> {
    let out = Command::new("git").args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env=PASSCARD_{key}={value}");
}

fn main() {
    // Tarball builds have no repository; report that instead of failing.
    let revision = git(&["describe", "--always", "--dirty", "--abbrev=12"])
        .unwrap_or_else(|| "unknown".into());
    emit("GIT_REVISION", &revision);

    let built = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    emit("BUILD_TIME", &built);

    let target = env::var("TARGET").unwrap_or_else(|_| "unknown-target".into());
    emit("TARGET", &target);

    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".into());
    emit("BUILD_PROFILE", &profile);

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=PROFILE");
}
