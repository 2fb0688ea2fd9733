// README → rustdoc helpers shared by the crate build scripts.
// Pull in with: include!("../build_common.rs");
//
// The including build.rs must import:
//   use std::env;
//   use std::fs;
//   use std::path::Path;

/// Copy the crate README into `OUT_DIR/README_GENERATED.md`, rewriting links
/// so they resolve from rustdoc.
///
/// - `](src/foo.rs)` becomes `](foo)` so it points at the module page
/// - `](../../README.md` becomes the repository URL from the workspace manifest
fn write_rustdoc_readme(crate_dir: &str) {
    println!("cargo:rerun-if-changed=README.md");
    println!("cargo:rerun-if-changed=../../Cargo.toml");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("README_GENERATED.md");

    // A crate without a README still needs the generated file for include_str!.
    let content = fs::read_to_string(Path::new(crate_dir).join("README.md")).unwrap_or_default();

    let mut rendered = content.replace("](src/", "](").replace(".rs)", ")");
    if let Some(url) = workspace_repository(crate_dir) {
        rendered = rendered.replace("](../../README.md", &format!("]({url}"));
    }

    fs::write(dest_path, rendered).unwrap();
}

/// Read `repository = "..."` from the workspace Cargo.toml two levels up.
fn workspace_repository(crate_dir: &str) -> Option<String> {
    let manifest = Path::new(crate_dir).parent()?.parent()?.join("Cargo.toml");
    let content = fs::read_to_string(manifest).ok()?;

    content.lines().map(str::trim).find_map(|line| {
        let value = line.strip_prefix("repository")?.trim_start().strip_prefix('=')?;
        let value = value.trim().trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}
