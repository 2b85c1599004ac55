// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! rdl2-dso-check - Probe scene class DSOs on the search path
//!
//! Resolves the DSO search path the same way the renderer does, reports
//! which `<Class>.so` (or `<Class>.so.proxy`) files expose the rdl2 entry
//! points, and optionally prints the attribute table of each class.

use anyhow::{bail, Context};
use clap::Parser;
use rdl2::config::{DSO_EXTENSION, PROXY_EXTENSION};
use rdl2::{
    class_name_from_file_name, Attribute, AttributeFlags, AttributeValue, Dso, DsoFinder,
    LoaderConfig, SceneClass, SceneClassRegistry,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Probe and describe rdl2 scene class DSOs
#[derive(Parser, Debug)]
#[command(name = "rdl2-dso-check")]
#[command(version)]
#[command(about = "Probe and describe rdl2 scene class DSOs")]
#[command(args_override_self = true)]
struct Args {
    /// Class names to check (default: every module found on the search path)
    classes: Vec<String>,

    /// Extra DSO directories, searched first (path list; the last flag wins)
    #[arg(short = 'd', long = "dso-path", visible_alias = "dso_path")]
    dso_path: Option<String>,

    /// Check `<Class>.so.proxy` modules instead of `<Class>.so`
    #[arg(long)]
    proxy: bool,

    /// Load each valid class and print its attribute table
    #[arg(long)]
    describe: bool,

    /// Log filter when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// One module file found in a search directory.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    class_name: String,
    path: PathBuf,
}

fn main() {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("[ERROR] {:#}", e);
            std::process::exit(2);
        }
    }
}

/// Returns `Ok(false)` when at least one module failed its check.
fn run(args: &Args) -> anyhow::Result<bool> {
    let mut finder = DsoFinder::from_env();
    if let Some(path) = &args.dso_path {
        finder = finder.with_explicit_path(path);
    }
    let search_path = finder.search_path();
    println!("DSO search path: {}", finder.search_path_string());
    if let Some(guess) = finder.guess_dso_path() {
        tracing::debug!("launcher DSO directory: {}", guess.display());
    }

    let mut candidates = scan_search_path(&search_path, args.proxy);
    if !args.classes.is_empty() {
        candidates.retain(|c| args.classes.contains(&c.class_name));
        for class in &args.classes {
            if !candidates.iter().any(|c| &c.class_name == class) {
                bail!(
                    "no {} module for class '{}' on the search path",
                    mode_name(args.proxy),
                    class
                );
            }
        }
    }
    if candidates.is_empty() {
        println!("No {} modules found.", mode_name(args.proxy));
        return Ok(true);
    }

    let registry = SceneClassRegistry::new(
        LoaderConfig::new()
            .search_path(search_path.iter().cloned())
            .proxy_mode(args.proxy),
    );

    let mut all_ok = true;
    for candidate in &candidates {
        let valid = Dso::is_valid_dso(&candidate.path, args.proxy);
        println!(
            "{:<8} {:<24} {}",
            if valid { "[OK]" } else { "[FAIL]" },
            candidate.class_name,
            candidate.path.display()
        );
        if !valid {
            all_ok = false;
            continue;
        }
        if args.describe {
            match registry.load_class(&candidate.class_name) {
                Ok(sc) => print!("{}", describe_class(&sc)),
                Err(e) => {
                    all_ok = false;
                    eprintln!("         declare failed: {}", e);
                }
            }
        }
    }

    let class_names = registry.class_names();
    if !class_names.is_empty() {
        tracing::info!("declared {} classes: {}", class_names.len(), class_names.join(", "));
    }
    Ok(all_ok)
}

fn mode_name(proxy: bool) -> &'static str {
    if proxy {
        "proxy"
    } else {
        "DSO"
    }
}

/// Modules in search order. A class found in several directories is
/// reported once, at the location the loader would pick.
fn scan_search_path(search_path: &[PathBuf], proxy: bool) -> Vec<Candidate> {
    let mut out: Vec<Candidate> = Vec::new();
    for dir in search_path {
        let found = match scan_dir(dir, proxy) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!("skipping {}: {:#}", dir.display(), e);
                continue;
            }
        };
        for candidate in found {
            if out.iter().any(|c| c.class_name == candidate.class_name) {
                tracing::debug!("{} is shadowed", candidate.path.display());
                continue;
            }
            out.push(candidate);
        }
    }
    out
}

fn scan_dir(dir: &Path, proxy: bool) -> anyhow::Result<Vec<Candidate>> {
    let suffix = if proxy { PROXY_EXTENSION } else { DSO_EXTENSION };
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.ends_with(suffix) {
            continue;
        }
        let class_name = class_name_from_file_name(file_name);
        if class_name.is_empty() {
            continue;
        }
        found.push(Candidate { class_name, path });
    }
    found.sort_by(|a, b| a.class_name.cmp(&b.class_name));
    Ok(found)
}

fn describe_class(sc: &SceneClass) -> String {
    let mut out = format!(
        "         {} ({}) - {} attributes\n",
        sc.name(),
        sc.interface(),
        sc.attribute_count()
    );
    for attr in sc.attributes() {
        out.push_str(&describe_attribute(attr));
    }
    out
}

fn describe_attribute(attr: &Attribute) -> String {
    let mut out = format!(
        "           {:>3}  {:<18} {:<20} = {}",
        attr.index(),
        attr.attribute_type().name(),
        attr.name(),
        format_value(attr.default_value())
    );
    let flags = format_flags(attr.flags());
    if !flags.is_empty() {
        out.push_str(&format!("  [{}]", flags));
    }
    out.push('\n');

    if !attr.aliases().is_empty() {
        out.push_str(&format!("                aliases: {}\n", attr.aliases().join(", ")));
    }
    if let Some(group) = attr.group() {
        out.push_str(&format!("                group: {}\n", group));
    }
    for (value, desc) in attr.enum_values() {
        out.push_str(&format!("                {} = {}\n", value, desc));
    }
    for (key, value) in attr.metadata_entries() {
        out.push_str(&format!("                {}: {}\n", key, value));
    }
    out
}

fn format_flags(flags: AttributeFlags) -> String {
    [
        (AttributeFlags::BLURRABLE, "blurrable"),
        (AttributeFlags::ENUMERABLE, "enumerable"),
        (AttributeFlags::FILENAME, "filename"),
        (AttributeFlags::CAN_SKIP_GEOM_RELOAD, "can-skip-geom-reload"),
    ]
    .iter()
    .filter(|(flag, _)| flags.contains(*flag))
    .map(|(_, name)| *name)
    .collect::<Vec<_>>()
    .join(", ")
}

/// Short default value rendering; vectors print their length only.
fn format_value(value: &AttributeValue) -> String {
    if let Some(len) = value.len() {
        return format!("[{} elements]", len);
    }
    match value {
        AttributeValue::Bool(v) => v.to_string(),
        AttributeValue::Int(v) => v.to_string(),
        AttributeValue::Long(v) => v.to_string(),
        AttributeValue::Float(v) => format!("{:?}", v),
        AttributeValue::Double(v) => format!("{:?}", v),
        AttributeValue::String(v) => format!("{:?}", v),
        AttributeValue::Rgb(c) => format!("({}, {}, {})", c.r, c.g, c.b),
        AttributeValue::Rgba(c) => format!("({}, {}, {}, {})", c.r, c.g, c.b, c.a),
        AttributeValue::Vec2f(v) => format!("({}, {})", v.x, v.y),
        AttributeValue::Vec3f(v) => format!("({}, {}, {})", v.x, v.y, v.z),
        AttributeValue::Vec4f(v) => format!("({}, {}, {}, {})", v.x, v.y, v.z, v.w),
        AttributeValue::SceneObject(Some(r)) => r.to_string(),
        AttributeValue::SceneObject(None) => "null".to_string(),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_args_last_dso_path_wins() {
        let args =
            Args::try_parse_from(["rdl2-dso-check", "-d", "/a", "--dso_path", "/b"]).unwrap();
        assert_eq!(args.dso_path.as_deref(), Some("/b"));

        let args = Args::try_parse_from(["rdl2-dso-check", "--dso-path=/c", "--proxy"]).unwrap();
        assert_eq!(args.dso_path.as_deref(), Some("/c"));
        assert!(args.proxy);
        assert!(!args.describe);
    }

    #[test]
    fn test_scan_dir_filters_by_mode() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "SpotLight.so");
        touch(dir.path(), "RectLight.so");
        touch(dir.path(), "SpotLight.so.proxy");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), ".so");

        let dsos = scan_dir(dir.path(), false).unwrap();
        let names: Vec<&str> = dsos.iter().map(|c| c.class_name.as_str()).collect();
        assert_eq!(names, ["RectLight", "SpotLight"]);

        let proxies = scan_dir(dir.path(), true).unwrap();
        assert_eq!(proxies.len(), 1);
        assert_eq!(proxies[0].class_name, "SpotLight");
        assert!(proxies[0].path.ends_with("SpotLight.so.proxy"));
    }

    #[test]
    fn test_scan_search_path_first_directory_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        touch(first.path(), "SpotLight.so");
        touch(second.path(), "SpotLight.so");
        touch(second.path(), "RectLight.so");

        let search = vec![
            first.path().to_path_buf(),
            PathBuf::from("/nonexistent/rdl2dso"),
            second.path().to_path_buf(),
        ];
        let found = scan_search_path(&search, false);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].path, first.path().join("SpotLight.so"));
        assert_eq!(found[1].class_name, "RectLight");
    }

    #[test]
    fn test_describe_builtin_class() {
        let mut sc = SceneClass::new("Probe");
        let mode = sc
            .declare_attribute("mode", 1i32, AttributeFlags::ENUMERABLE)
            .unwrap();
        sc.set_enum_value(mode, 1, "spot").unwrap();
        let gain = sc
            .declare_attribute("gain", 2.0f32, AttributeFlags::BLURRABLE)
            .unwrap();
        sc.add_alias(gain, "exposure_gain").unwrap();
        sc.declare_attribute("ids", vec![1i32, 2, 3], AttributeFlags::NONE)
            .unwrap();
        sc.finalize();

        let text = describe_class(&sc);
        assert!(text.contains("Probe"));
        assert!(text.contains("3 attributes"));
        assert!(text.contains("1 = spot"));
        assert!(text.contains("aliases: exposure_gain"));
        assert!(text.contains("[blurrable]"));
        assert!(text.contains("[3 elements]"));
    }

    #[test]
    fn test_format_flags() {
        assert_eq!(format_flags(AttributeFlags::NONE), "");
        assert_eq!(
            format_flags(AttributeFlags::BLURRABLE | AttributeFlags::FILENAME),
            "blurrable, filename"
        );
    }
}
