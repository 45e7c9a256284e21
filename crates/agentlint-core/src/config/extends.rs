//! `extends` resolution.
//!
//! References are resolved relative to the document that names them. Each
//! chain of documents is tracked so a cycle is reported with every document
//! on it, whichever document the run started from.

use super::{ConfigFormat, Configuration, merge};
use crate::diagnostics::ConfigError;
use agentlint_rules::{PRESET_PREFIX, preset, preset_names};
use std::path::{Path, PathBuf};

/// Longest chain of `extends` followed before giving up.
pub const MAX_EXTENDS_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    File(PathBuf),
    Preset(String),
}

impl Source {
    /// Identity of the document within a chain.
    fn key(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::Preset(name) => format!("{}{}", PRESET_PREFIX, name),
        }
    }

    fn load(&self) -> Result<Configuration, ConfigError> {
        match self {
            Source::File(path) => Configuration::load(path),
            Source::Preset(name) => {
                let text = preset(name).ok_or_else(|| unknown_preset(name))?;
                Configuration::parse(text, ConfigFormat::Json, Path::new(&self.key()))
            }
        }
    }

    /// Directory that relative references inside this document resolve
    /// against. Presets only extend other presets, so the working directory
    /// is good enough for them.
    fn base_dir(&self) -> PathBuf {
        match self {
            Source::File(path) => path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
            Source::Preset(_) => PathBuf::from("."),
        }
    }
}

fn unknown_preset(name: &str) -> ConfigError {
    ConfigError::UnknownPreset {
        name: name.to_string(),
        known: preset_names()
            .into_iter()
            .map(|n| format!("{}{}", PRESET_PREFIX, n))
            .collect(),
    }
}

/// Load the document at `path` and merge everything it extends into it.
///
/// For `extends: [A, B]` the parents are folded left to right, so `B` wins
/// over `A`, and the document itself is merged last so it wins over both.
pub fn resolve_with_extends(path: &Path) -> Result<Configuration, ConfigError> {
    let canonical = canonical_path(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    resolve_source(&Source::File(canonical), &mut Vec::new())
}

/// Resolve the `extends` of an in-memory document whose relative references
/// point into `base_dir`.
pub fn resolve_document(config: Configuration, base_dir: &Path) -> Result<Configuration, ConfigError> {
    resolve_loaded(config, base_dir, &mut Vec::new())
}

fn resolve_source(source: &Source, chain: &mut Vec<String>) -> Result<Configuration, ConfigError> {
    let key = source.key();
    if chain.contains(&key) {
        let mut cycle = chain.clone();
        cycle.push(key);
        return Err(ConfigError::CircularExtends { chain: cycle });
    }
    if chain.len() >= MAX_EXTENDS_DEPTH {
        return Err(ConfigError::ExtendsTooDeep {
            path: PathBuf::from(key),
            max: MAX_EXTENDS_DEPTH,
        });
    }

    let config = source.load()?;
    chain.push(key);
    let resolved = resolve_loaded(config, &source.base_dir(), chain)?;
    chain.pop();
    Ok(resolved)
}

fn resolve_loaded(
    mut config: Configuration,
    base_dir: &Path,
    chain: &mut Vec<String>,
) -> Result<Configuration, ConfigError> {
    let Some(extends) = config.extends.take() else {
        return Ok(config);
    };

    let mut base: Option<Configuration> = None;
    for reference in extends.references() {
        let source = resolve_reference(reference, base_dir)?;
        tracing::debug!(reference = %reference, resolved = %source.key(), "resolving extends");
        let parent = resolve_source(&source, chain)?;
        base = Some(match base {
            Some(acc) => merge(acc, parent),
            None => parent,
        });
    }

    Ok(match base {
        Some(base) => merge(base, config),
        None => config,
    })
}

fn is_path_reference(reference: &str) -> bool {
    reference.starts_with("./")
        || reference.starts_with("../")
        || reference.starts_with(".\\")
        || reference.starts_with("..\\")
        || reference == "."
        || reference == ".."
        || Path::new(reference).is_absolute()
}

fn resolve_reference(reference: &str, base_dir: &Path) -> Result<Source, ConfigError> {
    if let Some(name) = reference.strip_prefix(PRESET_PREFIX) {
        return match preset(name) {
            Some(_) => Ok(Source::Preset(name.to_string())),
            None => Err(unknown_preset(name)),
        };
    }

    if is_path_reference(reference) {
        let joined = base_dir.join(reference);
        let missing = || ConfigError::MissingExtends {
            reference: reference.to_string(),
            path: joined.clone(),
            from: base_dir.to_path_buf(),
        };
        if !joined.is_file() {
            return Err(missing());
        }
        return canonical_path(&joined)
            .map(Source::File)
            .map_err(|_| missing());
    }

    resolve_package(reference, base_dir).map(Source::File)
}

/// Split `@scope/pkg/sub/file.json` into (`@scope/pkg`, `sub/file.json`).
fn split_package(reference: &str) -> (&str, Option<&str>) {
    let boundary = if reference.starts_with('@') {
        reference
            .match_indices('/')
            .nth(1)
            .map(|(idx, _)| idx)
    } else {
        reference.find('/')
    };
    match boundary {
        Some(idx) => (&reference[..idx], Some(&reference[idx + 1..])),
        None => (reference, None),
    }
}

/// Resolve a shared configuration package the way JS tooling does: the
/// nearest `node_modules/<name>` above `base_dir` wins.
fn resolve_package(reference: &str, base_dir: &Path) -> Result<PathBuf, ConfigError> {
    let unresolved = || ConfigError::UnresolvedPackage {
        name: reference.to_string(),
        from: base_dir.to_path_buf(),
    };
    let (name, subpath) = split_package(reference);

    let package_dir = base_dir
        .ancestors()
        .map(|dir| dir.join("node_modules").join(name))
        .find(|candidate| candidate.is_dir())
        .ok_or_else(unresolved)?;

    let entry = match subpath {
        Some(sub) => package_dir.join(sub),
        None => package_entry(&package_dir),
    };
    if !entry.is_file() {
        return Err(unresolved());
    }
    canonical_path(&entry).map_err(|_| unresolved())
}

/// `main` from `package.json`, else `agentlint.json`.
fn package_entry(package_dir: &Path) -> PathBuf {
    let main = std::fs::read_to_string(package_dir.join("package.json"))
        .ok()
        .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
        .and_then(|manifest| manifest.get("main")?.as_str().map(str::to_string));
    match main {
        Some(main) => package_dir.join(main),
        None => package_dir.join("agentlint.json"),
    }
}

/// Canonicalize without the `\\?\` prefix Windows adds, so chains stay
/// readable in error messages.
fn canonical_path(path: &Path) -> std::io::Result<PathBuf> {
    let canonical = std::fs::canonicalize(path)?;
    #[cfg(windows)]
    {
        if let Some(stripped) = canonical.to_str().and_then(|s| s.strip_prefix(r"\\?\")) {
            return Ok(PathBuf::from(stripped));
        }
    }
    Ok(canonical)
}
