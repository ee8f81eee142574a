use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{Result, ThemeError};
use crate::theme::{source_from_value, transform, SourceTheme, TargetTheme, TransformOptions};

/// Suffix given to converted files, also used to skip them in batch runs.
pub const OUTPUT_SUFFIX: &str = ".monaco.json";

/// Reads and parses a VS Code theme file.
/// Only invalid JSON is an error; odd shapes degrade to defaults.
pub fn read_source(path: &Path) -> Result<SourceTheme> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content).map_err(|source| ThemeError::Json {
        path: path.display().to_string(),
        source,
    })?;
    Ok(source_from_value(value))
}

/// Display name: explicit override, then the theme's own name, then the file stem.
pub fn theme_name(path: &Path, source: &SourceTheme, name_override: Option<&str>) -> String {
    name_override
        .map(str::to_string)
        .or_else(|| source.name.clone())
        .unwrap_or_else(|| file_stem(path))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "theme".to_string())
}

pub fn to_json(target: &TargetTheme, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(target)?
    } else {
        serde_json::to_string(target)?
    };
    Ok(json)
}

/// Default output location for `input`: `<stem>.monaco.json` in `output_dir`,
/// or beside the input when no directory is given.
pub fn default_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let file_name = format!("{}{}", file_stem(input), OUTPUT_SUFFIX);
    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

/// Converts a single file and returns the converted theme alongside its name.
pub fn convert_source(input: &Path, name_override: Option<&str>) -> Result<(String, TargetTheme)> {
    let source = read_source(input)?;
    let name = theme_name(input, &source, name_override);
    let target = transform(&source, &TransformOptions::named(name.clone()));
    Ok((name, target))
}

/// Converts `input` and writes the result. Returns the written path.
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    settings: &Settings,
    name_override: Option<&str>,
) -> Result<PathBuf> {
    let (name, target) = convert_source(input, name_override)?;
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(input, settings.output_dir().as_deref()),
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    write_atomic(&output, &to_json(&target, settings.pretty)?)?;
    info!(
        theme = %name,
        base = target.base.as_str(),
        rules = target.rules.len(),
        path = %output.display(),
        "wrote theme"
    );
    Ok(output)
}

/// Outcome of a directory conversion
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub converted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Converts every `*.json` theme in `dir`, in file-name order.
/// Previous outputs (`*.monaco.json`) are skipped. A file that fails is
/// recorded in the report and does not stop the batch.
pub fn convert_dir(dir: &Path, output_dir: Option<&Path>, settings: &Settings) -> Result<BatchReport> {
    if !dir.is_dir() {
        return Err(ThemeError::NotADirectory(dir.display().to_string()));
    }

    let mut inputs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_theme_file(path))
        .collect();
    inputs.sort();

    let output_dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| settings.output_dir());

    let mut report = BatchReport::default();
    for input in inputs {
        let output = default_output_path(&input, output_dir.as_deref());
        match convert_file(&input, Some(&output), settings, None) {
            Ok(path) => report.converted.push(path),
            Err(err) => {
                warn!(path = %input.display(), %err, "skipping theme");
                report.failed.push((input, err.to_string()));
            }
        }
    }
    Ok(report)
}

fn is_theme_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".json") && !name.ends_with(OUTPUT_SUFFIX)
}

/// Atomic write: write to temp file first, then rename
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let mut temp_path = OsString::from(path.as_os_str());
    temp_path.push(".tmp");
    let temp_path = PathBuf::from(temp_path);

    fs::write(&temp_path, content)?;
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }
    Ok(())
}
