use std::fs;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::{CardError, Result};
use crate::models::Record;

/// Entry name suffix of the card manifest inside a `.dhcb` archive.
pub const MANIFEST_SUFFIX: &str = "cards.json";
pub const ARCHIVE_EXTENSIONS: [&str; 2] = ["dhcb", "zip"];

pub fn load_json_file(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| CardError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| CardError::json(path, e))
}

/// Pretty-prints `value` with two-space indentation, keeping non-ASCII text literal.
pub fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CardError::io(parent, e))?;
    }
    let content = serde_json::to_string_pretty(value).map_err(|e| CardError::json(path, e))?;
    fs::write(path, content).map_err(|e| CardError::io(path, e))
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|candidate| *candidate == ext)
        })
        .unwrap_or(false)
}

pub fn is_archive(path: &Path) -> bool {
    has_extension(path, &ARCHIVE_EXTENSIONS)
}

/// Reads the card manifest out of a `.dhcb`/`.zip` container.
pub fn load_archive(path: &Path) -> Result<Value> {
    let file = fs::File::open(path).map_err(|e| CardError::io(path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|source| CardError::Archive {
        path: path.to_path_buf(),
        source,
    })?;

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let target = pick_manifest(&names).ok_or_else(|| CardError::NoManifest(path.to_path_buf()))?;

    let mut entry = archive
        .by_name(&target)
        .map_err(|source| CardError::Archive {
            path: path.to_path_buf(),
            source,
        })?;
    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|e| CardError::io(path.join(&target), e))?;

    serde_json::from_str(&content).map_err(|e| CardError::json(path.join(&target), e))
}

/// Exact `cards.json` entries win, then any `*cards.json`, then the first `.json`.
fn pick_manifest(names: &[String]) -> Option<String> {
    let lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();

    let exact = lowered.iter().position(|name| {
        name.rsplit('/').next() == Some(MANIFEST_SUFFIX)
    });
    let suffixed = || lowered.iter().position(|name| name.ends_with(MANIFEST_SUFFIX));
    let any_json = || lowered.iter().position(|name| name.ends_with(".json"));

    exact
        .or_else(suffixed)
        .or_else(any_json)
        .map(|index| names[index].clone())
}

/// Appends the records held by a parsed root: a dict is one record, a list
/// contributes each of its object elements.
fn extend_records(records: &mut Vec<Record>, root: Value, path: &Path) -> Result<()> {
    match root {
        Value::Object(record) => records.push(record),
        Value::Array(items) => {
            for (index, item) in items.into_iter().enumerate() {
                match item {
                    Value::Object(record) => records.push(record),
                    _ => warn!(
                        "[COLLECT] {} 第 {} 项不是字典，已跳过",
                        path.display(),
                        index
                    ),
                }
            }
        }
        _ => return Err(CardError::InvalidRoot(path.to_path_buf())),
    }
    Ok(())
}

/// 收集输入路径下的所有记录：JSON文件、.dhcb/.zip 卡包，或递归搜索的文件夹
pub fn collect_records(input: &Path) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    if input.is_file() {
        let root = if has_extension(input, &["json"]) {
            load_json_file(input)?
        } else if is_archive(input) {
            load_archive(input)?
        } else {
            return Err(CardError::UnsupportedExtension(input.to_path_buf()));
        };
        extend_records(&mut records, root, input)?;
    } else if input.is_dir() {
        for entry in WalkDir::new(input)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
        {
            let path = entry.path();
            if !has_extension(path, &["json"]) {
                continue;
            }
            let loaded = load_json_file(path).and_then(|root| extend_records(&mut records, root, path));
            if let Err(err) = loaded {
                warn!("[COLLECT] 跳过 {}: {}", path.display(), err);
            }
        }
    } else {
        return Err(CardError::MissingPath(input.to_path_buf()));
    }

    Ok(records)
}
