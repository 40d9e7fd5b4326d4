use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::collector::{load_json_file, write_json_file};
use crate::error::{CardError, Result};

pub const ZZZ_SUFFIX: &str = "_zzz.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub files_found: usize,
    pub files_merged: usize,
    pub records: usize,
    pub output: PathBuf,
}

/// Every `*_zzz.json` below `root`, in walk order.
pub fn find_zzz_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(ZZZ_SUFFIX))
        .map(|entry| entry.into_path())
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

pub fn load_json_list(path: &Path) -> Result<Vec<Value>> {
    match load_json_file(path)? {
        Value::Array(items) => Ok(items),
        other => Err(CardError::NotAList {
            path: path.to_path_buf(),
            kind: json_kind(&other),
        }),
    }
}

/// 合并所有可读文件中的列表，返回合并结果和成功加载的文件数
///
/// Concatenates the lists of every readable file; the rest are reported and skipped.
pub fn merge_files(paths: &[PathBuf]) -> (Vec<Value>, usize) {
    let mut merged = Vec::new();
    let mut files_merged = 0;

    for path in paths {
        match load_json_list(path) {
            Ok(items) => {
                info!("[MERGE] 已加载 {}，包含 {} 条记录", path.display(), items.len());
                merged.extend(items);
                files_merged += 1;
            }
            Err(err) => warn!("[MERGE] 跳过文件 {}: {}", path.display(), err),
        }
    }

    (merged, files_merged)
}

/// `<parent>/<dir name>_zzz.json` for the input directory (or the directory of
/// an input file). A filesystem root writes into the working directory.
pub fn output_path(input: &Path) -> Result<PathBuf> {
    let resolved = fs::canonicalize(input).map_err(|e| CardError::io(input, e))?;
    let input_dir = if resolved.is_file() {
        resolved.parent().map(Path::to_path_buf).unwrap_or(resolved)
    } else {
        resolved
    };

    let folder_name = input_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent_dir = match input_dir.parent() {
        Some(parent) => parent.to_path_buf(),
        None => env::current_dir().map_err(|e| CardError::io(".", e))?,
    };

    Ok(parent_dir.join(format!("{}_zzz.json", folder_name)))
}

/// Merges every `*_zzz.json` under `root`. Returns `None` when no file matched.
pub fn merge_directory(root: &Path) -> Result<Option<MergeReport>> {
    if !root.exists() {
        return Err(CardError::MissingPath(root.to_path_buf()));
    }

    let files = find_zzz_files(root);
    if files.is_empty() {
        warn!("[MERGE] 在 {} 下未找到 *{} 文件", root.display(), ZZZ_SUFFIX);
        return Ok(None);
    }

    info!("[MERGE] 找到 {} 个 *{} 文件", files.len(), ZZZ_SUFFIX);
    for file in &files {
        info!("[MERGE]   {}", file.display());
    }

    let (merged, files_merged) = merge_files(&files);
    info!("[MERGE] 合并后总计 {} 条记录", merged.len());

    let output = output_path(root)?;
    write_json_file(&output, &merged)?;
    info!("[MERGE] 结果已保存到 {}", output.display());

    Ok(Some(MergeReport {
        files_found: files.len(),
        files_merged,
        records: merged.len(),
        output,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merges_lists_and_skips_bad_files() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("领域");
        fs::create_dir_all(root.join("奥秘")).unwrap();
        fs::write(root.join("a_zzz.json"), r#"[{"名称":"甲"},{"名称":"乙"}]"#).unwrap();
        fs::write(root.join("奥秘/b_zzz.json"), r#"[{"名称":"丙"}]"#).unwrap();
        fs::write(root.join("c_zzz.json"), r#"{"名称":"字典"}"#).unwrap();
        fs::write(root.join("d_zzz.json"), "[broken").unwrap();
        fs::write(root.join("other.json"), r#"[{"名称":"无关"}]"#).unwrap();

        let report = merge_directory(&root).unwrap().unwrap();

        assert_eq!(report.files_found, 4);
        assert_eq!(report.files_merged, 2);
        assert_eq!(report.records, 3);
        assert_eq!(report.output.file_name().unwrap(), "领域_zzz.json");

        let written = load_json_list(&report.output).unwrap();
        assert_eq!(written.len(), 3);
    }

    #[test]
    fn merge_files_counts_only_loaded_files() {
        let temp = tempfile::tempdir().unwrap();
        let good = temp.path().join("a_zzz.json");
        let bad = temp.path().join("b_zzz.json");
        fs::write(&good, r#"[1, 2]"#).unwrap();
        fs::write(&bad, r#""text""#).unwrap();

        let (merged, files_merged) = merge_files(&[good, bad, temp.path().join("gone_zzz.json")]);
        assert_eq!(merged, vec![Value::from(1), Value::from(2)]);
        assert_eq!(files_merged, 1);
    }

    #[test]
    fn nothing_found_is_not_an_error() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(merge_directory(temp.path()).unwrap(), None);
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        assert!(matches!(
            merge_directory(&temp.path().join("absent")),
            Err(CardError::MissingPath(_))
        ));
    }

    #[test]
    fn output_lands_beside_input_directory() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("职业");
        fs::create_dir_all(&root).unwrap();
        let file = root.join("x_zzz.json");
        fs::write(&file, "[]").unwrap();

        let expected = fs::canonicalize(temp.path()).unwrap().join("职业_zzz.json");
        assert_eq!(output_path(&root).unwrap(), expected);
        assert_eq!(output_path(&file).unwrap(), expected);
    }

    #[test]
    fn non_list_root_names_its_kind() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("a_zzz.json");
        fs::write(&path, r#"{"a":1}"#).unwrap();

        match load_json_list(&path) {
            Err(CardError::NotAList { kind, .. }) => assert_eq!(kind, "dict"),
            other => panic!("Expected NotAList, got {:?}", other),
        }
    }
}
