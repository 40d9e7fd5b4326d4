use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::fields::{get_text, get_text_or, text};
use crate::models::{KeywordEntry, Record};

/// Fields left out of the keyword description block.
const OMITTED_FIELDS: [&str; 3] = ["原名", "背景问题", "关系问题"];
const DEFAULT_CATEGORY: &str = "默认类型";
const DISPLAY_MODE: &str = "normal";

pub fn keyword_entry(record: &Record) -> KeywordEntry {
    let mut category = get_text_or(record, "类型", DEFAULT_CATEGORY);
    if category == "领域卡" {
        category = format!("{}-{}", category, get_text(record, "领域"));
    }

    let description = record
        .iter()
        .filter(|(key, _)| {
            let key = key.as_str();
            key != "名称" && key != "类型" && !OMITTED_FIELDS.contains(&key)
        })
        .map(|(key, value)| format!("{}:{}", key, text(value)))
        .collect::<Vec<_>>()
        .join("\n");

    KeywordEntry {
        keyword: get_text(record, "名称"),
        category,
        description: description.trim().to_string(),
        display: DISPLAY_MODE.to_string(),
    }
}

/// 提取关键词摘要，输入可以是单条记录或记录列表
pub fn work(data: &Value) -> Vec<KeywordEntry> {
    match data {
        Value::Object(record) => vec![keyword_entry(record)],
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match item {
                Value::Object(record) => Some(keyword_entry(record)),
                _ => {
                    warn!("[KEYWORD] 第 {} 项不是字典，已跳过", index);
                    None
                }
            })
            .collect(),
        _ => {
            warn!("[KEYWORD] JSON 根元素既不是字典也不是列表");
            Vec::new()
        }
    }
}

/// `<dir>/<stem>_keyword.json` beside the input.
pub fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}_keyword.json", stem))
}
