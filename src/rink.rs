use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::error::{CardError, Result};
use crate::fields::{get_text, text};
use crate::models::{
    AdversaryImageSettings, AdversaryTrait, EnvironmentImageSettings, EnvironmentTrait,
    Record, RinkAdversary, RinkCard, RinkEnvironment,
};

pub const RINK_OUTPUT_DIR: &str = "rink";

const ADVERSARY_DECORATOR_COLOR: &str = "#8a1c1c";
const ENVIRONMENT_DECORATOR_COLOR: &str = "#1c538a";
const HIGHLIGHT_BG_COLOR: &str = "#852020";
const HIGHLIGHT_TEXT_COLOR: &str = "#ffffff";
const BLANK_IMAGE: &str = "about:blank";

lazy_static! {
    static ref FEAR_COST_RE: Regex =
        Regex::new(r"花费\s*(\d+)\s*恐惧点").expect("invalid fear cost regex");
    static ref EXPERIENCE_SPLIT_RE: Regex =
        Regex::new(r"[，,]").expect("invalid experience separator regex");
}

fn traits_of(record: &Record) -> Vec<&Record> {
    match record.get("特性") {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
        _ => Vec::new(),
    }
}

/// `战斗经验，潜行, 追踪` → `["战斗经验", "潜行", "追踪"]`.
pub fn split_experiences(raw: &str) -> Vec<String> {
    EXPERIENCE_SPLIT_RE
        .split(raw)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads the fear cost out of a trait description, `(false, "0")` when absent.
pub fn fear_cost(description: &str) -> (bool, String) {
    FEAR_COST_RE
        .captures(description)
        .and_then(|caps| caps.get(1))
        .map(|cost| (true, cost.as_str().to_string()))
        .unwrap_or_else(|| (false, "0".to_string()))
}

pub fn convert_adversary(src: &Record) -> RinkAdversary {
    let attack_bonus = get_text(src, "攻击命中");
    let attack_bonus = attack_bonus
        .strip_prefix('+')
        .unwrap_or(&attack_bonus)
        .to_string();

    let traits = traits_of(src)
        .into_iter()
        .map(|t| {
            let kind = get_text(t, "类型");
            let desc = get_text(t, "特性描述");
            AdversaryTrait {
                name: get_text(t, "名称"),
                desc: if kind.is_empty() {
                    desc
                } else {
                    format!("{}：{}", kind, desc)
                },
                flavor: String::new(),
            }
        })
        .collect();

    RinkAdversary {
        name: get_text(src, "名称"),
        rank: get_text(src, "位阶"),
        kind: get_text(src, "种类"),
        description: get_text(src, "简介"),
        motivation: get_text(src, "动机与战术"),
        difficulty: get_text(src, "难度"),
        threshold: format!(
            "{}/{}",
            get_text(src, "重度伤害阈值"),
            get_text(src, "严重伤害阈值")
        ),
        health: get_text(src, "生命点"),
        stress: get_text(src, "压力点"),
        attack_bonus,
        weapon_name: get_text(src, "攻击武器"),
        weapon_range: get_text(src, "攻击范围"),
        damage_dice: get_text(src, "攻击伤害"),
        damage_type: get_text(src, "攻击属性"),
        decorator_color: ADVERSARY_DECORATOR_COLOR.to_string(),
        highlight_bg_color: HIGHLIGHT_BG_COLOR.to_string(),
        highlight_text_color: HIGHLIGHT_TEXT_COLOR.to_string(),
        is_npc: false,
        image_src: BLANK_IMAGE.to_string(),
        image_transform: String::new(),
        image_settings: AdversaryImageSettings {
            width: "150".to_string(),
            height: "150".to_string(),
            shape: "circle".to_string(),
            hide_border: false,
        },
        experiences: split_experiences(&get_text(src, "经历")),
        traits,
        special_traits: Vec::new(),
    }
}

pub fn convert_environment(src: &Record) -> RinkEnvironment {
    let traits = traits_of(src)
        .into_iter()
        .map(|t| {
            let name = get_text(t, "名称");
            let original = get_text(t, "原名");
            let desc = get_text(t, "特性描述");
            let (fear, cost) = fear_cost(&desc);
            EnvironmentTrait {
                name: if original.is_empty() {
                    name
                } else {
                    format!("{} {}", name, original)
                },
                kind: get_text(t, "类型"),
                fear,
                cost,
                desc,
                qs: get_text(t, "特性问题"),
            }
        })
        .collect();

    RinkEnvironment {
        name: get_text(src, "名称"),
        name_en: get_text(src, "原文"),
        rank: get_text(src, "位阶"),
        kind: get_text(src, "种类"),
        description: get_text(src, "简介"),
        tendencies: get_text(src, "趋向"),
        difficulty: get_text(src, "难度"),
        enemies: get_text(src, "潜在敌人"),
        decorator_color: ENVIRONMENT_DECORATOR_COLOR.to_string(),
        highlight_bg_color: HIGHLIGHT_BG_COLOR.to_string(),
        highlight_text_color: HIGHLIGHT_TEXT_COLOR.to_string(),
        image_settings: EnvironmentImageSettings {
            src: String::new(),
            width: "350".to_string(),
            height: "200".to_string(),
            transform: String::new(),
            hide_border: false,
        },
        traits,
    }
}

/// Dispatches on `类型`; anything but `敌人`/`环境` is reported and dropped.
pub fn convert_item(record: &Record) -> Option<RinkCard> {
    match record.get("类型").map(text).as_deref() {
        Some("敌人") => Some(RinkCard::Adversary(convert_adversary(record))),
        Some("环境") => Some(RinkCard::Environment(convert_environment(record))),
        other => {
            warn!(
                "[RINK] 未知类型 '{}'（{}），已跳过",
                other.unwrap_or("None"),
                record.get("名称").map(text).unwrap_or_else(|| "Unknown".to_string())
            );
            None
        }
    }
}

/// 转换为 rink 格式；类型不是“敌人”或“环境”的记录会被跳过
pub fn convert_records(data: &Value, source: &Path) -> Result<Vec<RinkCard>> {
    match data {
        Value::Array(items) => Ok(items
            .iter()
            .filter_map(|item| match item {
                Value::Object(record) => convert_item(record),
                _ => {
                    warn!("[RINK] 非字典条目已跳过");
                    None
                }
            })
            .collect()),
        Value::Object(record) => Ok(convert_item(record).into_iter().collect()),
        _ => Err(CardError::InvalidRoot(source.to_path_buf())),
    }
}

/// `rink/<stem>_rink.json`, relative to the working directory.
pub fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Path::new(RINK_OUTPUT_DIR).join(format!("{}_rink.json", stem))
}
