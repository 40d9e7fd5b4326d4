//! rrr → zzz: expands packaged card sets back into flat authoring records.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{CardError, Result};
use crate::fields::{is_truthy, text, tier_to_flat};
use crate::models::{
    AncestryCard, CommunityCard, DomainCard, ProfessionCard, Record, SubclassCard,
};
use crate::pack::NOT_CASTABLE;

/// Package sections, in the order they are expanded.
pub const CATEGORY_KEYS: [&str; 6] = [
    "profession",
    "ancestry",
    "community",
    "subclass",
    "domain",
    "variant",
];

/// 将 rrr 卡包展开为 zzz 记录
///
/// Expands packages into flat records.
///
/// Ancestry features are merged per ancestry name and emitted after every
/// other record, in the order their ancestry was first seen.
pub fn work_rrr(packages: &[Record]) -> Vec<Record> {
    let mut records = Vec::new();
    let mut ancestries: IndexMap<String, Record> = IndexMap::new();

    for package in packages {
        for key in CATEGORY_KEYS {
            for entry in section_entries(package, key) {
                let result: Result<Option<Record>> = match key {
                    "profession" => parse_entry(entry).map(|card| Some(unpack_profession(card))),
                    "ancestry" => parse_entry(entry).map(|card| {
                        merge_ancestry(&mut ancestries, card);
                        None
                    }),
                    "community" => parse_entry(entry).map(|card| Some(unpack_community(card))),
                    "subclass" => parse_entry(entry).map(|card| Some(unpack_subclass(card))),
                    "domain" => parse_entry(entry).map(|card| Some(unpack_domain_card(card))),
                    _ => unpack_variant(entry).map(Some),
                };

                match result {
                    Ok(unpacked) => records.extend(unpacked),
                    Err(err) => warn!("[UNPACK] 跳过 {} 条目: {}", key, err),
                }
            }
        }
    }

    records.extend(ancestries.into_values());
    records
}

/// A section may hold a list of entries or a single entry.
fn section_entries<'a>(package: &'a Record, key: &str) -> Vec<&'a Value> {
    match package.get(key) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(entry) if entry.as_object().is_some_and(|map| !map.is_empty()) => vec![entry],
        Some(other) if is_truthy(other) => {
            warn!("[UNPACK] {} 不是列表或字典，已忽略", key);
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn parse_entry<T: DeserializeOwned>(entry: &Value) -> Result<T> {
    serde_json::from_value(entry.clone()).map_err(|e| {
        let name = entry.get("名称").map(text).unwrap_or_default();
        CardError::malformed(name, e.to_string())
    })
}

fn value_or_empty(value: Value) -> Value {
    match value {
        Value::Null => Value::String(String::new()),
        other => other,
    }
}

fn questions_or_empty(value: Value) -> Value {
    match value {
        Value::Null => Value::Array(Vec::new()),
        other => other,
    }
}

fn flat_record(name: String, original_name: String, type_label: &str) -> Record {
    let mut record = Map::new();
    record.insert("名称".to_string(), Value::String(name));
    record.insert("原名".to_string(), Value::String(original_name));
    record.insert("类型".to_string(), Value::String(type_label.to_string()));
    record
}

pub fn unpack_profession(card: ProfessionCard) -> Record {
    let mut record = flat_record(card.name, card.id, "主职");
    record.insert(
        "领域".to_string(),
        Value::String(format!("{}+{}", card.domain1, card.domain2)),
    );
    record.insert("初始闪避值".to_string(), value_or_empty(card.starting_evasion));
    record.insert("初始生命点".to_string(), value_or_empty(card.starting_health));
    if !card.starting_items.is_null() {
        record.insert("初始物品".to_string(), card.starting_items);
    }
    record.insert("希望特性".to_string(), value_or_empty(card.hope_feature));
    record.insert("职业特性".to_string(), value_or_empty(card.class_feature));
    record.insert("背景问题".to_string(), questions_or_empty(card.background_questions));
    record.insert("关系问题".to_string(), questions_or_empty(card.relationship_questions));
    record.insert("简介".to_string(), value_or_empty(card.summary));
    record
}

/// 按种族名合并特性：同名种族的特性行依次追加到 `描述`
///
/// Folds one ancestry feature into the record of its ancestry.
pub fn merge_ancestry(ancestries: &mut IndexMap<String, Record>, card: AncestryCard) {
    let line = format!("{}：{}", card.name, card.effect);

    if let Some(record) = ancestries.get_mut(&card.ancestry) {
        let merged = format!("{}\n{}", record.get("描述").map(text).unwrap_or_default(), line);
        record.insert("描述".to_string(), Value::String(merged));
        return;
    }

    let mut record = flat_record(card.ancestry.clone(), String::new(), "种族");
    record.insert("简介".to_string(), value_or_empty(card.summary));
    record.insert("描述".to_string(), Value::String(line));
    ancestries.insert(card.ancestry, record);
}

pub fn unpack_community(card: CommunityCard) -> Record {
    let mut record = flat_record(card.name, card.id, "社群");
    record.insert("简介".to_string(), value_or_empty(card.summary));
    record.insert("性格".to_string(), Value::String(String::new()));
    // 没有冒号的描述打包时整段成为特性名
    let description = if card.description.is_empty() {
        card.trait_name
    } else {
        format!("{}：{}", card.trait_name, card.description)
    };
    record.insert("描述".to_string(), Value::String(description));
    record
}

pub fn unpack_subclass(card: SubclassCard) -> Record {
    let tier = tier_to_flat(&card.tier);
    let casting = if card.casting == NOT_CASTABLE {
        String::new()
    } else {
        card.casting
    };

    let mut record = flat_record(format!("{}-{}", card.subclass, tier), String::new(), "子职");
    record.insert("主职".to_string(), value_or_empty(card.profession));
    record.insert("等级".to_string(), Value::String(tier));
    record.insert("施法属性".to_string(), Value::String(casting));
    record.insert("描述".to_string(), value_or_empty(card.description));
    record
}

pub fn unpack_domain_card(card: DomainCard) -> Record {
    let mut record = flat_record(card.name, card.id, "领域卡");
    record.insert("领域".to_string(), Value::String(card.domain));
    record.insert("等级".to_string(), Value::String(text(&card.level)));
    record.insert("属性".to_string(), value_or_empty(card.attribute));
    record.insert("回想".to_string(), Value::String(text(&card.recall)));
    record.insert("描述".to_string(), value_or_empty(card.description));
    record
}

/// Inverse of the catch-all mapping. Drops the packaging-only fields, rejoins
/// `简略信息` with `/` and keeps only fields that carry a value.
pub fn unpack_variant(entry: &Value) -> Result<Record> {
    let card = entry.as_object().ok_or_else(|| {
        CardError::malformed(text(entry), "variant 条目不是字典")
    })?;
    let feature = card.get("特性").filter(|v| is_truthy(v));

    let mut record = Map::new();
    for (key, value) in card {
        match key.as_str() {
            "id" | "imageUrl" => continue,
            "简略信息" => {
                let joined = join_brief_info(value);
                if !joined.is_empty() {
                    record.insert(key.clone(), Value::String(joined));
                }
            }
            "效果" => match feature {
                Some(feature) if feature == value => {}
                Some(_) => {
                    if is_truthy(value) {
                        record.insert(key.clone(), value.clone());
                    }
                }
                None => {
                    if is_truthy(value) {
                        record.insert("特性".to_string(), value.clone());
                    }
                }
            },
            _ => {
                if is_truthy(value) {
                    record.insert(key.clone(), value.clone());
                }
            }
        }
    }
    Ok(record)
}

/// `{item0: "近战", item1: "", item2: "3点"}` → `近战/3点`.
pub fn join_brief_info(value: &Value) -> String {
    match value {
        Value::Object(items) => items
            .values()
            .filter(|v| is_truthy(v))
            .map(text)
            .collect::<Vec<_>>()
            .join("/"),
        other => text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn package(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn profession_rebuilds_domain_string() {
        let records = work_rrr(&[package(json!({
            "profession": [{
                "id": "42",
                "名称": "战士",
                "领域1": "利刃",
                "领域2": "骸骨",
                "起始生命": 6,
                "起始闪避": 11,
                "简介": "前线"
            }]
        }))]);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["领域"], json!("利刃+骸骨"));
        assert_eq!(record["原名"], json!("42"));
        assert_eq!(record["初始生命点"], json!(6));
        assert_eq!(record["背景问题"], json!([]));
    }

    #[test]
    fn numeric_ids_are_accepted() {
        let records = work_rrr(&[package(json!({
            "community": {"id": 7, "名称": "高地", "特性": "坚忍", "描述": "不退"}
        }))]);
        assert_eq!(records[0]["原名"], json!("7"));
        assert_eq!(records[0]["描述"], json!("坚忍：不退"));
    }

    #[test]
    fn ancestry_features_merge_after_other_records() {
        let records = work_rrr(&[
            package(json!({
                "ancestry": [
                    {"名称": "厚皮", "种族": "矮人", "效果": "护甲+1", "类别": 1, "简介": "坚韧"},
                    {"名称": "夜视", "种族": "精灵", "效果": "暗处可见", "类别": 1}
                ],
                "domain": [{"名称": "火球", "领域": "奥秘", "等级": 1, "回想": 2}]
            })),
            package(json!({
                "ancestry": [{"名称": "坚毅", "种族": "矮人", "效果": "抵抗恐惧", "类别": 2}]
            })),
        ]);

        let names: Vec<&str> = records.iter().map(|r| r["名称"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["火球", "矮人", "精灵"]);
        assert_eq!(records[1]["描述"], json!("厚皮：护甲+1\n坚毅：抵抗恐惧"));
        assert_eq!(records[1]["简介"], json!("坚韧"));
        assert_eq!(records[1]["类型"], json!("种族"));
    }

    #[test]
    fn subclass_restores_flat_vocabulary() {
        let records = work_rrr(&[package(json!({
            "subclass": [{"子职业": "智慧之歌", "等级": "大师", "施法": "不可施法", "主职": "吟游诗人"}]
        }))]);
        assert_eq!(records[0]["名称"], json!("智慧之歌-精通"));
        assert_eq!(records[0]["等级"], json!("精通"));
        assert_eq!(records[0]["施法属性"], json!(""));
    }

    #[test]
    fn domain_card_levels_become_text() {
        let records = work_rrr(&[package(json!({
            "domain": [{"名称": "火球", "领域": "奥秘", "等级": 1, "回想": "X"}]
        }))]);
        assert_eq!(records[0]["等级"], json!("1"));
        assert_eq!(records[0]["回想"], json!("X"));
    }

    #[test]
    fn variant_drops_packaging_fields_and_empty_values() {
        let record = unpack_variant(&json!({
            "id": "1",
            "名称": "长剑",
            "类型": "武器",
            "简略信息": {"item0": "近战", "item1": "", "item2": "3点"},
            "特性": "锋利",
            "效果": "锋利",
            "备注": "",
            "imageUrl": ""
        }))
        .unwrap();

        assert_eq!(
            Value::Object(record),
            json!({"名称": "长剑", "类型": "武器", "简略信息": "近战/3点", "特性": "锋利"})
        );
    }

    #[test]
    fn variant_effect_without_feature_becomes_feature() {
        let record = unpack_variant(&json!({"名称": "盾", "效果": "格挡"})).unwrap();
        assert_eq!(record["特性"], json!("格挡"));
        assert!(!record.contains_key("效果"));
    }

    #[test]
    fn null_fields_read_as_empty() {
        let records = work_rrr(&[package(json!({
            "profession": [{
                "id": "1", "名称": "战士", "领域1": "利刃", "领域2": null,
                "起始生命": 6, "起始闪避": 11, "背景问题": null, "imageUrl": null
            }],
            "ancestry": [{"名称": "厚皮", "种族": "矮人", "效果": null, "类别": 1, "imageUrl": null}],
            "community": [{"名称": "高地", "特性": "坚忍", "描述": null, "imageUrl": null}],
            "subclass": [{"子职业": "斗士", "等级": "基石", "施法": null, "imageUrl": null}],
            "domain": [{"名称": "火球", "领域": null, "等级": 1, "imageUrl": null}]
        }))]);

        assert_eq!(records.len(), 5);
        assert_eq!(records[0]["领域"], json!("利刃+"));
        assert_eq!(records[0]["背景问题"], json!([]));
        assert_eq!(records[1]["描述"], json!("坚忍"));
        assert_eq!(records[2]["施法属性"], json!(""));
        assert_eq!(records[3]["领域"], json!(""));
        assert_eq!(records[4]["描述"], json!("厚皮："));
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let records = work_rrr(&[package(json!({
            "profession": [{"名称": ["not", "text"]}, {"名称": "战士"}],
            "variant": ["scalar"]
        }))]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["名称"], json!("战士"));
    }
}
