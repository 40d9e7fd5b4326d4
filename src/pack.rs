//! zzz → rrr: folds flat authoring records into one packaged card set.

use std::path::Path;

use chrono::Local;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{CardError, Result};
use crate::fields::{
    coerce_int, digits_to_int, get_text, get_value_or, mint_id, split_domains,
    tier_to_packaged,
};
use crate::models::{
    AncestryCard, CardKind, CardPackage, CommunityCard, DomainCard, ProfessionCard, Record,
    SubclassCard,
};

pub const DEFAULT_PACKAGE_NAME: &str = "扩展包";
pub const VERSION_FORMAT: &str = "%Y%m%d_%H%M%S";
/// Casting attribute written for subclasses that cannot cast.
pub const NOT_CASTABLE: &str = "不可施法";

pub fn package_name(source_hint: Option<&Path>) -> String {
    source_hint
        .and_then(|path| path.file_stem())
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(DEFAULT_PACKAGE_NAME)
        .to_string()
}

/// 将 zzz 记录打包为一个 rrr 卡包
///
/// Builds a package from flat records. Records that cannot be mapped are
/// reported and left out; everything else lands in its category bucket.
pub fn work_zzz(records: &[Record], source_hint: Option<&Path>) -> CardPackage {
    let version = Local::now().format(VERSION_FORMAT).to_string();
    let mut package = CardPackage::new(package_name(source_hint), version);

    for record in records {
        if let Err(err) = push_record(&mut package, record) {
            warn!("[PACK] 跳过记录: {}", err);
        }
    }

    package
}

fn push_record(package: &mut CardPackage, record: &Record) -> Result<()> {
    let name = get_text(record, "名称");
    let definitions = &mut package.custom_field_definitions;

    match CardKind::from_type(&get_text(record, "类型")) {
        CardKind::Profession => {
            package.profession.push(pack_profession(record)?);
            definitions.professions.insert(name);
        }
        CardKind::Ancestry => {
            package.ancestry.extend(pack_ancestry(record)?);
            definitions.ancestries.insert(name);
        }
        CardKind::Community => {
            package.community.push(pack_community(record));
            definitions.communities.insert(name);
        }
        CardKind::Subclass => package.subclass.push(pack_subclass(record)),
        CardKind::DomainCard => {
            let card = pack_domain_card(record)?;
            definitions.domains.insert(card.domain.clone());
            package.domain.push(card);
        }
        CardKind::Variant(type_label) => {
            package.variant.push(pack_variant(record));
            definitions.variants.insert(type_label);
        }
    }
    Ok(())
}

fn required_int(record: &Record, key: &str) -> Result<i64> {
    coerce_int(record.get(key)).ok_or_else(|| {
        CardError::malformed(
            get_text(record, "名称"),
            format!("`{}` 不是整数: {}", key, get_text(record, key)),
        )
    })
}

/// 问题字段原样携带，缺失时不写入卡包
fn question_field(record: &Record, key: &str) -> Value {
    record.get(key).cloned().unwrap_or(Value::Null)
}

/// 主职：拆分领域，生命点与闪避值必须是整数
pub fn pack_profession(record: &Record) -> Result<ProfessionCard> {
    let (domain1, domain2) = split_domains(&get_text(record, "领域"));

    Ok(ProfessionCard {
        id: mint_id(),
        name: get_text(record, "名称"),
        domain1,
        domain2,
        starting_health: required_int(record, "初始生命点")?.into(),
        starting_evasion: required_int(record, "初始闪避值")?.into(),
        starting_items: get_value_or(record, "初始物品", " "),
        summary: get_value_or(record, "简介", "N/A"),
        hope_feature: get_value_or(record, "希望特性", ""),
        class_feature: get_value_or(record, "职业特性", ""),
        background_questions: question_field(record, "背景问题"),
        relationship_questions: question_field(record, "关系问题"),
        image_url: String::new(),
    })
}

/// Splits an ancestry's description into its two feature cards.
///
/// The description must hold two `名称：效果` lines; half-width colons and
/// blank separator lines are tolerated.
pub fn pack_ancestry(record: &Record) -> Result<[AncestryCard; 2]> {
    let ancestry = get_text(record, "名称");
    let description = get_text(record, "描述")
        .replace(':', "：")
        .replace("\n\n", "\n");
    let lines: Vec<&str> = description.split('\n').collect();

    if lines.len() < 2 {
        return Err(CardError::malformed(
            ancestry,
            format!("种族描述需要两行特性，实际 {} 行", lines.len()),
        ));
    }

    let summary = get_value_or(record, "简介", "N/A");
    let feature = |line: &str, category: i64| -> Result<AncestryCard> {
        let (name, effect) = line.split_once('：').ok_or_else(|| {
            CardError::malformed(ancestry.clone(), format!("特性缺少冒号: {}", line))
        })?;
        Ok(AncestryCard {
            id: mint_id(),
            name: name.to_string(),
            ancestry: ancestry.clone(),
            summary: summary.clone(),
            effect: effect.to_string(),
            category: category.into(),
            image_url: String::new(),
        })
    };

    Ok([feature(lines[0], 1)?, feature(lines[1], 2)?])
}

pub fn pack_community(record: &Record) -> CommunityCard {
    let feature = get_text(record, "描述");
    let (trait_name, description) = feature.split_once('：').unwrap_or((feature.as_str(), ""));

    CommunityCard {
        id: mint_id(),
        name: get_text(record, "名称"),
        trait_name: trait_name.to_string(),
        summary: get_value_or(record, "简介", "N/A"),
        description: description.to_string(),
        image_url: String::new(),
    }
}

pub fn pack_subclass(record: &Record) -> SubclassCard {
    let name = get_text(record, "名称");
    let subclass = name.split('-').next().unwrap_or_default().to_string();
    let casting = get_text(record, "施法属性");

    SubclassCard {
        id: mint_id(),
        name,
        description: get_value_or(record, "描述", ""),
        profession: get_value_or(record, "主职", ""),
        subclass,
        tier: tier_to_packaged(&get_text(record, "等级")),
        casting: if casting.is_empty() {
            NOT_CASTABLE.to_string()
        } else {
            casting
        },
        image_url: String::new(),
    }
}

pub fn pack_domain_card(record: &Record) -> Result<DomainCard> {
    Ok(DomainCard {
        id: mint_id(),
        name: get_text(record, "名称"),
        domain: get_text(record, "领域"),
        level: required_int(record, "等级")?.into(),
        attribute: get_value_or(record, "属性", ""),
        recall: digits_to_int(&get_value_or(record, "回想", "")),
        description: get_value_or(record, "描述", ""),
        image_url: String::new(),
    })
}

/// Catch-all mapping: every field is carried over, `特性` is mirrored into
/// `效果` and the `/`-delimited `简略信息` becomes `{item0, item1, ...}`.
pub fn pack_variant(record: &Record) -> Record {
    let mut card = Map::new();
    card.insert("id".to_string(), Value::String(mint_id()));
    card.insert("名称".to_string(), get_value_or(record, "名称", ""));
    for (key, value) in record {
        card.insert(key.clone(), value.clone());
    }

    card.insert("效果".to_string(), get_value_or(record, "特性", ""));
    let brief = match record.get("简略信息") {
        Some(Value::String(info)) if !info.is_empty() => split_brief_info(info),
        Some(Value::Object(items)) => items.clone(),
        _ => Map::new(),
    };
    card.insert("简略信息".to_string(), Value::Object(brief));
    card
}

pub fn split_brief_info(info: &str) -> Map<String, Value> {
    info.split('/')
        .enumerate()
        .map(|(index, part)| (format!("item{}", index), Value::String(part.to_string())))
        .collect()
}
