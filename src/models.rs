use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields::{lenient_text, nullable_text};

/// A flat zzz record: localized field names mapped to arbitrary JSON values.
pub type Record = Map<String, Value>;

/// Category of a flat record, decided by its `类型` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardKind {
    Profession,
    Ancestry,
    Community,
    Subclass,
    DomainCard,
    /// Any other type label, kept verbatim.
    Variant(String),
}

impl CardKind {
    pub fn from_type(type_label: &str) -> Self {
        match type_label {
            "主职" => CardKind::Profession,
            "种族" => CardKind::Ancestry,
            "社群" => CardKind::Community,
            "子职" => CardKind::Subclass,
            "领域卡" => CardKind::DomainCard,
            other => CardKind::Variant(other.to_string()),
        }
    }

    pub fn type_label(&self) -> &str {
        match self {
            CardKind::Profession => "主职",
            CardKind::Ancestry => "种族",
            CardKind::Community => "社群",
            CardKind::Subclass => "子职",
            CardKind::DomainCard => "领域卡",
            CardKind::Variant(label) => label,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomFieldDefinitions {
    pub professions: IndexSet<String>,
    pub ancestries: IndexSet<String>,
    pub communities: IndexSet<String>,
    pub domains: IndexSet<String>,
    pub variants: IndexSet<String>,
}

/// A packaged rrr card set.
#[derive(Debug, Clone, Serialize)]
pub struct CardPackage {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    #[serde(rename = "customFieldDefinitions")]
    pub custom_field_definitions: CustomFieldDefinitions,
    pub profession: Vec<ProfessionCard>,
    pub ancestry: Vec<AncestryCard>,
    pub community: Vec<CommunityCard>,
    pub subclass: Vec<SubclassCard>,
    pub domain: Vec<DomainCard>,
    pub variant: Vec<Record>,
}

impl CardPackage {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: String::new(),
            author: String::new(),
            custom_field_definitions: CustomFieldDefinitions::default(),
            profession: Vec::new(),
            ancestry: Vec::new(),
            community: Vec::new(),
            subclass: Vec::new(),
            domain: Vec::new(),
            variant: Vec::new(),
        }
    }

    pub fn card_count(&self) -> usize {
        self.profession.len()
            + self.ancestry.len()
            + self.community.len()
            + self.subclass.len()
            + self.domain.len()
            + self.variant.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfessionCard {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(rename = "名称", deserialize_with = "nullable_text")]
    pub name: String,
    #[serde(rename = "领域1", deserialize_with = "nullable_text")]
    pub domain1: String,
    #[serde(rename = "领域2", deserialize_with = "nullable_text")]
    pub domain2: String,
    #[serde(rename = "起始生命")]
    pub starting_health: Value,
    #[serde(rename = "起始闪避")]
    pub starting_evasion: Value,
    #[serde(rename = "起始物品")]
    pub starting_items: Value,
    #[serde(rename = "简介")]
    pub summary: Value,
    #[serde(rename = "希望特性")]
    pub hope_feature: Value,
    #[serde(rename = "职业特性")]
    pub class_feature: Value,
    /// 原样保留：字符串或列表均可
    #[serde(rename = "背景问题", skip_serializing_if = "Value::is_null")]
    pub background_questions: Value,
    #[serde(rename = "关系问题", skip_serializing_if = "Value::is_null")]
    pub relationship_questions: Value,
    #[serde(rename = "imageUrl", skip_deserializing)]
    pub image_url: String,
}

/// One of the two features of an ancestry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AncestryCard {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    /// Feature name.
    #[serde(rename = "名称", deserialize_with = "nullable_text")]
    pub name: String,
    /// Name of the ancestry the feature belongs to.
    #[serde(rename = "种族", deserialize_with = "nullable_text")]
    pub ancestry: String,
    #[serde(rename = "简介")]
    pub summary: Value,
    #[serde(rename = "效果", deserialize_with = "nullable_text")]
    pub effect: String,
    /// 1 for the first feature line, 2 for the second.
    #[serde(rename = "类别")]
    pub category: Value,
    #[serde(rename = "imageUrl", skip_deserializing)]
    pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityCard {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(rename = "名称", deserialize_with = "nullable_text")]
    pub name: String,
    #[serde(rename = "特性", deserialize_with = "nullable_text")]
    pub trait_name: String,
    #[serde(rename = "简介")]
    pub summary: Value,
    #[serde(rename = "描述", deserialize_with = "nullable_text")]
    pub description: String,
    #[serde(rename = "imageUrl", skip_deserializing)]
    pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubclassCard {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(rename = "名称", deserialize_with = "nullable_text")]
    pub name: String,
    #[serde(rename = "描述")]
    pub description: Value,
    #[serde(rename = "主职")]
    pub profession: Value,
    #[serde(rename = "子职业", deserialize_with = "nullable_text")]
    pub subclass: String,
    /// Tier label in packaged vocabulary (基石/专精/大师).
    #[serde(rename = "等级", deserialize_with = "nullable_text")]
    pub tier: String,
    #[serde(rename = "施法", deserialize_with = "nullable_text")]
    pub casting: String,
    #[serde(rename = "imageUrl", skip_deserializing)]
    pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainCard {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(rename = "名称", deserialize_with = "nullable_text")]
    pub name: String,
    #[serde(rename = "领域", deserialize_with = "nullable_text")]
    pub domain: String,
    #[serde(rename = "等级")]
    pub level: Value,
    #[serde(rename = "属性")]
    pub attribute: Value,
    /// Integer when the source was a digit string, otherwise passed through.
    #[serde(rename = "回想")]
    pub recall: Value,
    #[serde(rename = "描述")]
    pub description: Value,
    #[serde(rename = "imageUrl", skip_deserializing)]
    pub image_url: String,
}

/// Flattened display summary produced by the keyword extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub category: String,
    pub description: String,
    pub display: String,
}

/// A record in the rink rendering dialect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RinkCard {
    Adversary(RinkAdversary),
    Environment(RinkEnvironment),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RinkAdversary {
    pub name: String,
    pub rank: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub motivation: String,
    pub difficulty: String,
    pub threshold: String,
    pub health: String,
    pub stress: String,
    pub attack_bonus: String,
    pub weapon_name: String,
    pub weapon_range: String,
    pub damage_dice: String,
    pub damage_type: String,
    pub decorator_color: String,
    pub highlight_bg_color: String,
    pub highlight_text_color: String,
    #[serde(rename = "isNPC")]
    pub is_npc: bool,
    pub image_src: String,
    pub image_transform: String,
    pub image_settings: AdversaryImageSettings,
    pub experiences: Vec<String>,
    pub traits: Vec<AdversaryTrait>,
    pub special_traits: Vec<AdversaryTrait>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdversaryImageSettings {
    pub width: String,
    pub height: String,
    pub shape: String,
    pub hide_border: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdversaryTrait {
    pub name: String,
    pub desc: String,
    pub flavor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RinkEnvironment {
    pub name: String,
    pub name_en: String,
    pub rank: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub tendencies: String,
    pub difficulty: String,
    pub enemies: String,
    pub decorator_color: String,
    pub highlight_bg_color: String,
    pub highlight_text_color: String,
    pub image_settings: EnvironmentImageSettings,
    pub traits: Vec<EnvironmentTrait>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentImageSettings {
    pub src: String,
    pub width: String,
    pub height: String,
    pub transform: String,
    pub hide_border: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentTrait {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub fear: bool,
    pub cost: String,
    pub desc: String,
    pub qs: String,
}
