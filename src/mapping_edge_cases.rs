#[cfg(test)]
mod edge_case_tests {
    use super::super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn round_trip(records: &[Record]) -> Vec<Record> {
        let package = work_zzz(records, None);
        let packaged = serde_json::to_value(&package).unwrap();
        work_rrr(&[packaged.as_object().cloned().unwrap()])
    }

    fn without_original_name(mut record: Record) -> Value {
        record.retain(|key, _| key != "原名");
        Value::Object(record)
    }

    #[test]
    fn profession_is_a_fixed_point() {
        let original = record(json!({
            "名称": "战士",
            "原名": "Warrior",
            "类型": "主职",
            "领域": "利刃+骸骨",
            "初始闪避值": 11,
            "初始生命点": 6,
            "初始物品": "长剑",
            "希望特性": "不屈",
            "职业特性": "战斗本能",
            "背景问题": ["你为何而战？"],
            "关系问题": ["谁救过你？"],
            "简介": "前线战士"
        }));

        let restored = round_trip(&[original.clone()]);
        assert_eq!(restored.len(), 1);
        assert_eq!(
            without_original_name(restored[0].clone()),
            without_original_name(original)
        );
        // 原名 now carries the freshly minted id
        assert!(restored[0]["原名"].as_str().unwrap().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn profession_questions_keep_their_shape() {
        let original = record(json!({
            "名称": "战士",
            "原名": "",
            "类型": "主职",
            "领域": "利刃+骸骨",
            "初始闪避值": 11,
            "初始生命点": 6,
            "初始物品": "长剑",
            "希望特性": "不屈",
            "职业特性": "战斗本能",
            "背景问题": "你为何而战？",
            "关系问题": "",
            "简介": "前线战士"
        }));

        let restored = round_trip(&[original.clone()]);
        assert_eq!(restored[0]["背景问题"], json!("你为何而战？"));
        assert_eq!(
            without_original_name(restored[0].clone()),
            without_original_name(original)
        );
    }

    #[test]
    fn community_is_a_fixed_point() {
        let with_colon = record(json!({
            "名称": "高地",
            "原名": "",
            "类型": "社群",
            "简介": "山里人",
            "性格": "",
            "描述": "坚忍：遭遇逆境时不退"
        }));
        let without_colon = record(json!({
            "名称": "海港",
            "原名": "",
            "类型": "社群",
            "简介": "水手",
            "性格": "",
            "描述": "坚忍"
        }));

        let restored = round_trip(&[with_colon.clone(), without_colon.clone()]);
        assert_eq!(
            without_original_name(restored[0].clone()),
            without_original_name(with_colon)
        );
        assert_eq!(
            without_original_name(restored[1].clone()),
            without_original_name(without_colon)
        );
    }

    #[test]
    fn subclass_survives_tier_vocabulary() {
        let castable = record(json!({
            "名称": "智慧之歌-进阶",
            "原名": "",
            "类型": "子职",
            "主职": "吟游诗人",
            "等级": "进阶",
            "施法属性": "风度",
            "描述": "以歌声施法"
        }));
        let not_castable = record(json!({
            "名称": "斗士-精通",
            "原名": "",
            "类型": "子职",
            "主职": "战士",
            "等级": "精通",
            "施法属性": "",
            "描述": "以力破巧"
        }));

        let package = work_zzz(&[castable.clone(), not_castable.clone()], None);
        assert_eq!(package.subclass[0].tier, "专精");
        assert_eq!(package.subclass[1].tier, "大师");
        assert_eq!(package.subclass[1].casting, "不可施法");

        let restored = round_trip(&[castable.clone(), not_castable.clone()]);
        assert_eq!(Value::Object(restored[0].clone()), Value::Object(castable));
        assert_eq!(Value::Object(restored[1].clone()), Value::Object(not_castable));
    }

    #[test]
    fn domain_card_recall_round_trips() {
        let numeric = record(json!({
            "名称": "火球",
            "原名": "",
            "类型": "领域卡",
            "领域": "奥秘",
            "等级": "1",
            "属性": "法术",
            "回想": "2",
            "描述": "造成伤害"
        }));
        let textual = record(json!({
            "名称": "冰墙",
            "原名": "",
            "类型": "领域卡",
            "领域": "奥秘",
            "等级": "3",
            "属性": "法术",
            "回想": "特殊",
            "描述": "阻挡"
        }));

        let package = work_zzz(&[numeric.clone(), textual.clone()], None);
        assert_eq!(package.domain[0].recall, json!(2));
        assert_eq!(package.domain[1].recall, json!("特殊"));

        let restored = round_trip(&[numeric.clone(), textual.clone()]);
        assert_eq!(without_original_name(restored[0].clone()), without_original_name(numeric));
        assert_eq!(without_original_name(restored[1].clone()), without_original_name(textual));
    }

    #[test]
    fn ancestries_merge_back_in_original_order() {
        let dwarf = record(json!({
            "名称": "矮人",
            "类型": "种族",
            "简介": "坚韧",
            "描述": "厚皮：护甲+1\n坚毅：抵抗恐惧"
        }));
        let elf = record(json!({
            "名称": "精灵",
            "类型": "种族",
            "简介": "敏锐",
            "描述": "夜视：暗处可见\n轻盈：闪避+1"
        }));
        let dwarf_again = record(json!({
            "名称": "矮人",
            "类型": "种族",
            "简介": "坚韧",
            "描述": "石肤：免疫击退\n酒量：抵抗中毒"
        }));

        let restored = round_trip(&[dwarf, elf, dwarf_again]);

        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0]["名称"], json!("矮人"));
        assert_eq!(
            restored[0]["描述"],
            json!("厚皮：护甲+1\n坚毅：抵抗恐惧\n石肤：免疫击退\n酒量：抵抗中毒")
        );
        assert_eq!(restored[1]["名称"], json!("精灵"));
        assert_eq!(restored[1]["描述"], json!("夜视：暗处可见\n轻盈：闪避+1"));
        assert_eq!(restored[1]["简介"], json!("敏锐"));
    }

    #[test]
    fn ancestries_follow_other_records() {
        let restored = round_trip(&[
            record(json!({"名称": "矮人", "类型": "种族", "描述": "厚皮：护甲+1\n坚毅：抵抗恐惧"})),
            record(json!({"名称": "高地", "类型": "社群", "描述": "坚忍：不退"})),
        ]);

        let types: Vec<&str> = restored.iter().map(|r| r["类型"].as_str().unwrap()).collect();
        assert_eq!(types, vec!["社群", "种族"]);
    }

    #[test]
    fn variant_brief_info_round_trips() {
        let original = record(json!({
            "名称": "长剑",
            "类型": "武器",
            "简略信息": "近战/物理/3点",
            "特性": "锋利"
        }));

        let package = work_zzz(&[original.clone()], None);
        assert_eq!(
            package.variant[0]["简略信息"],
            json!({"item0": "近战", "item1": "物理", "item2": "3点"})
        );

        let restored = round_trip(&[original.clone()]);
        assert_eq!(Value::Object(restored[0].clone()), Value::Object(original));
    }

    #[test]
    fn malformed_records_do_not_abort_the_run() {
        let restored = round_trip(&[
            record(json!({"名称": "半身人", "类型": "种族", "描述": "只有一行特性"})),
            record(json!({"名称": "战士", "类型": "主职", "初始生命点": "六", "初始闪避值": 11})),
            record(json!({"名称": "火球", "类型": "领域卡", "领域": "奥秘", "等级": "一"})),
            record(json!({"名称": "高地", "类型": "社群", "描述": "坚忍：不退"})),
        ]);

        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0]["名称"], json!("高地"));
    }
}
