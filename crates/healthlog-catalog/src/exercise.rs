//! Exercise catalog with METs values per activity.

use std::collections::HashMap;

use healthlog_core::ExerciseCategory;
use healthlog_core::ExerciseCategory::*;
use once_cell::sync::Lazy;

use crate::types::ExerciseEntry;

const fn exercise(
    id: &'static str,
    name: &'static str,
    category: ExerciseCategory,
    mets: f64,
    keywords: &'static [&'static str],
) -> ExerciseEntry {
    ExerciseEntry {
        id,
        name,
        category,
        mets,
        keywords,
        calories_per_km: None,
        calories_per_rep: None,
    }
}

const fn per_km(mut entry: ExerciseEntry, kcal: f64) -> ExerciseEntry {
    entry.calories_per_km = Some(kcal);
    entry
}

const fn per_rep(mut entry: ExerciseEntry, kcal: f64) -> ExerciseEntry {
    entry.calories_per_rep = Some(kcal);
    entry
}

/// Known activities. Order matters: ties within a match tier go to the earlier entry.
pub static EXERCISE_CATALOG: &[ExerciseEntry] = &[
    // Cardio
    per_km(exercise("running", "ランニング", Cardio, 8.3, &["ランニング", "ジョギング", "らんにんぐ", "じょぎんぐ", "マラソン"]), 60.0),
    per_km(exercise("walking", "ウォーキング", Cardio, 3.5, &["ウォーキング", "散歩", "うぉーきんぐ", "さんぽ", "早歩き", "速歩"]), 50.0),
    exercise("cycling", "サイクリング", Cardio, 6.8, &["サイクリング", "自転車", "じてんしゃ", "さいくりんぐ", "エアロバイク"]),
    exercise("hiking", "ハイキング", Cardio, 6.0, &["ハイキング", "はいきんぐ", "登山", "とざん"]),
    exercise("jump_rope", "縄跳び", Cardio, 8.8, &["縄跳び", "なわとび", "縄とび"]),
    // Water
    exercise("swimming", "水泳", Water, 8.3, &["水泳", "プール", "すいえい", "クロール", "平泳ぎ"]),
    exercise("water_aerobics", "水中エアロビクス", Water, 5.3, &["水中エアロ", "アクアビクス", "水中ウォーキング"]),
    exercise("surfing", "サーフィン", Water, 3.0, &["サーフィン", "さーふぃん"]),
    exercise("kayaking", "カヤック", Water, 5.0, &["カヤック", "カヌー"]),
    exercise("diving", "ダイビング", Water, 7.0, &["ダイビング", "スキューバ", "シュノーケル"]),
    // Sports
    exercise("tennis", "テニス", Sports, 7.3, &["テニス", "てにす"]),
    exercise("badminton", "バドミントン", Sports, 5.5, &["バドミントン", "ばどみんとん"]),
    exercise("table_tennis", "卓球", Sports, 4.0, &["卓球", "たっきゅう", "ピンポン"]),
    exercise("basketball", "バスケットボール", Sports, 6.5, &["バスケットボール", "バスケ", "ばすけ"]),
    exercise("soccer", "サッカー", Sports, 7.0, &["サッカー", "フットサル", "さっかー"]),
    exercise("volleyball", "バレーボール", Sports, 4.0, &["バレーボール", "バレー", "ばれー"]),
    exercise("baseball", "野球", Sports, 5.0, &["野球", "やきゅう", "ベースボール", "キャッチボール"]),
    exercise("golf", "ゴルフ", Sports, 4.8, &["ゴルフ", "ごるふ"]),
    exercise("bowling", "ボウリング", Sports, 3.0, &["ボウリング", "ぼうりんぐ"]),
    exercise("climbing", "クライミング", Sports, 8.0, &["クライミング", "ボルダリング", "くらいみんぐ"]),
    // Strength
    exercise("weight_training", "筋力トレーニング", Strength, 5.0, &["筋トレ", "きんとれ", "筋力トレーニング", "ウェイトトレーニング", "ウエイト"]),
    per_rep(exercise("push_ups", "腕立て伏せ", Strength, 3.8, &["腕立て伏せ", "腕立て", "プッシュアップ", "うでたて"]), 2.5),
    per_rep(exercise("sit_ups", "腹筋運動", Strength, 3.8, &["腹筋", "ふっきん", "シットアップ", "クランチ"]), 1.5),
    per_rep(exercise("squats", "スクワット", Strength, 5.0, &["スクワット", "すくわっと"]), 3.0),
    exercise("pull_ups", "懸垂", Strength, 4.3, &["懸垂", "けんすい", "プルアップ", "チンニング"]),
    per_rep(exercise("bench_press", "ベンチプレス", Strength, 6.0, &["ベンチプレス", "べんちぷれす", "ベンチ"]), 4.0),
    per_rep(exercise("dumbbell_press", "ダンベルプレス", Strength, 6.0, &["ダンベルプレス", "だんべるぷれす"]), 4.0),
    per_rep(exercise("shoulder_press", "ショルダープレス", Strength, 6.0, &["ショルダープレス", "しょるだーぷれす"]), 4.0),
    exercise("deadlift", "デッドリフト", Strength, 6.0, &["デッドリフト", "でっどりふと"]),
    exercise("dumbbell", "ダンベル運動", Strength, 5.0, &["ダンベル", "だんべる"]),
    exercise("plank", "プランク", Strength, 3.8, &["プランク", "ぷらんく"]),
    // Flexibility
    exercise("yoga", "ヨガ", Flexibility, 2.5, &["ヨガ", "よが", "ホットヨガ"]),
    exercise("pilates", "ピラティス", Flexibility, 3.0, &["ピラティス", "ぴらてぃす"]),
    exercise("stretching", "ストレッチ", Flexibility, 2.3, &["ストレッチ", "すとれっち", "柔軟"]),
    exercise("tai_chi", "太極拳", Flexibility, 3.0, &["太極拳", "たいきょくけん"]),
    // Martial arts
    exercise("karate", "空手", MartialArts, 10.3, &["空手", "からて", "カラテ"]),
    exercise("judo", "柔道", MartialArts, 10.3, &["柔道", "じゅうどう"]),
    exercise("kendo", "剣道", MartialArts, 10.3, &["剣道", "けんどう"]),
    exercise("boxing", "ボクシング", MartialArts, 12.8, &["ボクシング", "ぼくしんぐ", "キックボクシング"]),
    // Dance
    exercise("dance", "ダンス", Dance, 5.0, &["ダンス", "だんす", "ヒップホップ"]),
    exercise("aerobics", "エアロビクス", Dance, 6.8, &["エアロビクス", "えあろびくす", "エアロビ"]),
    // Winter
    exercise("skiing", "スキー", Winter, 6.0, &["スキー", "すきー"]),
    exercise("snowboarding", "スノーボード", Winter, 5.3, &["スノーボード", "スノボ", "すのぼ"]),
    exercise("ice_skating", "アイススケート", Winter, 7.0, &["スケート", "すけーと", "アイススケート"]),
    // Daily activity
    exercise("housework", "家事", Daily, 3.3, &["家事", "掃除", "洗濯"]),
    exercise("gardening", "ガーデニング", Daily, 4.0, &["ガーデニング", "庭仕事", "草むしり"]),
    exercise("stairs", "階段昇降", Daily, 8.8, &["階段", "かいだん"]),
];

static EXERCISE_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    EXERCISE_CATALOG
        .iter()
        .enumerate()
        .map(|(i, entry)| (entry.id, i))
        .collect()
});

pub fn exercise_by_id(id: &str) -> Option<&'static ExerciseEntry> {
    EXERCISE_INDEX.get(id).map(|&i| &EXERCISE_CATALOG[i])
}

/// Every exercise keyword with its owning entry, longest keyword first.
pub fn exercise_keywords_longest_first() -> &'static [(&'static str, &'static ExerciseEntry)] {
    static KEYWORDS: Lazy<Vec<(&'static str, &'static ExerciseEntry)>> = Lazy::new(|| {
        let mut all: Vec<(&'static str, &'static ExerciseEntry)> = Vec::new();
        for entry in EXERCISE_CATALOG {
            for &kw in entry.keywords {
                if !all.iter().any(|(existing, _)| *existing == kw) {
                    all.push((kw, entry));
                }
            }
        }
        // Stable: equal lengths keep catalog order.
        all.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
        all
    });
    &KEYWORDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        assert_eq!(EXERCISE_INDEX.len(), EXERCISE_CATALOG.len());
    }

    #[test]
    fn test_distance_rates() {
        assert_eq!(exercise_by_id("running").unwrap().calories_per_km, Some(60.0));
        assert_eq!(exercise_by_id("walking").unwrap().calories_per_km, Some(50.0));
        assert_eq!(exercise_by_id("cycling").unwrap().calories_per_km, None);
    }

    #[test]
    fn test_per_rep_rates() {
        assert_eq!(exercise_by_id("push_ups").unwrap().calories_per_rep, Some(2.5));
        assert_eq!(exercise_by_id("sit_ups").unwrap().calories_per_rep, Some(1.5));
        assert_eq!(exercise_by_id("bench_press").unwrap().calories_per_rep, Some(4.0));
    }

    #[test]
    fn test_keyword_owner_is_first_in_catalog() {
        let (_, owner) = exercise_keywords_longest_first()
            .iter()
            .find(|(kw, _)| *kw == "腕立て")
            .unwrap();
        assert_eq!(owner.id, "push_ups");
    }
}
