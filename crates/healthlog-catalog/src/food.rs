//! Food catalog: nutrition per 100 g, loaded once and never mutated.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::types::{FoodCategory, FoodEntry};

use FoodCategory::*;

#[allow(clippy::too_many_arguments)]
const fn food(
    id: &'static str,
    name: &'static str,
    category: FoodCategory,
    kcal: f64,
    protein: f64,
    fat: f64,
    carbs: f64,
    serving_g: f64,
    keywords: &'static [&'static str],
) -> FoodEntry {
    FoodEntry {
        id,
        name,
        category,
        kcal_per_100g: kcal,
        protein_per_100g: protein,
        fat_per_100g: fat,
        carbs_per_100g: carbs,
        serving_g,
        keywords,
    }
}

/// Known foods. Order matters: ties within a match tier go to the earlier entry.
pub static FOOD_CATALOG: &[FoodEntry] = &[
    // Grains / staples
    food("rice_white_cooked", "ご飯（白米）", Grains, 156.0, 2.5, 0.3, 35.6, 150.0, &["ご飯", "白米", "めし", "ごはん"]),
    food("rice_brown_cooked", "ご飯（玄米）", Grains, 152.0, 2.8, 1.0, 32.1, 150.0, &["玄米", "げんまい", "玄米ご飯"]),
    food("bread_white", "食パン", Grains, 264.0, 9.3, 4.4, 46.7, 60.0, &["食パン", "パン", "しょくぱん", "ぱん"]),
    food("pasta_cooked", "パスタ（茹で）", Grains, 165.0, 5.8, 1.1, 32.0, 80.0, &["パスタ", "スパゲッティ", "スパゲティ"]),
    food("udon_cooked", "うどん（茹で）", Grains, 105.0, 2.6, 0.4, 21.6, 200.0, &["うどん", "ウドン"]),
    food("soba_cooked", "そば（茹で）", Grains, 132.0, 4.8, 0.7, 26.0, 170.0, &["そば", "ソバ", "蕎麦"]),
    food("ramen_noodles", "ラーメン", Grains, 281.0, 9.7, 1.5, 56.8, 110.0, &["ラーメン", "らーめん", "中華麺"]),
    // Meat
    food("chicken_breast", "鶏むね肉（皮なし）", Meat, 108.0, 22.3, 1.5, 0.0, 100.0, &["鶏胸肉", "鶏むね肉", "とりむね", "チキン"]),
    food("chicken_thigh", "鶏もも肉（皮なし）", Meat, 116.0, 18.8, 3.9, 0.0, 100.0, &["鶏もも肉", "とりもも"]),
    food("pork_loin", "豚ロース", Meat, 263.0, 19.3, 19.2, 0.2, 100.0, &["豚ロース", "豚肉", "ぶたにく", "ポーク"]),
    food("beef_sirloin", "牛サーロイン", Meat, 334.0, 17.4, 27.9, 0.3, 100.0, &["牛肉", "牛サーロイン", "ぎゅうにく", "ビーフ", "ステーキ"]),
    food("ham", "ハム", Meat, 196.0, 16.5, 13.6, 1.3, 50.0, &["ハム", "はむ"]),
    food("bacon", "ベーコン", Meat, 405.0, 12.9, 39.1, 0.3, 30.0, &["ベーコン", "べーこん"]),
    food("sausage", "ソーセージ", Meat, 321.0, 13.2, 28.5, 3.0, 60.0, &["ソーセージ", "そーせーじ", "ウインナー"]),
    // Fish
    food("salmon", "鮭（生）", Fish, 133.0, 22.3, 4.1, 0.1, 80.0, &["鮭", "さけ", "シャケ", "サーモン"]),
    food("tuna", "まぐろ（赤身）", Fish, 125.0, 26.4, 1.4, 0.1, 80.0, &["まぐろ", "マグロ", "鮪", "ツナ"]),
    food("mackerel", "さば", Fish, 202.0, 20.7, 12.1, 0.3, 80.0, &["さば", "サバ", "鯖"]),
    food("grilled_fish", "焼き魚", Fish, 170.0, 22.0, 8.5, 0.2, 80.0, &["焼き魚", "やきざかな", "魚"]),
    // Eggs / dairy
    food("egg_whole", "鶏卵（全卵）", Dairy, 151.0, 12.3, 10.3, 0.3, 50.0, &["卵", "たまご", "鶏卵", "ゆで卵"]),
    food("milk_whole", "牛乳", Dairy, 67.0, 3.3, 3.8, 4.8, 200.0, &["牛乳", "ぎゅうにゅう", "ミルク"]),
    food("yogurt_plain", "ヨーグルト（プレーン）", Dairy, 62.0, 3.6, 3.0, 4.9, 100.0, &["ヨーグルト", "よーぐると"]),
    food("cheese_process", "プロセスチーズ", Dairy, 339.0, 22.7, 26.0, 1.3, 20.0, &["チーズ", "ちーず"]),
    // Vegetables
    food("salad_green", "グリーンサラダ", Vegetables, 20.0, 1.0, 0.2, 3.8, 100.0, &["サラダ", "さらだ", "野菜"]),
    food("cabbage", "キャベツ", Vegetables, 23.0, 1.3, 0.2, 5.2, 100.0, &["キャベツ", "きゃべつ"]),
    food("tomato", "トマト", Vegetables, 19.0, 0.7, 0.1, 4.7, 150.0, &["トマト", "とまと"]),
    food("broccoli", "ブロッコリー", Vegetables, 33.0, 4.3, 0.5, 5.2, 100.0, &["ブロッコリー", "ぶろっこりー"]),
    // Fruits
    food("apple", "りんご", Fruits, 54.0, 0.2, 0.1, 14.6, 200.0, &["りんご", "リンゴ", "林檎", "アップル"]),
    food("banana", "バナナ", Fruits, 86.0, 1.1, 0.2, 22.5, 100.0, &["バナナ", "ばなな"]),
    food("orange", "オレンジ", Fruits, 39.0, 0.9, 0.1, 10.4, 150.0, &["オレンジ", "みかん"]),
    food("strawberry", "いちご", Fruits, 34.0, 0.9, 0.1, 8.5, 100.0, &["いちご", "イチゴ", "苺"]),
    // Legumes / nuts
    food("tofu_silken", "絹ごし豆腐", Legumes, 56.0, 4.9, 3.0, 1.7, 100.0, &["豆腐", "とうふ", "絹ごし"]),
    food("natto", "納豆", Legumes, 200.0, 16.5, 10.0, 12.1, 50.0, &["納豆", "なっとう"]),
    food("edamame", "枝豆", Legumes, 135.0, 11.7, 6.2, 8.8, 80.0, &["枝豆", "えだまめ", "エダマメ"]),
    food("almonds", "アーモンド", Nuts, 598.0, 18.6, 54.2, 9.7, 20.0, &["アーモンド", "あーもんど"]),
    // Prepared dishes
    food("karaage", "唐揚げ", Prepared, 290.0, 16.6, 21.1, 6.9, 80.0, &["唐揚げ", "から揚げ", "からあげ", "カラアゲ"]),
    food("tempura", "天ぷら", Prepared, 174.0, 7.3, 10.5, 11.2, 60.0, &["天ぷら", "てんぷら"]),
    food("hamburg_steak", "ハンバーグ", Prepared, 223.0, 13.3, 15.8, 7.5, 100.0, &["ハンバーグ", "はんばーぐ"]),
    food("gyoza", "餃子", Prepared, 200.0, 9.5, 10.4, 19.1, 25.0, &["餃子", "ギョーザ", "ぎょうざ", "ギョウザ"]),
    food("yakitori", "焼き鳥", Prepared, 199.0, 18.1, 12.2, 0.1, 30.0, &["焼き鳥", "やきとり"]),
    food("curry_rice", "カレーライス", Prepared, 124.0, 2.4, 3.5, 20.2, 300.0, &["カレー", "カレーライス", "かれー"]),
    food("gyudon", "牛丼", Prepared, 131.0, 4.0, 4.4, 18.8, 500.0, &["牛丼", "ぎゅうどん"]),
    food("oyakodon", "親子丼", Prepared, 146.0, 4.8, 4.2, 21.0, 500.0, &["親子丼", "おやこどん"]),
    food("katsudon", "カツ丼", Prepared, 178.0, 5.9, 5.6, 26.1, 500.0, &["カツ丼", "かつどん", "カツドン"]),
    food("kaisendon", "海鮮丼", Prepared, 109.0, 4.9, 0.8, 19.3, 500.0, &["海鮮丼", "かいせんどん"]),
    food("fried_rice", "チャーハン", Prepared, 172.0, 3.8, 4.9, 27.2, 250.0, &["チャーハン", "ちゃーはん", "炒飯"]),
    food("omelet_rice", "オムライス", Prepared, 134.0, 2.8, 4.5, 20.0, 500.0, &["オムライス", "おむらいす"]),
    food("sushi", "寿司", Prepared, 156.0, 10.5, 0.6, 28.2, 20.0, &["寿司", "すし", "お寿司"]),
    food("onigiri", "おにぎり", Prepared, 179.0, 6.0, 2.0, 35.0, 110.0, &["おにぎり", "オニギリ", "おむすび"]),
    food("bento", "弁当", Prepared, 156.0, 6.8, 7.2, 16.8, 400.0, &["弁当", "べんとう", "お弁当"]),
    food("teishoku", "定食", Prepared, 150.0, 7.0, 6.0, 17.0, 400.0, &["定食", "ていしょく"]),
    food("yakisoba", "焼きそば", Prepared, 198.0, 4.4, 8.6, 25.8, 300.0, &["焼きそば", "やきそば"]),
    food("mapo_tofu", "麻婆豆腐", Prepared, 195.0, 14.6, 12.3, 6.8, 200.0, &["麻婆豆腐", "マーボー"]),
    food("tamagoyaki", "卵焼き", Prepared, 128.0, 8.8, 8.8, 2.6, 60.0, &["卵焼き", "たまごやき", "玉子焼き"]),
    food("tonkatsu", "とんかつ", Prepared, 344.0, 22.3, 23.4, 10.8, 120.0, &["とんかつ", "トンカツ", "豚カツ"]),
    food("ebi_fry", "エビフライ", Prepared, 210.0, 12.5, 11.2, 14.2, 30.0, &["エビフライ", "えびふらい", "海老フライ"]),
    food("croquette", "コロッケ", Prepared, 164.0, 3.8, 9.8, 15.8, 80.0, &["コロッケ", "ころっけ"]),
    food("miso_soup", "味噌汁", Prepared, 34.0, 2.2, 1.2, 3.8, 150.0, &["味噌汁", "みそしる", "お味噌汁"]),
    food("soup", "スープ", Prepared, 40.0, 1.5, 1.5, 5.0, 150.0, &["スープ", "すーぷ"]),
    food("sandwich", "サンドイッチ", Prepared, 177.0, 7.4, 6.7, 22.3, 150.0, &["サンドイッチ", "さんどいっち", "サンド"]),
    // Sweets / snacks
    food("chocolate", "チョコレート", Sweets, 558.0, 7.3, 34.1, 51.9, 20.0, &["チョコレート", "ちょこれーと", "チョコ"]),
    food("ice_cream", "アイスクリーム", Sweets, 180.0, 3.2, 8.0, 23.2, 100.0, &["アイス", "アイスクリーム", "あいす"]),
    food("cake_sponge", "ケーキ", Sweets, 298.0, 6.2, 8.6, 47.8, 80.0, &["ケーキ", "けーき"]),
    food("cookies", "クッキー", Snacks, 432.0, 6.9, 17.2, 62.6, 30.0, &["クッキー", "くっきー", "ビスケット"]),
    food("potato_chips", "ポテトチップス", Snacks, 554.0, 4.7, 35.2, 54.7, 60.0, &["ポテチ", "ポテトチップス", "ぽてち"]),
    food("rice_crackers", "せんべい", Snacks, 373.0, 8.1, 2.5, 83.1, 20.0, &["せんべい", "煎餅"]),
    // Beverages
    food("coffee_black", "コーヒー", Beverages, 4.0, 0.2, 0.0, 0.7, 150.0, &["コーヒー", "こーひー", "珈琲"]),
    food("tea_black", "紅茶", Beverages, 1.0, 0.1, 0.0, 0.1, 150.0, &["紅茶", "こうちゃ"]),
    food("tea_green", "緑茶", Beverages, 0.0, 0.0, 0.0, 0.1, 150.0, &["緑茶", "りょくちゃ", "お茶"]),
    food("cola", "コーラ", Beverages, 46.0, 0.0, 0.0, 11.4, 350.0, &["コーラ", "こーら"]),
    food("orange_juice", "オレンジジュース", Beverages, 41.0, 0.2, 0.1, 10.2, 200.0, &["オレンジジュース", "ジュース"]),
    food("beer", "ビール", Beverages, 40.0, 0.3, 0.0, 3.1, 350.0, &["ビール", "びーる"]),
    // Fast food
    food("hamburger", "ハンバーガー", FastFood, 293.0, 12.0, 15.4, 28.0, 120.0, &["ハンバーガー", "はんばーがー", "バーガー"]),
    food("french_fries", "フライドポテト", FastFood, 237.0, 3.0, 11.3, 31.2, 100.0, &["フライドポテト", "ポテト"]),
    food("pizza", "ピザ", FastFood, 268.0, 10.1, 11.5, 31.4, 100.0, &["ピザ", "ぴざ"]),
    food("chicken_nuggets", "チキンナゲット", FastFood, 245.0, 15.5, 15.7, 9.9, 20.0, &["ナゲット", "チキンナゲット"]),
    // Seasonings
    food("mayonnaise", "マヨネーズ", Seasonings, 703.0, 1.5, 75.3, 4.5, 12.0, &["マヨネーズ", "マヨ"]),
];

static FOOD_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    FOOD_CATALOG
        .iter()
        .enumerate()
        .map(|(i, entry)| (entry.id, i))
        .collect()
});

/// Look up a food by its stable id.
pub fn food_by_id(id: &str) -> Option<&'static FoodEntry> {
    FOOD_INDEX.get(id).map(|&i| &FOOD_CATALOG[i])
}

/// Every food keyword, longest first, for scanning free text.
pub fn food_keywords_longest_first() -> &'static [&'static str] {
    static KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
        let mut all: Vec<&'static str> = FOOD_CATALOG
            .iter()
            .flat_map(|entry| entry.keywords.iter().copied())
            .collect();
        all.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        all.dedup();
        all
    });
    &KEYWORDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        assert_eq!(FOOD_INDEX.len(), FOOD_CATALOG.len());
    }

    #[test]
    fn test_lookup_by_id() {
        let natto = food_by_id("natto").unwrap();
        assert_eq!(natto.name, "納豆");
        assert!(food_by_id("unknown").is_none());
    }

    #[test]
    fn test_every_entry_has_keywords_and_serving() {
        for entry in FOOD_CATALOG {
            assert!(!entry.keywords.is_empty(), "{} has no keywords", entry.id);
            assert!(entry.serving_g > 0.0, "{} has no serving", entry.id);
        }
    }

    #[test]
    fn test_keywords_sorted_longest_first() {
        let kws = food_keywords_longest_first();
        for pair in kws.windows(2) {
            assert!(pair[0].chars().count() >= pair[1].chars().count());
        }
    }
}
