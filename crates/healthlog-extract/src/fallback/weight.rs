//! Body-weight detection.

use once_cell::sync::Lazy;
use regex::Regex;

use healthlog_core::WeightMention;

/// Confidence of a fallback weight reading.
pub const WEIGHT_CONFIDENCE: f64 = 0.8;

static WEIGHT_KEYWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)体重|kg|キログラム|キロ|ｋｇ").unwrap());

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?P<num>\d+(?:\.\d+)?)\s*(?:(?P<unit>kg|キログラム|キロ|%)|(?P<other>[時月日分秒年歳才回歩]))?",
    )
    .unwrap()
});

static BODY_FAT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"体脂肪率?[^\d]{0,6}(?P<num>\d+(?:\.\d+)?)\s*%").unwrap());

/// Verbs that turn a weight-like number into something else (`1キロ食べた`,
/// `5キロ走った`).
const NON_WEIGHT_VERBS: &[&str] = &["食べ", "たべ", "飲", "走", "歩", "泳", "漕", "持ち上げ"];

pub fn has_weight_keyword(text: &str) -> bool {
    WEIGHT_KEYWORD_RE.is_match(text)
}

/// A weight keyword with no verb that makes the amount food or distance.
/// `text` must already be width-folded.
pub fn looks_like_weight(text: &str) -> bool {
    has_weight_keyword(text) && !NON_WEIGHT_VERBS.iter().any(|v| text.contains(v))
}

/// `text` must already be width-folded.
///
/// A number with a weight unit wins. Otherwise the first bare number after
/// `体重`, then the first bare number anywhere. Clock times, dates and
/// counts (`7時`, `3日`) are never read as weight.
pub fn detect_weight(text: &str, ceiling_kg: f64) -> Option<WeightMention> {
    if !looks_like_weight(text) {
        return None;
    }

    let keyword_end = text.find("体重").map(|pos| pos + "体重".len());
    let mut with_unit = None;
    let mut bare_after_keyword = None;
    let mut bare = None;
    for caps in NUMBER_RE.captures_iter(text) {
        if caps.name("other").is_some() {
            continue;
        }
        let num = &caps["num"];
        let Ok(value) = num.parse::<f64>() else {
            continue;
        };
        match caps.name("unit").map(|u| u.as_str()) {
            Some("%") => {}
            Some(_) => {
                with_unit.get_or_insert(value);
            }
            None => {
                bare.get_or_insert(value);
                let start = caps.name("num").map_or(0, |m| m.start());
                if keyword_end.is_some_and(|end| start >= end) {
                    bare_after_keyword.get_or_insert(value);
                }
            }
        }
    }

    let value_kg = with_unit.or(bare_after_keyword).or(bare)?;
    if value_kg <= 0.0 || value_kg >= ceiling_kg {
        return None;
    }

    let body_fat_percent = BODY_FAT_RE
        .captures(text)
        .and_then(|caps| caps["num"].parse::<f64>().ok())
        .filter(|v| *v > 0.0 && *v < 100.0);

    Some(WeightMention {
        value_kg,
        body_fat_percent,
        confidence: WEIGHT_CONFIDENCE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_counts_as_keyword() {
        let w = detect_weight("81.5kg", 500.0).unwrap();
        assert_eq!(w.value_kg, 81.5);
        assert_eq!(w.confidence, WEIGHT_CONFIDENCE);
        assert_eq!(w.body_fat_percent, None);
    }

    #[test]
    fn test_keyword_with_bare_number() {
        let w = detect_weight("今朝の体重 62.3", 500.0).unwrap();
        assert_eq!(w.value_kg, 62.3);
    }

    #[test]
    fn test_bare_number_alone_is_not_weight() {
        assert!(detect_weight("62.3", 500.0).is_none());
    }

    #[test]
    fn test_ceiling() {
        assert!(detect_weight("体重 650kg", 500.0).is_none());
        assert!(detect_weight("体重 0kg", 500.0).is_none());
    }

    #[test]
    fn test_body_fat() {
        let w = detect_weight("体脂肪率18.5% 体重70キロ", 500.0).unwrap();
        assert_eq!(w.value_kg, 70.0);
        assert_eq!(w.body_fat_percent, Some(18.5));
    }

    #[test]
    fn test_other_activities_are_not_weight() {
        assert!(detect_weight("5キロ走った", 500.0).is_none());
        assert!(detect_weight("牛肉1キロ食べた", 500.0).is_none());
        assert!(!looks_like_weight("牛肉1キロ食べた"));
        assert!(looks_like_weight("体重65kg"));
    }

    #[test]
    fn test_clock_time_before_keyword_is_skipped() {
        let w = detect_weight("朝7時 体重65.2", 500.0).unwrap();
        assert_eq!(w.value_kg, 65.2);

        let w = detect_weight("3月5日 体重 58", 500.0).unwrap();
        assert_eq!(w.value_kg, 58.0);
    }

    #[test]
    fn test_bare_number_after_keyword_preferred() {
        let w = detect_weight("2回目の計測 体重 71.4", 500.0).unwrap();
        assert_eq!(w.value_kg, 71.4);

        let w = detect_weight("今日 3 体重 70", 500.0).unwrap();
        assert_eq!(w.value_kg, 70.0);
    }
}
