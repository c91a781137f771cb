//! Exercise detection and measurement parsing.
//!
//! Activities are located by keyword. Each activity owns the text between it
//! and its neighbours; whether numbers precede or follow the activity name is
//! decided once per message from the text before the first activity.

use once_cell::sync::Lazy;
use regex::Regex;

use healthlog_catalog::exercise::{exercise_by_id, exercise_keywords_longest_first};
use healthlog_catalog::ExerciseEntry;
use healthlog_core::{ExerciseCategory, ExerciseMention, TimeOfDay, WeightedSet};

pub const VERB_CONFIDENCE: f64 = 0.8;
pub const QUANTITY_CONFIDENCE: f64 = 0.7;

/// Past-tense verbs that mark a completed activity.
const ACTIVITY_VERBS: &[&str] = &[
    "した", "しました", "やった", "やりました", "行った", "行きました", "いった", "いきました", "走った",
    "走りました", "歩いた", "歩きました", "泳いだ", "泳ぎました", "踊った", "登った", "漕いだ", "頑張った",
    "がんばった", "こなした",
];

/// Verbs that name an activity on their own (`5キロ走った`).
const VERB_ACTIVITIES: &[(&str, &str)] = &[
    ("走った", "running"),
    ("走りました", "running"),
    ("歩いた", "walking"),
    ("歩きました", "walking"),
    ("泳いだ", "swimming"),
    ("泳ぎました", "swimming"),
];

/// Abbreviations rewritten to their canonical names.
const NAME_REWRITES: &[(&str, &str)] = &[
    ("腕立て", "腕立て伏せ"),
    ("うでたて", "腕立て伏せ"),
    ("腹筋", "腹筋運動"),
    ("ふっきん", "腹筋運動"),
    ("筋トレ", "筋力トレーニング"),
    ("きんとれ", "筋力トレーニング"),
];

const TIME_WORDS: &[(&str, TimeOfDay)] = &[
    ("今朝", TimeOfDay::Morning),
    ("早朝", TimeOfDay::Morning),
    ("午前", TimeOfDay::Morning),
    ("朝", TimeOfDay::Morning),
    ("午後", TimeOfDay::Afternoon),
    ("昼", TimeOfDay::Afternoon),
    ("夕方", TimeOfDay::Evening),
    ("今夜", TimeOfDay::Night),
    ("夜", TimeOfDay::Night),
    ("晩", TimeOfDay::Night),
];

static WEIGHTED_SET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?P<w>\d+(?:\.\d+)?)\s*(?:kg|キロ)\s*[x×*]\s*(?P<r>\d+)\s*(?:回|レップ|reps?)?(?:\s*[x×*]\s*(?P<s>\d+)\s*(?:セット|sets?)?)?",
    )
    .unwrap()
});

static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?P<num>\d+(?:\.\d+)?)\s*(?P<unit>分間|分|minutes|mins|min|時間|hours|hour|hrs|hr|h|キロメートル|km|キログラム|kg|キロ|回|レップ|reps|rep|セット|sets|set|%)?",
    )
    .unwrap()
});

/// An activity keyword located in the (width-folded) text.
#[derive(Debug, Clone, Copy)]
pub struct ActivityHit {
    pub entry: &'static ExerciseEntry,
    pub keyword: &'static str,
    pub start: usize,
    pub end: usize,
    /// Found through a verb rather than a catalog keyword.
    pub from_verb: bool,
}

pub fn has_exercise_keyword(text: &str) -> bool {
    exercise_keywords_longest_first()
        .iter()
        .any(|(kw, _)| text.contains(kw))
}

pub fn has_activity_verb(text: &str) -> bool {
    ACTIVITY_VERBS.iter().any(|v| text.contains(v))
}

/// Left-to-right, longest-keyword-first scan. Falls back to activity verbs
/// when no keyword is present.
pub fn find_activities(text: &str) -> Vec<ActivityHit> {
    let keywords = exercise_keywords_longest_first();
    let mut hits = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        match keywords.iter().find(|(kw, _)| rest.starts_with(kw)) {
            Some(&(keyword, entry)) => {
                hits.push(ActivityHit {
                    entry,
                    keyword,
                    start: pos,
                    end: pos + keyword.len(),
                    from_verb: false,
                });
                pos += keyword.len();
            }
            None => pos += rest.chars().next().map_or(1, char::len_utf8),
        }
    }
    if hits.is_empty() {
        hits = VERB_ACTIVITIES
            .iter()
            .filter_map(|&(verb, id)| {
                let start = text.find(verb)?;
                Some(ActivityHit {
                    entry: exercise_by_id(id)?,
                    keyword: verb,
                    start,
                    end: start + verb.len(),
                    from_verb: true,
                })
            })
            .take(1)
            .collect();
    }
    hits
}

pub fn distinct_activities(hits: &[ActivityHit]) -> usize {
    let mut ids: Vec<&str> = hits.iter().map(|h| h.entry.id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids.len()
}

/// Exercise classification for the fallback path. `text` must be width-folded.
pub fn detect_exercises(text: &str) -> Option<(Vec<ExerciseMention>, f64)> {
    let hits = find_activities(text);
    if hits.is_empty() {
        return None;
    }
    let mentions = mentions_from_hits(text, &hits);
    let confidence = if has_activity_verb(text) {
        VERB_CONFIDENCE
    } else if mentions.iter().any(has_measurement) {
        QUANTITY_CONFIDENCE
    } else {
        return None;
    };
    Some((mentions, confidence))
}

/// One mention per located activity, without the verb/quantity gate.
pub fn parse_exercises(text: &str) -> Vec<ExerciseMention> {
    let hits = find_activities(text);
    mentions_from_hits(text, &hits)
}

fn mentions_from_hits(text: &str, hits: &[ActivityHit]) -> Vec<ExerciseMention> {
    let single = hits.len() == 1;
    let numbers_lead = hits
        .first()
        .is_some_and(|first| QUANTITY_RE.is_match(&text[..first.start]));

    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            let prev_end = if i == 0 { 0 } else { hits[i - 1].end };
            let next_start = hits.get(i + 1).map_or(text.len(), |h| h.start);
            let lead = &text[prev_end..hit.start];
            let tail = &text[hit.end..next_start];

            let mut mention = ExerciseMention::new(hit.entry.category, canonical_name(hit));
            let scope = if single {
                text
            } else if numbers_lead {
                lead
            } else {
                tail
            };
            apply_measurements(&mut mention, scope);
            mention.time_of_day = time_of_day(lead).or_else(|| if single { time_of_day(text) } else { None });
            mention
        })
        .collect()
}

fn canonical_name(hit: &ActivityHit) -> String {
    if hit.from_verb {
        return hit.entry.name.to_string();
    }
    NAME_REWRITES
        .iter()
        .find(|(abbr, _)| *abbr == hit.keyword)
        .map_or(hit.keyword, |&(_, full)| full)
        .to_string()
}

fn time_of_day(text: &str) -> Option<TimeOfDay> {
    TIME_WORDS
        .iter()
        .filter_map(|&(word, tod)| text.find(word).map(|pos| (pos, tod)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, tod)| tod)
}

fn has_measurement(m: &ExerciseMention) -> bool {
    m.duration_minutes.is_some()
        || m.distance_km.is_some()
        || m.reps.is_some()
        || m.weight_kg.is_some()
        || m.set_count.is_some()
        || !m.sets.is_empty()
}

fn positive(v: f64) -> Option<f64> {
    (v > 0.0).then_some(v)
}

fn whole(v: f64) -> Option<u32> {
    (v > 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX)).then_some(v as u32)
}

/// Fill numeric fields from what the scope states. Nothing is guessed.
fn apply_measurements(mention: &mut ExerciseMention, scope: &str) {
    let strength = mention.category == ExerciseCategory::Strength;

    for caps in WEIGHTED_SET_RE.captures_iter(scope) {
        let weight = caps["w"].parse::<f64>().ok().and_then(positive);
        let reps = caps["r"].parse::<f64>().ok().and_then(whole);
        let set_count = caps
            .name("s")
            .and_then(|s| s.as_str().parse::<f64>().ok())
            .and_then(whole)
            .unwrap_or(1);
        if let (Some(weight_kg), Some(reps)) = (weight, reps) {
            mention.sets.push(WeightedSet {
                weight_kg,
                reps,
                set_count,
            });
        }
    }
    let rest = WEIGHTED_SET_RE.replace_all(scope, " ").into_owned();

    let mut minutes = 0.0;
    let mut bare = None;
    let mut saw_unit = false;
    for caps in QUANTITY_RE.captures_iter(&rest) {
        let num = caps.name("num").map_or("", |m| m.as_str());
        let Ok(value) = num.parse::<f64>() else {
            continue;
        };
        let Some(unit) = caps.name("unit") else {
            let num_end = caps.name("num").map_or(0, |m| m.end());
            if bare.is_none() && is_bare(&rest[num_end..]) {
                bare = Some(value);
            }
            continue;
        };
        saw_unit = true;
        match unit.as_str().to_lowercase().as_str() {
            "分間" | "分" | "minutes" | "mins" | "min" => minutes += value,
            "時間" | "hours" | "hour" | "hrs" | "hr" | "h" => minutes += value * 60.0,
            "キロメートル" | "km" => mention.distance_km = mention.distance_km.or(positive(value)),
            "kg" | "キログラム" => {
                if strength {
                    mention.weight_kg = mention.weight_kg.or(positive(value));
                }
            }
            "キロ" => {
                if strength {
                    mention.weight_kg = mention.weight_kg.or(positive(value));
                } else {
                    mention.distance_km = mention.distance_km.or(positive(value));
                }
            }
            "回" | "レップ" | "reps" | "rep" => mention.reps = mention.reps.or(whole(value)),
            "セット" | "sets" | "set" => mention.set_count = mention.set_count.or(whole(value)),
            _ => {}
        }
    }
    mention.duration_minutes = positive(minutes);

    if !saw_unit && mention.sets.is_empty() {
        if let Some(value) = bare {
            if strength {
                mention.reps = whole(value);
            } else {
                mention.duration_minutes = positive(value);
            }
        }
    }
}

/// A number followed by nothing, whitespace or punctuation.
fn is_bare(after: &str) -> bool {
    match after.chars().next() {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '、' | '。' | ',' | '.' | '!' | '！' | 'と'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(text: &str) -> ExerciseMention {
        let (mut mentions, _) = detect_exercises(text).unwrap();
        assert_eq!(mentions.len(), 1, "{text}");
        mentions.remove(0)
    }

    #[test]
    fn test_bare_reps_for_strength() {
        let m = single("腕立て 10");
        assert_eq!(m.category, ExerciseCategory::Strength);
        assert_eq!(m.name, "腕立て伏せ");
        assert_eq!(m.reps, Some(10));
        assert_eq!(m.duration_minutes, None);
    }

    #[test]
    fn test_bare_minutes_for_cardio() {
        let m = single("ヨガ 45");
        assert_eq!(m.duration_minutes, Some(45.0));
        assert_eq!(m.reps, None);
    }

    #[test]
    fn test_needs_verb_or_quantity() {
        assert!(detect_exercises("野球").is_none());
        let (_, conf) = detect_exercises("野球した").unwrap();
        assert_eq!(conf, VERB_CONFIDENCE);
        let (_, conf) = detect_exercises("ヨガ30分").unwrap();
        assert_eq!(conf, QUANTITY_CONFIDENCE);
    }

    #[test]
    fn test_keyword_category_table() {
        assert_eq!(single("野球した").category, ExerciseCategory::Sports);
        assert_eq!(single("筋トレした").category, ExerciseCategory::Strength);
        assert_eq!(single("筋トレした").name, "筋力トレーニング");
    }

    #[test]
    fn test_hours_and_minutes() {
        let m = single("ランニング1時間30分");
        assert_eq!(m.duration_minutes, Some(90.0));
    }

    #[test]
    fn test_kiro_is_distance_for_cardio() {
        let m = single("ジョギング 5キロ 30分");
        assert_eq!(m.distance_km, Some(5.0));
        assert_eq!(m.weight_kg, None);
        assert_eq!(m.duration_minutes, Some(30.0));
    }

    #[test]
    fn test_verb_alone_names_activity() {
        let m = single("5キロ走った");
        assert_eq!(m.name, "ランニング");
        assert_eq!(m.distance_km, Some(5.0));
    }

    #[test]
    fn test_weighted_sets() {
        let m = single("ベンチプレス 60kg×10回×3セット");
        assert_eq!(
            m.sets,
            vec![WeightedSet {
                weight_kg: 60.0,
                reps: 10,
                set_count: 3
            }]
        );
        assert_eq!(m.reps, None);
        assert_eq!(m.duration_minutes, None);
    }

    #[test]
    fn test_aggregate_strength_numbers() {
        let m = single("スクワット 20回 3セット");
        assert_eq!(m.reps, Some(20));
        assert_eq!(m.set_count, Some(3));
        assert!(m.sets.is_empty());
    }

    #[test]
    fn test_two_activities_numbers_after() {
        let (mentions, _) = detect_exercises("ランニング30分、腕立て20回やった").unwrap();
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].duration_minutes, Some(30.0));
        assert_eq!(mentions[0].reps, None);
        assert_eq!(mentions[1].name, "腕立て伏せ");
        assert_eq!(mentions[1].reps, Some(20));
    }

    #[test]
    fn test_two_activities_numbers_before() {
        let (mentions, _) = detect_exercises("30分ランニングと20回スクワットした").unwrap();
        assert_eq!(mentions[0].duration_minutes, Some(30.0));
        assert_eq!(mentions[1].reps, Some(20));
    }

    #[test]
    fn test_time_of_day() {
        assert_eq!(single("朝ヨガした").time_of_day, Some(TimeOfDay::Morning));
        assert_eq!(single("ヨガした").time_of_day, None);
    }

    #[test]
    fn test_no_invented_numbers() {
        let m = single("水泳した");
        assert_eq!(m.duration_minutes, None);
        assert_eq!(m.distance_km, None);
        assert_eq!(m.reps, None);
        assert_eq!(m.weight_kg, None);
        assert_eq!(m.set_count, None);
    }

    #[test]
    fn test_clock_time_is_not_a_duration() {
        let m = single("7時にヨガした");
        assert_eq!(m.duration_minutes, None);
    }

    #[test]
    fn test_distinct_activities() {
        let hits = find_activities("ジョギングとランニングと水泳");
        assert_eq!(hits.len(), 3);
        assert_eq!(distinct_activities(&hits), 2);
    }
}
