//! Small text helpers shared by the extractors.

/// Fold full-width ASCII variants (`８１．５ｋｇ`) and the ideographic space
/// to their half-width forms. Everything else passes through.
pub fn fold_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{3000}' => ' ',
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Messages phrased as questions are never records.
pub fn is_question(text: &str) -> bool {
    text.contains('?') || text.contains('？')
}

pub fn is_hiragana(c: char) -> bool {
    ('\u{3041}'..='\u{309F}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_width() {
        assert_eq!(fold_width("８１．５ｋｇ"), "81.5kg");
        assert_eq!(fold_width("朝　パン"), "朝 パン");
        assert_eq!(fold_width("ラーメン"), "ラーメン");
    }

    #[test]
    fn test_question() {
        assert!(is_question("体重どうやって減らす？"));
        assert!(is_question("calories?"));
        assert!(!is_question("81.5kg"));
    }

    #[test]
    fn test_hiragana() {
        assert!(is_hiragana('と'));
        assert!(!is_hiragana('ト'));
        assert!(!is_hiragana('丼'));
    }
}
