// this_file: crates/shahada-unicode/src/proptests.rs

use super::*;
use proptest::prelude::*;

// Property: shaping is a pure function of its input
proptest! {
    #[test]
    fn prop_shaping_deterministic(s in "\\PC{0,60}") {
        let shaper = TextShaper::new();
        let text = LogicalText::from(s.as_str());
        prop_assert_eq!(
            shaper.shape(&text, ScriptHint::Auto),
            shaper.shape(&text, ScriptHint::Auto)
        );
    }
}

// Property: text without Arabic letters only gets reordered, never rewritten
proptest! {
    #[test]
    fn prop_latin_keeps_characters(s in "[a-zA-Z0-9 ,.]{0,60}") {
        let visual = shape(&LogicalText::from(s.as_str()), ScriptHint::Auto);
        let mut expected: Vec<char> = s.chars().collect();
        let mut actual: Vec<char> = visual.as_str().chars().collect();
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(expected, actual);
    }
}

// Property: shaping never drops whitespace-delimited words
proptest! {
    #[test]
    fn prop_word_count_preserved(words in proptest::collection::vec("[ابتثجحخدذرزسشصضطظعغفقكلمنهوي]{1,6}", 0..8)) {
        let text = LogicalText::from(words.join(" "));
        let visual = shape(&text, ScriptHint::Arabic);
        prop_assert_eq!(visual.as_str().split_whitespace().count(), words.len());
    }
}
