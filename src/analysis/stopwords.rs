//! Built-in English stopword list.
//!
//! Only entries at least `min_word_len` characters long can ever match a
//! candidate word, but the full list is kept so a lower minimum still
//! filters correctly.

use once_cell::sync::Lazy;
use std::collections::HashSet;

const WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
    "any", "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't",
    "did", "didn't", "do", "does", "doesn't", "doing", "don't", "down", "during", "each",
    "else", "ever", "few", "for", "from", "further", "get", "had", "hadn't", "has",
    "hasn't", "have", "haven't", "having", "he", "he'd", "he'll", "he's", "hence", "her",
    "here", "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "however",
    "http", "i", "i'd", "i'll", "i'm", "i've", "if", "in", "into", "is", "isn't", "it",
    "it's", "its", "itself", "just", "k", "let's", "like", "me", "more", "most", "mustn't",
    "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other",
    "otherwise", "ought", "our", "ours", "ourselves", "out", "over", "own", "r", "same",
    "shall", "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't", "since",
    "so", "some", "such", "than", "that", "that's", "the", "their", "theirs", "them",
    "themselves", "then", "there", "there's", "therefore", "these", "they", "they'd",
    "they'll", "they're", "they've", "this", "those", "through", "to", "too", "under",
    "until", "up", "very", "was", "wasn't", "we", "we'd", "we'll", "we're", "we've", "were",
    "weren't", "what", "what's", "when", "when's", "where", "where's", "which", "while",
    "who", "who's", "whom", "why", "why's", "with", "won't", "would", "wouldn't", "www",
    "you", "you'd", "you'll", "you're", "you've", "your", "yours", "yourself", "yourselves",
];

pub fn default_stopwords() -> &'static HashSet<String> {
    static SET: Lazy<HashSet<String>> = Lazy::new(|| WORDS.iter().map(|s| s.to_string()).collect());
    &SET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_long_function_words_are_listed() {
        let set = default_stopwords();
        for w in ["there", "which", "about", "their", "would", "should", "themselves"] {
            assert!(set.contains(w), "{w} missing");
        }
        assert!(!set.contains("research"));
    }
}
