//! Session title derivation.
//!
//! Titles are derived from the first user message with a fixed keyword
//! heuristic so the same message always yields the same title.

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading filler phrases removed before matching (only at the very start).
static LEADING_FILLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(i want to|i would like to|can you|please|help me|i need|i have|tell me about)",
    )
    .expect("leading filler pattern is valid")
});

/// Action verbs removed anywhere as whole words.
static ACTION_VERBS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(cook|make|prepare|recipe for|how to)\b").expect("action verb pattern is valid")
});

/// Dish and ingredient terms, scanned in declaration order.
const DISH_KEYWORDS: &[&str] = &[
    "adobo",
    "sinigang",
    "lumpia",
    "pansit",
    "lechon",
    "kare-kare",
    "bistek",
    "menudo",
    "rice",
    "chicken",
    "pork",
    "beef",
    "fish",
    "vegetables",
    "noodles",
    "soup",
];

const RAW_TITLE_CHARS: usize = 20;

/// Derives a session title from a user message.
///
/// 1. The first declared dish keyword found yields `"<Keyword> Recipe"`.
/// 2. Otherwise the first two words longer than two characters, capitalized.
/// 3. Otherwise the first 20 characters of the raw message, with `...` if cut.
pub fn derive_title(user_message: &str) -> String {
    let lowered = user_message.to_lowercase();
    let without_filler = LEADING_FILLER.replace(&lowered, "");
    let cleaned = ACTION_VERBS.replace_all(&without_filler, "");
    let cleaned = cleaned.trim();

    if let Some(keyword) = DISH_KEYWORDS.iter().find(|k| cleaned.contains(*k)) {
        return format!("{} Recipe", capitalize(keyword));
    }

    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .take(2)
        .collect();
    if !words.is_empty() {
        return capitalize(&words.join(" "));
    }

    let mut title: String = user_message.chars().take(RAW_TITLE_CHARS).collect();
    if user_message.chars().count() > RAW_TITLE_CHARS {
        title.push_str("...");
    }
    title
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
