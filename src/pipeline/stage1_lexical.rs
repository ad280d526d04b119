pub const FILLER_WORDS: &[&str] = &[
    "um",
    "uh",
    "like",
    "so",
    "actually",
    "basically",
    "right",
    "hmm",
    "huh",
];

pub const FILLER_PHRASES: &[(&str, &str)] = &[("you", "know"), ("i", "mean")];

#[derive(Debug, Clone, PartialEq)]
pub struct LexicalStats {
    pub word_count: u32,
    pub distinct_words: u32,
    pub ttr: f64,
    pub filler_count: u32,
    pub filler_rate_per_100: f64,
}

pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Lowercase with typographic apostrophes folded to `'`, so `I’m` and
/// `i'm` compare equal.
pub fn fold_case(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            c => c,
        })
        .collect::<String>()
        .to_lowercase()
}

/// Folded token with surrounding punctuation removed. A token made only of
/// punctuation keeps its raw (folded) form.
pub fn normalize_token(token: &str) -> String {
    let trimmed = token.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() {
        fold_case(token)
    } else {
        fold_case(trimmed)
    }
}

pub fn run_stage1(text: &str) -> LexicalStats {
    let words: Vec<String> = tokenize(text).into_iter().map(normalize_token).collect();
    let word_count = words.len() as u32;
    if word_count == 0 {
        return LexicalStats {
            word_count: 0,
            distinct_words: 0,
            ttr: 0.0,
            filler_count: 0,
            filler_rate_per_100: 0.0,
        };
    }

    let mut distinct: Vec<&str> = words.iter().map(String::as_str).collect();
    distinct.sort_unstable();
    distinct.dedup();
    let distinct_words = distinct.len() as u32;

    let filler_count = count_fillers(&words);

    LexicalStats {
        word_count,
        distinct_words,
        ttr: distinct_words as f64 / word_count as f64,
        filler_count,
        filler_rate_per_100: filler_count as f64 / word_count as f64 * 100.0,
    }
}

fn count_fillers(words: &[String]) -> u32 {
    let mut count = 0u32;
    let mut i = 0usize;
    while i < words.len() {
        if i + 1 < words.len() {
            let pair = (words[i].as_str(), words[i + 1].as_str());
            if FILLER_PHRASES.contains(&pair) {
                count += 1;
                i += 2;
                continue;
            }
        }
        if FILLER_WORDS.contains(&words[i].as_str()) {
            count += 1;
        }
        i += 1;
    }
    count
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_lexical.rs"]
mod tests;
