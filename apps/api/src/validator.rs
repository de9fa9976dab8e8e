//! Text Quality Validator — heuristic gate that decides whether a text blob
//! plausibly represents a job description before any analysis engine call.
//!
//! Pure and synchronous: no I/O, no state. Rules run in a fixed order and
//! the first failing rule wins; the reason message is part of the contract,
//! so rule order must not change.

use serde::{Deserialize, Serialize};

/// Minimum trimmed length accepted, in characters.
pub const MIN_LENGTH: usize = 50;
/// A single character repeated this many times in a row is treated as spam.
const MAX_CHAR_RUN: usize = 6;
/// Fraction of non-word, non-whitespace, non-punctuation characters tolerated.
const NOISE_THRESHOLD: f64 = 0.30;
/// Minimum count of meaningful tokens (alphanumeric-only length >= 3).
const MIN_MEANINGFUL_TOKENS: usize = 10;
const MIN_TOKEN_LEN: usize = 3;
/// Below this vowel-to-consonant ratio, letter soup is treated as gibberish.
const MIN_VOWEL_RATIO: f64 = 0.2;

const ALLOWED_PUNCTUATION: &str = ".,!?;:()-'\"/";

/// Vocabulary a job posting is expected to touch at least once
/// (role/seniority words, process words, compensation words).
const JOB_TERMS: &[&str] = &[
    "job",
    "position",
    "role",
    "responsibilities",
    "requirements",
    "qualifications",
    "experience",
    "skills",
    "candidate",
    "team",
    "salary",
    "compensation",
    "benefits",
    "apply",
    "application",
    "applicant",
    "resume",
    "interview",
    "hiring",
    "hire",
    "employment",
    "employer",
    "remote",
    "full-time",
    "part-time",
    "developer",
    "engineer",
    "manager",
    "analyst",
    "designer",
    "senior",
    "junior",
    "intern",
    "recruit",
    "career",
    "opportunity",
    "duties",
    "vacancy",
];

/// Outcome of validation. Never persisted; `reason` is empty on acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub accepted: bool,
    pub reason: String,
}

impl Verdict {
    fn accepted() -> Self {
        Verdict {
            accepted: true,
            reason: String::new(),
        }
    }

    fn rejected(reason: String) -> Self {
        Verdict {
            accepted: false,
            reason,
        }
    }
}

/// Each rule inspects the trimmed text and returns a rejection reason, or
/// `None` to pass. Evaluated in order; the first `Some` short-circuits.
const RULES: &[fn(&str) -> Option<String>] = &[
    check_length,
    check_repetition,
    check_noise_ratio,
    check_substance,
    check_topical_relevance,
    check_gibberish,
];

/// Validates that `text` plausibly is a job description.
pub fn validate(text: &str) -> Verdict {
    let trimmed = text.trim();
    for rule in RULES {
        if let Some(reason) = rule(trimmed) {
            return Verdict::rejected(reason);
        }
    }
    Verdict::accepted()
}

fn check_length(text: &str) -> Option<String> {
    let length = text.chars().count();
    if length < MIN_LENGTH {
        return Some(format!(
            "Text is too short: {length} characters (minimum {MIN_LENGTH} required)"
        ));
    }
    None
}

fn check_repetition(text: &str) -> Option<String> {
    let mut run = 0usize;
    let mut previous: Option<char> = None;
    for c in text.chars() {
        if Some(c) == previous {
            run += 1;
            if run >= MAX_CHAR_RUN {
                return Some(format!(
                    "Text contains the character '{c}' repeated {MAX_CHAR_RUN} or more times in a row"
                ));
            }
        } else {
            previous = Some(c);
            run = 1;
        }
    }
    None
}

fn check_noise_ratio(text: &str) -> Option<String> {
    let total = text.chars().count();
    if total == 0 {
        return None;
    }
    let noise = text
        .chars()
        .filter(|&c| {
            !(c.is_alphanumeric() || c == '_' || c.is_whitespace() || ALLOWED_PUNCTUATION.contains(c))
        })
        .count();
    let ratio = noise as f64 / total as f64;
    if ratio > NOISE_THRESHOLD {
        return Some(format!(
            "Text contains too many unusual characters ({:.0}% symbols or noise)",
            ratio * 100.0
        ));
    }
    None
}

fn check_substance(text: &str) -> Option<String> {
    let meaningful = text
        .split_whitespace()
        .filter(|token| {
            token.chars().filter(|c| c.is_alphanumeric()).count() >= MIN_TOKEN_LEN
        })
        .count();
    if meaningful < MIN_MEANINGFUL_TOKENS {
        return Some(format!(
            "Text must contain at least {MIN_MEANINGFUL_TOKENS} meaningful words, found {meaningful}"
        ));
    }
    None
}

fn check_topical_relevance(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    if JOB_TERMS.iter().any(|term| lower.contains(term)) {
        return None;
    }
    Some("Text does not appear to be a job description (no job-related terms found)".to_string())
}

fn check_gibberish(text: &str) -> Option<String> {
    let mut vowels = 0usize;
    let mut consonants = 0usize;
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        if "aeiouAEIOU".contains(c) {
            vowels += 1;
        } else {
            consonants += 1;
        }
    }
    if consonants > 0 && (vowels as f64 / consonants as f64) < MIN_VOWEL_RATIO {
        return Some("Text appears to be unreadable or gibberish".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // 41 word characters + 9 spaces = exactly 50 trimmed characters,
    // 10 meaningful tokens, several job terms.
    const FIFTY_CHARS: &str = "job role team work apply hire pays level data plan";
    // Drop one character for the 49-char boundary.
    const FORTY_NINE_CHARS: &str = "job role team work apply hire pay level data plan";

    const REALISTIC_JD: &str = "We are hiring a senior backend developer to join our platform team. \
         Responsibilities include designing APIs and mentoring junior engineers. \
         Competitive salary and benefits. Apply with your resume.";

    #[test]
    fn accepts_realistic_job_description() {
        let verdict = validate(REALISTIC_JD);
        assert!(verdict.accepted, "rejected: {}", verdict.reason);
        assert!(verdict.reason.is_empty());
    }

    #[test]
    fn rejects_short_text_with_exact_count() {
        let verdict = validate("too short");
        assert!(!verdict.accepted);
        assert!(verdict.reason.contains("9 characters"), "{}", verdict.reason);
        assert!(verdict.reason.contains("50"));
    }

    #[test]
    fn rejects_empty_text_as_zero_length() {
        let verdict = validate("   \n\t  ");
        assert!(!verdict.accepted);
        assert!(verdict.reason.contains("0 characters"), "{}", verdict.reason);
    }

    #[test]
    fn boundary_forty_nine_rejected_fifty_accepted() {
        assert_eq!(FORTY_NINE_CHARS.trim().chars().count(), 49);
        assert_eq!(FIFTY_CHARS.trim().chars().count(), 50);

        let short = validate(FORTY_NINE_CHARS);
        assert!(!short.accepted);
        assert!(short.reason.contains("49 characters"), "{}", short.reason);

        let ok = validate(FIFTY_CHARS);
        assert!(ok.accepted, "rejected: {}", ok.reason);
    }

    #[test]
    fn length_is_measured_on_trimmed_text() {
        let padded = format!("   {FIFTY_CHARS}   \n");
        assert!(validate(&padded).accepted);
    }

    #[test]
    fn repetition_wins_over_later_rules() {
        // Long enough to pass the length gate, only 3 meaningful tokens, so
        // it would also fail the substance rule. Repetition must fire first.
        let text = "aaaaaa job description qq ww ee rr tt yy uu ii oo pp";
        assert!(text.trim().chars().count() >= MIN_LENGTH);

        let verdict = validate(text);
        assert!(!verdict.accepted);
        assert!(
            verdict.reason.contains("repeated"),
            "expected repetition rejection, got: {}",
            verdict.reason
        );
    }

    #[test]
    fn rejects_keyboard_mashing_runs() {
        let text = format!("job {} description with a salary and benefits list", "x".repeat(10));
        let verdict = validate(&text);
        assert!(!verdict.accepted);
        assert!(verdict.reason.contains("'x'"), "{}", verdict.reason);
    }

    #[test]
    fn five_char_run_is_tolerated() {
        let text = "Hello aaaaa we are hiring a developer for our team, apply with your resume today please";
        assert!(validate(&text).accepted, "{}", validate(&text).reason);
    }

    #[test]
    fn rejects_noisy_text() {
        // 20 symbol characters out of 55 total (~36%), runs of 4 stay under
        // the repetition cutoff.
        let text = "$$$$ #### @@@@ %%%% ^^^^ job salary position apply team";
        let verdict = validate(text);
        assert!(!verdict.accepted);
        assert!(
            verdict.reason.contains("unusual characters"),
            "{}",
            verdict.reason
        );
    }

    #[test]
    fn allowed_punctuation_is_not_noise() {
        let text = "Apply now! Salary: competitive (negotiable). Senior role, full-time; \
             see details at our careers page / jobs board today.";
        assert!(validate(text).accepted, "{}", validate(text).reason);
    }

    #[test]
    fn rejects_text_with_too_few_meaningful_words() {
        // Length passes, topical term present, but only 3 tokens reach 3+
        // alphanumeric characters.
        let text = "job a b c d e f g h i j k l m n o p q r s t u vv ww xx yy zz aa bb cc dd";
        let verdict = validate(text);
        assert!(!verdict.accepted);
        assert!(
            verdict.reason.contains("meaningful words"),
            "{}",
            verdict.reason
        );
    }

    #[test]
    fn rejects_off_topic_text() {
        let text = "The quick brown fox jumps over the lazy dog near the river bank every single morning";
        let verdict = validate(text);
        assert!(!verdict.accepted);
        assert!(
            verdict.reason.contains("job description"),
            "{}",
            verdict.reason
        );
    }

    #[test]
    fn topical_match_is_case_insensitive() {
        let text = "SENIOR DEVELOPER WANTED. COMPETITIVE SALARY AND BENEFITS. SEND YOUR RESUME TO OUR TEAM TODAY.";
        assert!(validate(text).accepted, "{}", validate(text).reason);
    }

    #[test]
    fn rejects_consonant_soup_as_gibberish() {
        // Passes length, repetition, noise, substance (14 tokens) and topical
        // ("job"), then fails the vowel-ratio heuristic.
        let text = "bcd fgh jkl mnp qrs tvw xyz bcd fgh jkl mnp job qrs tvw";
        let verdict = validate(text);
        assert!(!verdict.accepted);
        assert!(verdict.reason.contains("gibberish"), "{}", verdict.reason);
    }
}
