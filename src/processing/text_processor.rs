//! Regex-driven field extraction over cleaned résumé text

use crate::profile::EducationLevel;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Spoken languages recognised in a résumé, in reporting order.
const LANGUAGES: [&str; 10] = [
    "english", "vietnamese", "chinese", "japanese", "korean",
    "french", "german", "spanish", "russian", "arabic",
];

pub struct TextProcessor {
    email_regex: Regex,
    phone_regex: Regex,
    linkedin_regex: Regex,
    github_regex: Regex,
    years_regex: Regex,
    language_regex: Regex,
    degree_patterns: Vec<(EducationLevel, Regex)>,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let email_regex = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
            .expect("Invalid email regex");

        let phone_regex = Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b")
            .expect("Invalid phone regex");

        let linkedin_regex = Regex::new(r"(?i)linkedin\.com/in/[\w-]+")
            .expect("Invalid LinkedIn regex");

        let github_regex = Regex::new(r"(?i)github\.com/[\w-]+")
            .expect("Invalid GitHub regex");

        let years_regex = Regex::new(r"(?i)\b(\d{1,3}(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\b")
            .expect("Invalid experience regex");

        let language_regex = Regex::new(&format!(r"(?i)\b({})\b", LANGUAGES.join("|")))
            .expect("Invalid language regex");

        // Highest level first; the first level with any hit wins
        let degree_patterns = vec![
            (
                EducationLevel::Doctorate,
                r"\b(?:ph\.?\s?d\b|doctorate\b|doctoral\b|doctor of\b)",
            ),
            (
                EducationLevel::Master,
                r"\b(?:master'?s?\s+(?:of|degree|in)\b|m\.?sc\b|m\.s\.|mba\b|m\.?eng\b)",
            ),
            (
                EducationLevel::Bachelor,
                r"\b(?:bachelor'?s?\b|b\.?sc\b|b\.s\.|b\.a\.|b\.?eng\b|b\.?tech\b|undergraduate degree\b)",
            ),
            (
                EducationLevel::Associate,
                r"\b(?:associate'?s?\s+(?:of|degree|in)\b)",
            ),
        ]
        .into_iter()
        .map(|(level, pattern)| (level, Regex::new(pattern).expect("Invalid degree regex")))
        .collect();

        Self {
            email_regex,
            phone_regex,
            linkedin_regex,
            github_regex,
            years_regex,
            language_regex,
            degree_patterns,
        }
    }

    /// Normalize typography and line endings while keeping the line structure
    /// that section detection depends on.
    pub fn clean_text(&self, text: &str) -> String {
        let normalized = self.normalize_unicode(&text.replace("\r\n", "\n").replace('\r', "\n"));

        normalized
            .lines()
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_control() || *c == '\t')
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn extract_email(&self, text: &str) -> Option<String> {
        self.email_regex.find(text).map(|m| m.as_str().to_string())
    }

    pub fn extract_phone(&self, text: &str) -> Option<String> {
        self.phone_regex.find(text).map(|m| m.as_str().trim().to_string())
    }

    pub fn extract_linkedin(&self, text: &str) -> Option<String> {
        self.linkedin_regex.find(text).map(|m| m.as_str().to_string())
    }

    pub fn extract_github(&self, text: &str) -> Option<String> {
        self.github_regex.find(text).map(|m| m.as_str().to_string())
    }

    /// Largest "N years" mention in `[0, max_years]`; implausible values are skipped.
    pub fn extract_years(&self, text: &str, max_years: f64) -> Option<f64> {
        self.years_regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1)?.as_str().parse::<f64>().ok())
            .filter(|years| (0.0..=max_years).contains(years))
            .fold(None, |best: Option<f64>, years| match best {
                Some(current) if current >= years => Some(current),
                _ => Some(years),
            })
    }

    pub fn extract_education(&self, text: &str) -> Option<EducationLevel> {
        let lowered = text.to_lowercase();
        self.degree_patterns
            .iter()
            .find(|(_, pattern)| pattern.is_match(&lowered))
            .map(|(level, _)| *level)
    }

    pub fn extract_languages(&self, text: &str) -> Vec<String> {
        let found: Vec<String> = self
            .language_regex
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect();

        LANGUAGES
            .iter()
            .filter(|lang| found.iter().any(|f| f == *lang))
            .map(|lang| capitalize(lang))
            .collect()
    }

    /// The candidate's name is taken from the first few lines: a short line of
    /// capitalised words with no digits or contact details.
    pub fn extract_name(&self, text: &str, is_heading: impl Fn(&str) -> bool) -> Option<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(5)
            .find(|line| {
                if line.len() > 60 || line.contains('@') || line.chars().any(|c| c.is_ascii_digit()) {
                    return false;
                }
                if is_heading(*line) {
                    return false;
                }
                let words: Vec<&str> = line.unicode_words().collect();
                (2..=4).contains(&words.len())
                    && words
                        .iter()
                        .all(|w| w.chars().next().map_or(false, |c| c.is_uppercase()))
            })
            .map(|line| line.to_string())
    }

    /// Normalize Unicode characters
    fn normalize_unicode(&self, text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'', // Smart quotes to regular quotes
                '\u{201C}' | '\u{201D}' => '"',   // Smart double quotes
                '\u{2013}' | '\u{2014}' => '-',   // En dash, em dash to hyphen
                '\u{2026}' => '.',                // Ellipsis to period
                '\u{00A0}' => ' ',                // Non-breaking space
                _ => c,
            })
            .collect()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
