//! Dictation language catalog
//!
//! Static, ordered reference data for the language selector. Codes are the
//! BCP-47 tags the recognition engine is configured with.

use serde::Serialize;

/// Default language for newly created sessions
pub const DEFAULT_LANGUAGE: &str = "vi";

/// A selectable dictation language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    /// BCP-47 language tag (e.g. "en-US")
    pub code: &'static str,
    /// Display name for the language selector
    pub name: &'static str,
}

/// All languages offered by the language selector, in display order
pub const LANGUAGES: &[Language] = &[
    Language { code: "en-US", name: "English" },
    Language { code: "vi", name: "Vietnamese" },
    Language { code: "zh-CN", name: "Chinese (Simplified)" },
    Language { code: "zh-TW", name: "Chinese (Traditional)" },
    Language { code: "ja", name: "Japanese" },
    Language { code: "ko", name: "Korean" },
    Language { code: "fr", name: "French" },
    Language { code: "de", name: "German" },
    Language { code: "it", name: "Italian" },
    Language { code: "es", name: "Spanish" },
    Language { code: "pt", name: "Portuguese" },
    Language { code: "ar", name: "Arabic" },
    Language { code: "hi", name: "Hindi" },
    Language { code: "th", name: "Thai" },
    Language { code: "ru", name: "Russian" },
    Language { code: "he", name: "Hebrew" },
];

/// Look up a language by its code
pub fn find(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}
