//! Target-language and style tables for the translate command.
//!
//! The prompt template wants the language's display name, not its code, so
//! lookups resolve either form.

pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub supports_formality: bool,
}

pub const LANGUAGES: &[Language] = &[
    Language { code: "BG", name: "Bulgarian", supports_formality: false },
    Language { code: "CS", name: "Czech", supports_formality: false },
    Language { code: "DA", name: "Danish", supports_formality: false },
    Language { code: "DE", name: "German", supports_formality: true },
    Language { code: "EL", name: "Greek", supports_formality: false },
    Language { code: "EN-GB", name: "English (British)", supports_formality: false },
    Language { code: "EN-US", name: "English (American)", supports_formality: false },
    Language { code: "ES", name: "Spanish", supports_formality: true },
    Language { code: "ET", name: "Estonian", supports_formality: false },
    Language { code: "FI", name: "Finnish", supports_formality: false },
    Language { code: "FR", name: "French", supports_formality: true },
    Language { code: "HU", name: "Hungarian", supports_formality: false },
    Language { code: "ID", name: "Indonesian", supports_formality: false },
    Language { code: "IT", name: "Italian", supports_formality: true },
    Language { code: "JA", name: "Japanese", supports_formality: false },
    Language { code: "KO", name: "Korean", supports_formality: false },
    Language { code: "LT", name: "Lithuanian", supports_formality: false },
    Language { code: "LV", name: "Latvian", supports_formality: false },
    Language { code: "NB", name: "Norwegian", supports_formality: false },
    Language { code: "NL", name: "Dutch", supports_formality: true },
    Language { code: "PL", name: "Polish", supports_formality: true },
    Language { code: "PT-BR", name: "Portuguese (Brazilian)", supports_formality: true },
    Language { code: "PT-PT", name: "Portuguese (European)", supports_formality: true },
    Language { code: "RO", name: "Romanian", supports_formality: false },
    Language { code: "RU", name: "Russian", supports_formality: true },
    Language { code: "SK", name: "Slovak", supports_formality: false },
    Language { code: "SL", name: "Slovenian", supports_formality: false },
    Language { code: "SV", name: "Swedish", supports_formality: false },
    Language { code: "TR", name: "Turkish", supports_formality: false },
    Language { code: "UK", name: "Ukrainian", supports_formality: false },
    Language { code: "ZH", name: "Chinese (simplified)", supports_formality: false },
];

pub struct Style {
    pub value: &'static str,
    pub name: &'static str,
}

pub const STYLES: &[Style] = &[
    Style { value: "", name: "Default" },
    Style { value: "novel", name: "Novel" },
    Style { value: "twitter", name: "Twitter" },
    Style { value: "wiki", name: "Wiki" },
];

/// Resolve a target language by code or display name, case-insensitively.
pub fn resolve(input: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|language| {
        language.code.eq_ignore_ascii_case(input) || language.name.eq_ignore_ascii_case(input)
    })
}

pub fn resolve_style(input: &str) -> Option<&'static Style> {
    STYLES.iter().find(|style| style.value.eq_ignore_ascii_case(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_by_code_and_by_name() {
        assert_eq!(resolve("FR").expect("code lookup").name, "French");
        assert_eq!(resolve("french").expect("name lookup").code, "FR");
        assert_eq!(resolve("pt-br").expect("code lookup").name, "Portuguese (Brazilian)");
        assert!(resolve("Klingon").is_none());
    }

    #[test]
    fn default_style_is_the_empty_value() {
        assert_eq!(resolve_style("").expect("default style").name, "Default");
        assert!(resolve_style("novel").is_some());
        assert!(resolve_style("haiku").is_none());
    }
}
