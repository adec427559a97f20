// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::DEFAULT_LANG;

const SUPPORTED_LANGS: [&str; 2] = ["es", "en"];

// Extrator de idioma a partir do Accept-Language
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Locale {
    pub fn from_header(header_str: &str) -> Self {
        // accept_language já devolve os idiomas ordenados por peso
        let lang = accept_language::parse(header_str)
            .into_iter()
            .map(|tag| {
                // "es-MX" -> "es"
                tag.split('-').next().unwrap_or(&tag).to_lowercase()
            })
            .find(|lang| SUPPORTED_LANGS.contains(&lang.as_str()))
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Locale(lang)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        Ok(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_supported_language() {
        assert_eq!(Locale::from_header("en-US,en;q=0.9").0, "en");
        assert_eq!(Locale::from_header("fr-FR,es-MX;q=0.8").0, "es");
        assert_eq!(Locale::from_header("de").0, "es");
    }
}
