use crate::utils::error::{BetError, Result};
use regex::Regex;

/// Pattern of EuroMilRegister's success text, e.g. "Voto registado no Candidato A".
pub const DEFAULT_TAG_PATTERN: &str = r"Candidato ([ABC])";

/// Used when the success text carries no tag.
pub const CONFIRMED_MARKER: &str = "confirmed";

/// Pulls the registration bucket tag out of the service's free-text reply.
///
/// The first capture group is the tag; a pattern without groups yields the
/// whole match.
#[derive(Debug, Clone)]
pub struct ConfirmationParser {
    pattern: Regex,
}

impl ConfirmationParser {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| BetError::InvalidConfigValueError {
            field: "registration_tag_pattern".to_string(),
            value: pattern.to_string(),
            reason: format!("Invalid regular expression: {}", e),
        })?;
        Ok(Self { pattern })
    }

    pub fn extract_tag<'a>(&self, message: &'a str) -> Option<&'a str> {
        let caps = self.pattern.captures(message)?;
        caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())
    }

    /// Tag for the confirmation text, falling back to [`CONFIRMED_MARKER`].
    pub fn tag_or_marker<'a>(&self, message: &'a str) -> &'a str {
        self.extract_tag(message).unwrap_or(CONFIRMED_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_candidate_letter() {
        let parser = ConfirmationParser::new(DEFAULT_TAG_PATTERN).unwrap();
        assert_eq!(parser.extract_tag("Candidato A registado"), Some("A"));
        assert_eq!(parser.extract_tag("Voto registado no Candidato C."), Some("C"));
    }

    #[test]
    fn test_unknown_text_falls_back_to_marker() {
        let parser = ConfirmationParser::new(DEFAULT_TAG_PATTERN).unwrap();
        assert_eq!(parser.extract_tag("Candidato Z registado"), None);
        assert_eq!(parser.tag_or_marker("Voto registado"), CONFIRMED_MARKER);
    }

    #[test]
    fn test_custom_pattern_without_group_uses_whole_match() {
        let parser = ConfirmationParser::new(r"\bB\d+\b").unwrap();
        assert_eq!(parser.extract_tag("ticket B42 stored"), Some("B42"));
        assert!(ConfirmationParser::new("(unclosed").is_err());
    }
}
