//! Input checks run before any database call

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ServiceError, ServiceResult};

lazy_static! {
    static ref EPOST_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref FILENAME_UNSAFE: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
}

const MAX_FILENAME_LENGTH: usize = 120;

/// Strip control characters and collapse whitespace
pub fn sanitize_text(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == ' ')
        .filter(|c| !matches!(c, '\u{200B}'..='\u{200F}' | '\u{2028}'..='\u{202F}' | '\u{FEFF}'))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

pub fn require_text(field: &str, value: &str) -> ServiceResult<String> {
    let cleaned = sanitize_text(value);
    if cleaned.is_empty() {
        return Err(ServiceError::validation(field, "er påkrevd"));
    }
    Ok(cleaned)
}

/// Empty strings count as absent
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value.map(sanitize_text).filter(|s| !s.is_empty())
}

fn digits_only(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Norwegian organization number: exactly 9 digits (spaces ignored)
pub fn validate_orgnr(value: &str) -> ServiceResult<String> {
    let orgnr = digits_only(value);
    if orgnr.is_empty() {
        return Err(ServiceError::validation("organisasjonsnummer", "er påkrevd"));
    }
    if orgnr.len() != 9 || !orgnr.chars().all(|c| c.is_ascii_digit()) {
        return Err(ServiceError::validation("organisasjonsnummer", "må bestå av 9 siffer"));
    }
    Ok(orgnr)
}

/// National identity number: exactly 11 digits
pub fn validate_personident(value: &str) -> ServiceResult<String> {
    let ident = digits_only(value);
    if ident.len() != 11 || !ident.chars().all(|c| c.is_ascii_digit()) {
        return Err(ServiceError::validation("personident", "må bestå av 11 siffer"));
    }
    Ok(ident)
}

pub fn validate_postnummer(value: &str) -> ServiceResult<String> {
    let postnummer = value.trim();
    if postnummer.len() != 4 || !postnummer.chars().all(|c| c.is_ascii_digit()) {
        return Err(ServiceError::validation("postnummer", "må bestå av 4 siffer"));
    }
    Ok(postnummer.to_string())
}

pub fn validate_epost(value: &str) -> ServiceResult<String> {
    let epost = value.trim().to_lowercase();
    if !EPOST_REGEX.is_match(&epost) {
        return Err(ServiceError::validation("epost", "er ikke en gyldig e-postadresse"));
    }
    Ok(epost)
}

/// Blob-safe filename: ASCII letters, digits, dot, dash and underscore
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    let cleaned = FILENAME_UNSAFE.replace_all(base, "_");
    let cleaned = cleaned.trim_matches(|c: char| c == '_' || c == '.');
    if cleaned.is_empty() {
        return "fil".to_string();
    }
    cleaned.chars().take(MAX_FILENAME_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  Nordic\u{0000} Bygg\t AS \u{200B}"), "Nordic Bygg AS");
    }

    #[test]
    fn test_require_text() {
        assert!(require_text("navn", "   ").is_err());
        assert_eq!(require_text("navn", " Fjord ").unwrap(), "Fjord");
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn test_orgnr() {
        assert_eq!(validate_orgnr("987 654 321").unwrap(), "987654321");
        assert!(validate_orgnr("98765432").is_err());
        assert!(validate_orgnr("98765432A").is_err());
        let err = validate_orgnr("").unwrap_err();
        assert_eq!(err.to_string(), "organisasjonsnummer: er påkrevd");
    }

    #[test]
    fn test_personident_and_postnummer() {
        assert!(validate_personident("01017012345").is_ok());
        assert!(validate_personident("0101701234").is_err());
        assert!(validate_postnummer("0150").is_ok());
        assert!(validate_postnummer("150").is_err());
    }

    #[test]
    fn test_epost() {
        assert_eq!(validate_epost(" Ola@Megler.NO ").unwrap(), "ola@megler.no");
        assert!(validate_epost("ola.megler.no").is_err());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Kontrakt signert.pdf"), "Kontrakt_signert.pdf");
        assert_eq!(sanitize_filename("C:\\temp\\tilbud (2).docx"), "tilbud_2_.docx");
        assert_eq!(sanitize_filename("Garantibevis_Bjørnstad.pdf"), "Garantibevis_Bj_rnstad.pdf");
        assert_eq!(sanitize_filename("../../"), "fil");
    }
}
