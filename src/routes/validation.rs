use serde::{Deserialize, Deserializer};

use crate::response::AppError;

pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const WORD_TEXT_MAX_CHARS: usize = 200;
pub const WORD_MEANING_MAX_CHARS: usize = 500;

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub fn name(value: Option<&str>) -> Result<String, AppError> {
    let trimmed = value.unwrap_or_default().trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("이름을 입력해주세요"));
    }
    if trimmed.chars().count() > NAME_MAX_CHARS {
        return Err(AppError::validation(format!(
            "이름은 {NAME_MAX_CHARS}자 이하여야 합니다"
        )));
    }
    Ok(trimmed.to_string())
}

/// Blank descriptions are stored as `NULL`.
pub fn description(value: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(AppError::validation(format!(
            "설명은 {DESCRIPTION_MAX_CHARS}자 이하여야 합니다"
        )));
    }
    Ok(Some(trimmed.to_string()).filter(|v| !v.is_empty()))
}

pub fn word_text(value: Option<&str>) -> Result<String, AppError> {
    let trimmed = value.unwrap_or_default().trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("단어를 입력해주세요"));
    }
    if trimmed.chars().count() > WORD_TEXT_MAX_CHARS {
        return Err(AppError::validation(format!(
            "단어는 {WORD_TEXT_MAX_CHARS}자 이하여야 합니다"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn word_meaning(value: Option<&str>) -> Result<String, AppError> {
    let trimmed = value.unwrap_or_default().trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("뜻을 입력해주세요"));
    }
    if trimmed.chars().count() > WORD_MEANING_MAX_CHARS {
        return Err(AppError::validation(format!(
            "뜻은 {WORD_MEANING_MAX_CHARS}자 이하여야 합니다"
        )));
    }
    Ok(trimmed.to_string())
}

/// Empty ids are treated as "no reference".
pub fn optional_id(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_name_rules() {
        assert_eq!(name(Some("  Basics ")).unwrap(), "Basics");
        assert_eq!(name(None).unwrap_err().status(), StatusCode::BAD_REQUEST);
        assert!(name(Some("   ")).is_err());
        assert!(name(Some(&"가".repeat(NAME_MAX_CHARS))).is_ok());
        assert!(name(Some(&"가".repeat(NAME_MAX_CHARS + 1))).is_err());
    }

    #[test]
    fn test_description_rules() {
        assert_eq!(description(None).unwrap(), None);
        assert_eq!(description(Some("  ")).unwrap(), None);
        assert_eq!(description(Some(" notes ")).unwrap().as_deref(), Some("notes"));
        let err = description(Some(&"x".repeat(DESCRIPTION_MAX_CHARS + 1))).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_word_rules() {
        assert_eq!(word_text(Some(" run ")).unwrap(), "run");
        assert!(word_text(Some("")).is_err());
        assert!(word_meaning(None).is_err());
        assert!(word_meaning(Some(&"뜻".repeat(WORD_MEANING_MAX_CHARS + 1))).is_err());
    }

    #[test]
    fn test_double_option() {
        #[derive(Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "double_option")]
            folder_id: Option<Option<String>>,
        }

        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.folder_id, None);
        let cleared: Patch = serde_json::from_str(r#"{"folder_id":null}"#).unwrap();
        assert_eq!(cleared.folder_id, Some(None));
        let set: Patch = serde_json::from_str(r#"{"folder_id":"f1"}"#).unwrap();
        assert_eq!(set.folder_id, Some(Some("f1".to_string())));
    }

    #[test]
    fn test_optional_id() {
        assert_eq!(optional_id(Some(" ")), None);
        assert_eq!(optional_id(Some(" a ")).as_deref(), Some("a"));
    }
}
