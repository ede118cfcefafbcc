// consent-backend/src/utils/validation.rs

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// UIカラーコード用正規表現（#付き6桁16進数のみ）
pub static HEX_COLOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap());

/// 言語コード用正規表現（小文字ISO-639-1、任意で地域サフィックス）
pub static LANGUAGE_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}(-[a-z0-9]{2,4})?$").unwrap());

/// カラーコードバリデーション
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    if HEX_COLOR_REGEX.is_match(color) {
        Ok(())
    } else {
        let mut error = ValidationError::new("hex_color");
        error.message = Some("must be a 6 hex digit color code".into());
        Err(error)
    }
}

/// 正規化済み言語コードのバリデーション
pub fn validate_language_code(language: &str) -> Result<(), ValidationError> {
    if LANGUAGE_CODE_REGEX.is_match(language) {
        Ok(())
    } else {
        let mut error = ValidationError::new("language_code");
        error.message = Some("must be a lowercase ISO-639-1 language code".into());
        Err(error)
    }
}

/// sameSite属性のバリデーション
pub fn validate_same_site(value: &str) -> Result<(), ValidationError> {
    match value {
        "Strict" | "Lax" | "None" => Ok(()),
        _ => {
            let mut error = ValidationError::new("same_site");
            error.message = Some("must be one of Strict, Lax, None".into());
            Err(error)
        }
    }
}

/// ネストしたValidationErrorsを "ui.primaryColor: message" 形式の一覧に平坦化する
///
/// フィールド名はワイヤ形式（camelCase）に合わせて変換する。
pub fn flatten_validation_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect_errors(errors, "", &mut messages);
    messages.sort();
    messages
}

fn collect_errors(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            to_camel_case(field)
        } else {
            format!("{}.{}", prefix, to_camel_case(field))
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map_or_else(|| "invalid value".to_string(), |m| m.to_string());
                    out.push(format!("{}: {}", path, message));
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_errors(nested, &path, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_errors(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

fn to_camel_case(field: &str) -> String {
    let mut result = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            result.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}
