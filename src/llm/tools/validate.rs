//! 工具参数校验
//!
//! 反序列化只保证类型正确；数值范围、URL 格式和必填文本在这里检查，
//! 任何一项失败都不会触达存储层。

use url::Url;

use super::ToolError;

pub const DEFAULT_SIGNAL_LIMIT: u32 = 20;

/// 必填文本，去掉首尾空白后不能为空
pub fn required(field: &str, value: &str) -> Result<String, ToolError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ToolError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// 事实类记录必须携带来源 URL
pub fn source_url(value: &str) -> Result<String, ToolError> {
    let value = required("sourceUrl", value)?;
    http_url("sourceUrl", &value)?;
    Ok(value)
}

pub fn optional_url(field: &str, value: Option<String>) -> Result<Option<String>, ToolError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(url) => {
            http_url(field, url)?;
            Ok(Some(url.to_string()))
        }
    }
}

fn http_url(field: &str, value: &str) -> Result<(), ToolError> {
    let parsed = Url::parse(value)
        .map_err(|e| ToolError::Validation(format!("{} is not a valid URL ({}): {}", field, e, value)))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        _ => Err(ToolError::Validation(format!(
            "{} must be an http(s) URL: {}",
            field, value
        ))),
    }
}

/// 传承评分，1-5
pub fn score(field: &str, value: Option<u8>) -> Result<Option<u8>, ToolError> {
    match value {
        Some(v) if !(1..=5).contains(&v) => Err(ToolError::Validation(format!(
            "{} must be between 1 and 5, got {}",
            field, v
        ))),
        other => Ok(other),
    }
}

/// 管线优先级，1-5（5 最高）
pub fn priority(value: u8) -> Result<u8, ToolError> {
    if (1..=5).contains(&value) {
        Ok(value)
    } else {
        Err(ToolError::Validation(format!(
            "priority must be between 1 and 5, got {}",
            value
        )))
    }
}

/// 持股比例，0-100
pub fn percentage(field: &str, value: Option<f64>) -> Result<Option<f64>, ToolError> {
    match value {
        Some(v) if !(0.0..=100.0).contains(&v) => Err(ToolError::Validation(format!(
            "{} must be between 0 and 100, got {}",
            field, v
        ))),
        other => Ok(other),
    }
}

/// 最近信号条数，缺省 20，范围 1-100
pub fn limit(value: Option<u32>) -> Result<usize, ToolError> {
    let value = value.unwrap_or(DEFAULT_SIGNAL_LIMIT);
    if (1..=100).contains(&value) {
        Ok(value as usize)
    } else {
        Err(ToolError::Validation(format!(
            "limit must be between 1 and 100, got {}",
            value
        )))
    }
}

/// 可选文本，空白视为未提交
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_url_rules() {
        assert_eq!(
            source_url(" https://example.com/a ").unwrap(),
            "https://example.com/a"
        );
        assert!(source_url("").is_err());
        assert!(source_url("   ").is_err());
        assert!(source_url("example.com/news").is_err());
        assert!(source_url("ftp://example.com/file").is_err());
        assert!(source_url("mailto:ken@example.com").is_err());
    }

    #[test]
    fn test_ranges() {
        assert_eq!(score("scoreTenure", Some(5)).unwrap(), Some(5));
        assert_eq!(score("scoreTenure", None).unwrap(), None);
        assert!(score("scoreTenure", Some(0)).is_err());
        assert!(score("scoreTenure", Some(6)).is_err());

        assert!(priority(1).is_ok());
        assert!(priority(6).is_err());

        assert!(percentage("ownershipPercentage", Some(100.0)).is_ok());
        assert!(percentage("ownershipPercentage", Some(-1.0)).is_err());
    }

    #[test]
    fn test_limit_defaults_and_bounds() {
        assert_eq!(limit(None).unwrap(), 20);
        assert_eq!(limit(Some(100)).unwrap(), 100);
        assert!(limit(Some(0)).is_err());
        assert!(limit(Some(101)).is_err());
    }

    #[test]
    fn test_optional_values() {
        assert_eq!(optional_url("website", Some(" ".to_string())).unwrap(), None);
        assert!(optional_url("website", Some("not a url".to_string())).is_err());
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(Some(" note ".to_string())).as_deref(), Some("note"));
    }
}
