use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

// 本地手机号 09XXXXXXXXX 或 +639XXXXXXXXX，允许空格和连字符分隔
static CONTACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+63|0)9\d{2}[\s-]?\d{3}[\s-]?\d{4}$").expect("Invalid contact regex")
});

static ACADEMIC_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{4})$").expect("Invalid academic year regex"));

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_contact_number(contact: &str) -> Result<(), &'static str> {
    if !CONTACT_RE.is_match(contact.trim()) {
        return Err("Contact number must look like 09XXXXXXXXX or +639XXXXXXXXX");
    }
    Ok(())
}

pub fn validate_name(name: &str, field: &'static str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    if trimmed.chars().count() > 64 {
        return Err(format!("{field} must be at most 64 characters"));
    }
    Ok(())
}

/// 学年标签：YYYY-YYYY，且第二年 = 第一年 + 1
pub fn validate_academic_year_label(label: &str) -> Result<(), &'static str> {
    let Some(caps) = ACADEMIC_YEAR_RE.captures(label) else {
        return Err("Academic year label must use the YYYY-YYYY format");
    };
    let start: u32 = caps[1].parse().map_err(|_| "Academic year label is invalid")?;
    let end: u32 = caps[2].parse().map_err(|_| "Academic year label is invalid")?;
    if end != start + 1 {
        return Err("Academic year must span two consecutive years");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("juan.delacruz@school.edu.ph").is_ok());
        assert!(validate_email("juan@localhost").is_err());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_contact_number() {
        assert!(validate_contact_number("09171234567").is_ok());
        assert!(validate_contact_number("+639171234567").is_ok());
        assert!(validate_contact_number("0917-123-4567").is_ok());
        assert!(validate_contact_number("12345").is_err());
        assert!(validate_contact_number("08171234567").is_err());
    }

    #[test]
    fn test_name() {
        assert!(validate_name("Juan", "First name").is_ok());
        assert_eq!(
            validate_name("  ", "First name").unwrap_err(),
            "First name is required"
        );
    }

    #[test]
    fn test_academic_year_label() {
        assert!(validate_academic_year_label("2024-2025").is_ok());
        assert!(validate_academic_year_label("2024-2026").is_err());
        assert!(validate_academic_year_label("2024/2025").is_err());
        assert!(validate_academic_year_label("24-25").is_err());
    }
}
