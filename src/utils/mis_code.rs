//! MIS 码：课表时段的短标识，2 个大写字母 + 3 个数字

use rand::Rng;

pub const MIS_CODE_LEN: usize = 5;

/// 随机生成一个 MIS 码，唯一性由插入时的主键冲突保证
pub fn generate_mis_code() -> String {
    let mut rng = rand::rng();
    let mut code = String::with_capacity(MIS_CODE_LEN);
    for _ in 0..2 {
        code.push(rng.random_range(b'A'..=b'Z') as char);
    }
    for _ in 0..3 {
        code.push(rng.random_range(b'0'..=b'9') as char);
    }
    code
}

pub fn is_valid_mis_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == MIS_CODE_LEN
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_match_format() {
        for _ in 0..500 {
            let code = generate_mis_code();
            assert!(is_valid_mis_code(&code), "bad code {code}");
        }
    }

    #[test]
    fn test_format_check() {
        assert!(is_valid_mis_code("AB123"));
        assert!(!is_valid_mis_code("ab123"));
        assert!(!is_valid_mis_code("A1234"));
        assert!(!is_valid_mis_code("AB12"));
        assert!(!is_valid_mis_code("AB1234"));
    }
}
