use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Token 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

// JWT Claims：subject 为登录用户 ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: UserRole,
    pub token_type: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// 使用指定密钥签发 token
pub fn sign_token(
    secret: &str,
    user_id: i64,
    role: UserRole,
    kind: TokenKind,
    ttl: chrono::Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        role,
        token_type: kind,
        exp: (now + ttl).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// 使用指定密钥校验 token 及其类型
pub fn verify_token(
    secret: &str,
    token: &str,
    expected: TokenKind,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?
    .claims;

    if claims.token_type != expected {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }
    Ok(claims)
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    fn generate_access_token(
        user_id: i64,
        role: UserRole,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let ttl = chrono::Duration::minutes(AppConfig::get().jwt.access_token_expiry);
        sign_token(Self::secret(), user_id, role, TokenKind::Access, ttl)
    }

    fn generate_refresh_token(
        user_id: i64,
        role: UserRole,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let ttl = chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry);
        sign_token(Self::secret(), user_id, role, TokenKind::Refresh, ttl)
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: UserRole,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::generate_refresh_token(user_id, role)?,
        })
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        verify_token(Self::secret(), token, TokenKind::Access)
    }

    fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        verify_token(Self::secret(), token, TokenKind::Refresh)
    }

    /// 用 refresh token 换取新的 access token，角色沿用原令牌
    pub fn refresh_access_token(
        refresh_token: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Self::verify_refresh_token(refresh_token)?;
        let user_id = claims
            .user_id()
            .ok_or(jsonwebtoken::errors::ErrorKind::InvalidToken)?;
        Self::generate_access_token(user_id, claims.role)
    }

    // HttpOnly + SameSite=Strict，生产环境附加 Secure
    fn refresh_cookie(value: String, max_age: CookieDuration) -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, value)
            .path("/")
            .max_age(max_age)
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn create_refresh_token_cookie(refresh_token: &str) -> Cookie<'static> {
        let days = AppConfig::get().jwt.refresh_token_expiry;
        Self::refresh_cookie(refresh_token.to_string(), CookieDuration::days(days))
    }

    /// 登出或刷新失败时覆盖浏览器中的 cookie
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Self::refresh_cookie(String::new(), CookieDuration::ZERO)
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_access_token_roundtrip() {
        let token = sign_token(
            SECRET,
            7,
            UserRole::Student,
            TokenKind::Access,
            chrono::Duration::minutes(5),
        )
        .unwrap();

        let claims = verify_token(SECRET, &token, TokenKind::Access).unwrap();
        assert_eq!(claims.user_id(), Some(7));
        assert_eq!(claims.role, UserRole::Student);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let token = sign_token(
            SECRET,
            1,
            UserRole::Admin,
            TokenKind::Refresh,
            chrono::Duration::days(1),
        )
        .unwrap();

        assert!(verify_token(SECRET, &token, TokenKind::Access).is_err());
        assert!(verify_token(SECRET, &token, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign_token(
            SECRET,
            1,
            UserRole::Admin,
            TokenKind::Access,
            chrono::Duration::minutes(5),
        )
        .unwrap();

        assert!(verify_token("another", &token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = sign_token(
            SECRET,
            1,
            UserRole::Student,
            TokenKind::Access,
            chrono::Duration::minutes(-10),
        )
        .unwrap();

        assert!(verify_token(SECRET, &token, TokenKind::Access).is_err());
    }
}
