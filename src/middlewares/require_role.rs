/*!
 * 角色访问控制中间件
 *
 * 依赖 RequireJWT 写入请求扩展的 Principal，需包在 JWT 作用域内部：
 *
 * ```rust,ignore
 * web::scope("/api/v1/admin")
 *     .wrap(RequireJWT)
 *     .service(
 *         web::scope("")
 *             .wrap(RequireRole::new_any(UserRole::admin_roles()))
 *             .route("/enrollments", web::get().to(list_enrollments)),
 *     )
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{Principal, UserRole},
};

use super::create_error_response;

/// 角色校验失败的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Denied {
    Anonymous,
    WrongRole,
}

impl Denied {
    fn status(self) -> StatusCode {
        match self {
            Denied::Anonymous => StatusCode::UNAUTHORIZED,
            Denied::WrongRole => StatusCode::FORBIDDEN,
        }
    }

    fn code(self) -> ErrorCode {
        match self {
            Denied::Anonymous => ErrorCode::Unauthorized,
            Denied::WrongRole => ErrorCode::Forbidden,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Denied::Anonymous => "Authentication required",
            Denied::WrongRole => "Access denied",
        }
    }
}

fn check(principal: Option<&Principal>, allowed: &[UserRole]) -> Result<(), Denied> {
    match principal {
        None => Err(Denied::Anonymous),
        Some(p) if allowed.contains(&p.role) => Ok(()),
        Some(_) => Err(Denied::WrongRole),
    }
}

#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<[UserRole]>,
}

impl RequireRole {
    pub fn new(role: &UserRole) -> Self {
        Self {
            allowed: Rc::from([*role]),
        }
    }

    /// 任一角色即可通过
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| **r).collect(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allowed = self.allowed.clone();

        Box::pin(async move {
            let outcome = check(req.extensions().get::<Principal>(), &allowed);

            match outcome {
                Ok(()) => Ok(srv.call(req).await?.map_into_left_body()),
                Err(denied) => {
                    info!(
                        "Role check on {} rejected ({:?}), allowed roles: {:?}",
                        req.path(),
                        denied,
                        allowed
                    );
                    Ok(req.into_response(
                        create_error_response(denied.status(), denied.code(), denied.message())
                            .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: UserRole) -> Principal {
        Principal {
            user_id: 1,
            role,
            account_id: 1,
            first_name: "Ana".to_string(),
            last_name: "Cruz".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    #[test]
    fn test_role_check() {
        let admins = [UserRole::Admin];
        assert_eq!(check(Some(&principal(UserRole::Admin)), &admins), Ok(()));
        assert_eq!(
            check(Some(&principal(UserRole::Student)), &admins),
            Err(Denied::WrongRole)
        );
        assert_eq!(check(None, &admins), Err(Denied::Anonymous));
    }

    #[test]
    fn test_denied_statuses() {
        assert_eq!(Denied::Anonymous.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Denied::WrongRole.status(), StatusCode::FORBIDDEN);
    }
}
