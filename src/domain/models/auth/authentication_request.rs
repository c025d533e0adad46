use crate::domain::entities::users::Role;

/// 인증 미들웨어 동작 모드
#[derive(Debug, Clone, PartialEq)]
pub enum AuthMode {
    /// 유효한 access 토큰이 없으면 거부
    Required,
    /// 토큰이 있으면 검증해서 주입하고, 없거나 잘못되면 익명으로 진행
    Optional,
}

/// 라우트 접근에 필요한 역할
#[derive(Debug, Clone)]
pub enum RequiredRole {
    Single(Role),
    Any(Vec<Role>),
}

impl RequiredRole {
    pub fn is_satisfied(&self, role: Role) -> bool {
        match self {
            RequiredRole::Single(required) => *required == role,
            RequiredRole::Any(required) => required.contains(&role),
        }
    }
}
