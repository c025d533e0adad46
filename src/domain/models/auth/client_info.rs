//! 요청 발신자 정보 (IP, User-Agent)
//!
//! 활동 로그에 남기기 위한 값이며 인증 판단에는 사용하지 않습니다.

use std::convert::Infallible;
use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpRequest};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    pub fn from_http_request(req: &HttpRequest) -> Self {
        Self {
            ip_address: extract_client_ip(req),
            user_agent: header_value(req, "User-Agent"),
        }
    }
}

impl FromRequest for ClientInfo {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(ClientInfo::from_http_request(req)))
    }
}

/// 프록시 헤더를 우선으로 클라이언트 IP를 찾습니다.
///
/// X-Forwarded-For(첫 번째 값) → X-Real-IP → CF-Connecting-IP → 소켓 주소 순서입니다.
fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    if let Some(forwarded) = header_value(req, "X-Forwarded-For") {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return Some(first.to_string());
            }
        }
    }

    header_value(req, "X-Real-IP")
        .or_else(|| header_value(req, "CF-Connecting-IP"))
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .insert_header(("User-Agent", "curl/8.0"))
            .to_http_request();

        let info = ClientInfo::from_http_request(&req);

        assert_eq!(info.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(info.user_agent.as_deref(), Some("curl/8.0"));
    }

    #[test]
    fn test_real_ip_fallback() {
        let req = TestRequest::default()
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .to_http_request();

        assert_eq!(
            ClientInfo::from_http_request(&req).ip_address.as_deref(),
            Some("198.51.100.2")
        );
    }
}
