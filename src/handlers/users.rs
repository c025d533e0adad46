//! # Account HTTP Handlers
//!
//! 로그인한 사용자 본인의 계정 엔드포인트입니다. 모두 `AuthMiddleware::required()`
//! 스코프 아래에 등록되며, 주체는 [`AuthenticatedUser`] extractor로 받습니다.
//!
//! | Method | Path | 동작 |
//! |--------|------|------|
//! | GET | `/users/me` | 프로필 조회 |
//! | PUT | `/users/me` | 프로필 수정 |
//! | GET | `/users/me/activity` | 최근 활동 기록 (`?limit=20`) |
//! | PUT | `/users/me/password` | 비밀번호 변경 |
//! | POST | `/users/me/verify-phone` | 전화번호 OTP 인증 |
//! | DELETE | `/users/me` | 탈퇴 (INACTIVE 전환) |

use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::context::AppContext;
use crate::core::errors::AppError;
use crate::domain::dto::users::{
    ActivityQuery, ChangePasswordRequest, UpdateProfileRequest, VerifyPhoneRequest,
};
use crate::domain::dto::ApiResponse;
use crate::domain::models::auth::{AuthenticatedUser, ClientInfo};

#[get("/me")]
pub async fn get_me(
    context: web::Data<AppContext>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let profile = context.users.get_profile(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(profile)))
}

/// 프로필 수정
///
/// 전화번호를 바꾸면 전화번호 인증을 다시 받아야 합니다.
#[put("/me")]
pub async fn update_me(
    context: web::Data<AppContext>,
    user: AuthenticatedUser,
    client: ClientInfo,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let profile = context
        .users
        .update_profile(&user.user_id, payload.into_inner(), &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(profile, "프로필이 수정되었습니다")))
}

#[get("/me/activity")]
pub async fn get_my_activity(
    context: web::Data<AppContext>,
    user: AuthenticatedUser,
    query: web::Query<ActivityQuery>,
) -> Result<HttpResponse, AppError> {
    let activities = context
        .users
        .recent_activity(&user.user_id, query.limit)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(activities)))
}

/// 비밀번호 변경
///
/// 현재 비밀번호가 틀리면 `INVALID_PASSWORD`(400)입니다. 이미 발급된 토큰은
/// 사용자 지문이 바뀌므로 다음 요청부터 거부됩니다.
#[put("/me/password")]
pub async fn change_password(
    context: web::Data<AppContext>,
    user: AuthenticatedUser,
    client: ClientInfo,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    context
        .identity
        .change_password(&user.user_id, payload.into_inner(), &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("비밀번호가 변경되었습니다")))
}

#[post("/me/verify-phone")]
pub async fn verify_phone(
    context: web::Data<AppContext>,
    user: AuthenticatedUser,
    client: ClientInfo,
    payload: web::Json<VerifyPhoneRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let profile = context
        .identity
        .verify_phone_number(&user.user_id, &payload.otp, &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(profile, "전화번호 인증이 완료되었습니다")))
}

#[delete("/me")]
pub async fn delete_me(
    context: web::Data<AppContext>,
    user: AuthenticatedUser,
    client: ClientInfo,
) -> Result<HttpResponse, AppError> {
    context.users.deactivate_user(&user.user_id, &client).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("계정이 비활성화되었습니다")))
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use super::*;
    use crate::domain::entities::users::Role;
    use crate::middlewares::AuthMiddleware;
    use crate::test_support::{Harness, TEST_PASSWORD};

    macro_rules! users_app {
        ($h:expr) => {
            test::init_service(
                App::new().app_data(web::Data::new($h.context())).service(
                    web::scope("/users")
                        .wrap(AuthMiddleware::required())
                        .service(get_me)
                        .service(update_me)
                        .service(get_my_activity)
                        .service(change_password)
                        .service(verify_phone)
                        .service(delete_me),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_get_me_returns_profile() {
        let h = Harness::new();
        let user = h.seed_user("me@x.com", Some("me"), None, Role::User).await;
        let pair = h.tokens.generate_token_pair(&user).unwrap();
        let app = users_app!(h);

        let req = test::TestRequest::get()
            .uri("/users/me")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["email"], "me@x.com");
        assert_eq!(body["data"]["username"], "me");
        assert!(body["data"].get("passwordHash").is_none());
    }

    #[actix_web::test]
    async fn test_update_me_and_read_activity() {
        let h = Harness::new();
        let user = h.seed_user("me@x.com", None, None, Role::User).await;
        let pair = h.tokens.generate_token_pair(&user).unwrap();
        let app = users_app!(h);

        let req = test::TestRequest::put()
            .uri("/users/me")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .set_json(json!({ "fullName": "New Name", "profileImageUrl": "https://cdn.test/me.png" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["fullName"], "New Name");
        assert_eq!(body["data"]["profileImageUrl"], "https://cdn.test/me.png");

        let req = test::TestRequest::get()
            .uri("/users/me/activity?limit=5")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["action"], "PROFILE_UPDATED");
    }

    #[actix_web::test]
    async fn test_update_me_rejects_bad_phone() {
        let h = Harness::new();
        let user = h.seed_user("me@x.com", None, None, Role::User).await;
        let pair = h.tokens.generate_token_pair(&user).unwrap();
        let app = users_app!(h);

        let req = test::TestRequest::put()
            .uri("/users/me")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .set_json(json!({ "phone": "call me" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_change_password_invalidates_old_token() {
        let h = Harness::new();
        let user = h.seed_user("me@x.com", None, None, Role::User).await;
        let pair = h.tokens.generate_token_pair(&user).unwrap();
        let app = users_app!(h);

        let req = test::TestRequest::put()
            .uri("/users/me/password")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .set_json(json!({ "currentPassword": TEST_PASSWORD, "newPassword": "N3w!Passw0rd" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        let req = test::TestRequest::get()
            .uri("/users/me")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);
    }

    #[actix_web::test]
    async fn test_change_password_with_wrong_current_password() {
        let h = Harness::new();
        let user = h.seed_user("me@x.com", None, None, Role::User).await;
        let pair = h.tokens.generate_token_pair(&user).unwrap();
        let app = users_app!(h);

        let req = test::TestRequest::put()
            .uri("/users/me/password")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .set_json(json!({ "currentPassword": "Wr0ng!pass", "newPassword": "N3w!Passw0rd" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_PASSWORD");
    }

    #[actix_web::test]
    async fn test_delete_me_deactivates_account() {
        let h = Harness::new();
        let user = h.seed_user("me@x.com", None, None, Role::User).await;
        let pair = h.tokens.generate_token_pair(&user).unwrap();
        let app = users_app!(h);

        let req = test::TestRequest::delete()
            .uri("/users/me")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        let req = test::TestRequest::get()
            .uri("/users/me")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);
    }
}
