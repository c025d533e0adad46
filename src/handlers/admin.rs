//! # Admin HTTP Handlers
//!
//! 관리자 전용 차단/상태 관리 엔드포인트입니다. `AuthMiddleware::admin()` 스코프
//! 아래에서만 등록되므로 핸들러에 들어온 주체는 항상 ADMIN입니다.
//!
//! - `POST /admin/users/{id}/block` - 차단 (임시/영구)
//! - `DELETE /admin/users/{id}/block` - 차단 해제
//! - `GET /admin/users/{id}/block` - 차단 상세
//! - `GET /admin/blocked-users` - 현재 차단 목록
//! - `PUT /admin/users/{id}/status` - 계정 상태 변경

use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::context::AppContext;
use crate::core::errors::AppError;
use crate::domain::dto::users::{BlockUserRequest, UpdateStatusRequest};
use crate::domain::dto::ApiResponse;
use crate::domain::models::auth::{AuthenticatedUser, ClientInfo};

#[post("/users/{user_id}/block")]
pub async fn block_user(
    context: web::Data<AppContext>,
    admin: AuthenticatedUser,
    client: ClientInfo,
    path: web::Path<String>,
    payload: web::Json<BlockUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let user_id = path.into_inner();

    let record = context
        .blocks
        .block_user(&user_id, &payload, &admin.user_id, &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(record, "사용자가 차단되었습니다")))
}

#[delete("/users/{user_id}/block")]
pub async fn unblock_user(
    context: web::Data<AppContext>,
    admin: AuthenticatedUser,
    client: ClientInfo,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    context
        .blocks
        .unblock_user(&user_id, &admin.user_id, &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("차단이 해제되었습니다")))
}

#[get("/users/{user_id}/block")]
pub async fn get_block_details(
    context: web::Data<AppContext>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let record = context.blocks.get_blocking_details(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(record)))
}

#[get("/blocked-users")]
pub async fn list_blocked_users(context: web::Data<AppContext>) -> Result<HttpResponse, AppError> {
    let records = context.blocks.get_all_blocked_users().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

/// 계정 상태 변경 (ACTIVE / INACTIVE / SUSPENDED)
#[put("/users/{user_id}/status")]
pub async fn update_status(
    context: web::Data<AppContext>,
    admin: AuthenticatedUser,
    client: ClientInfo,
    path: web::Path<String>,
    payload: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    let profile = context
        .users
        .update_user_status(&user_id, payload.status, Some(&admin.user_id), &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(profile, "계정 상태가 변경되었습니다")))
}
