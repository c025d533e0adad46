//! 아이덴티티 서비스 메인 애플리케이션
//!
//! MongoDB/Redis 연결, 서비스 그래프(`AppContext`) 조립, 백그라운드 작업 시작,
//! 그리고 Actix-web HTTP 서버 구동을 담당합니다.

use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use identity_service_backend::caching::redis::RedisClient;
use identity_service_backend::config::{Environment, RateLimitConfig, ServerConfig};
use identity_service_backend::core::AppContext;
use identity_service_backend::db::Database;
use identity_service_backend::jobs::JobScheduler;
use identity_service_backend::routes::configure_all_routes;
use identity_service_backend::utils::display_terminal::StartupSummary;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let (profile, env_loaded) = load_env_file();
    init_logging();

    match env_loaded {
        Ok(()) => info!("Current profile: {} (env 파일 로드 됨)", profile),
        Err(e) => error!("Current profile: {} (env 파일 로드 실패: {})", profile, e),
    }

    info!("🚀 아이덴티티 서비스 시작중...");

    let (database, redis_client) = initialize_data_stores().await?;

    let context = AppContext::from_infrastructure(database, redis_client)
        .await
        .map_err(|e| {
            error!("서비스 초기화 실패: {}", e);
            std::io::Error::other(e.to_string())
        })?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    let scheduler = Arc::new(JobScheduler::new(context.clone()));
    let (otp_cleanup_every, block_sweep_every) = scheduler.intervals();
    let _jobs = scheduler.start();

    let bind_address = ServerConfig::bind_address();
    let workers = ServerConfig::workers();

    StartupSummary {
        bind_address: &bind_address,
        environment: &format!("{:?}", Environment::current()),
        workers,
        otp_cleanup_every,
        block_sweep_every,
    }
    .print();

    start_http_server(context, &bind_address, workers).await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 미들웨어 순서 (바깥 → 안쪽): NormalizePath → Logger → CORS → Governor → 라우트
///
/// # Errors
///
/// * `std::io::Error` - 포트 바인딩 실패, Rate Limit 설정 오류, 서버 실행 오류
async fn start_http_server(context: AppContext, bind_address: &str, workers: usize) -> std::io::Result<()> {
    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);
    info!("📍 API: http://{}/api/v1", bind_address);

    let rate_limit_config = RateLimitConfig::from_env();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| {
            error!("Rate Limiting 설정이 올바르지 않습니다: {:?}", rate_limit_config);
            std::io::Error::other("invalid rate limit configuration")
        })?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second,
        rate_limit_config.burst_size
    );

    let app_context = web::Data::new(context);
    let cors_origins = ServerConfig::cors_allowed_origins();

    HttpServer::new(move || {
        let cors = configure_cors(&cors_origins);

        App::new()
            .app_data(app_context.clone())
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .workers(workers)
    .run()
    .await
}

/// `PROFILE`에 맞는 .env 파일을 로드합니다
///
/// `dev`(기본) → .env.dev, `prod` → .env.prod, 그 외 → .env
///
/// 로거 초기화 전에 호출되므로 결과는 반환해서 초기화 후에 기록합니다.
fn load_env_file() -> (String, Result<(), dotenv::Error>) {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    let loaded = match profile.as_str() {
        "prod" => dotenv::from_filename(".env.prod").map(|_| ()),
        "dev" => dotenv::from_filename(".env.dev").map(|_| ()),
        _ => dotenv().map(|_| ()),
    };

    (profile, loaded)
}

/// `RUST_LOG` 기반 로깅 초기화 (기본값: "info,actix_web=debug")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// MongoDB와 Redis 연결을 초기화합니다
///
/// 둘 중 하나라도 연결에 실패하면 서버를 띄우지 않습니다.
async fn initialize_data_stores() -> std::io::Result<(Arc<Database>, Arc<RedisClient>)> {
    info!("📡 데이터베이스 연결 중...");

    let database = Database::connect().await.map_err(|e| {
        error!("MongoDB 연결 실패: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    info!("✅ MongoDB 연결 성공");

    let redis_client = RedisClient::connect().await.map_err(|e| {
        error!("Redis 연결 실패: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    info!("✅ Redis 연결 성공");

    Ok((Arc::new(database), Arc::new(redis_client)))
}

/// CORS 설정을 구성합니다
///
/// 허용 Origin은 `CORS_ALLOWED_ORIGINS`에서 읽고, 없으면 localhost:3000/8080입니다.
fn configure_cors(origins: &[String]) -> Cors {
    let cors = origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin));

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        // Preflight 요청 캐시 시간 (초)
        .max_age(3600)
}
