//! 백그라운드 정리 작업
//!
//! - OTP 만료 레코드 삭제 (`OTP_CLEANUP_INTERVAL_SECS`)
//! - 기한이 지난 임시 차단 자동 해제 (`BLOCK_SWEEP_INTERVAL_SECS`)
//!
//! 각 루프는 실패해도 로그만 남기고 다음 주기에 다시 시도합니다.

use std::sync::Arc;

use log::{error, info};
use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};

use crate::config::{BlockConfig, OtpConfig};
use crate::core::context::AppContext;

pub struct JobScheduler {
    context: AppContext,
    otp_cleanup_every: Duration,
    block_sweep_every: Duration,
}

impl JobScheduler {
    pub fn new(context: AppContext) -> Self {
        Self::with_intervals(
            context,
            Duration::from_secs(OtpConfig::cleanup_interval_secs()),
            Duration::from_secs(BlockConfig::sweep_interval_secs()),
        )
    }

    pub fn with_intervals(context: AppContext, otp_cleanup_every: Duration, block_sweep_every: Duration) -> Self {
        Self {
            context,
            otp_cleanup_every,
            block_sweep_every,
        }
    }

    /// (OTP 정리 주기, 차단 해제 주기)
    pub fn intervals(&self) -> (Duration, Duration) {
        (self.otp_cleanup_every, self.block_sweep_every)
    }

    /// 두 작업을 tokio 태스크로 띄웁니다.
    pub fn start(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        info!(
            "⏱️ 백그라운드 작업 시작: OTP 정리 {}초, 차단 해제 {}초 주기",
            self.otp_cleanup_every.as_secs(),
            self.block_sweep_every.as_secs()
        );

        vec![
            tokio::spawn(Self::otp_cleanup_job(Arc::clone(&self))),
            tokio::spawn(Self::auto_unblock_job(Arc::clone(&self))),
        ]
    }

    async fn otp_cleanup_job(scheduler: Arc<Self>) {
        let mut ticker = interval(scheduler.otp_cleanup_every);

        loop {
            ticker.tick().await;
            scheduler.run_otp_cleanup().await;
        }
    }

    async fn auto_unblock_job(scheduler: Arc<Self>) {
        let mut ticker = interval(scheduler.block_sweep_every);

        loop {
            ticker.tick().await;
            scheduler.run_auto_unblock().await;
        }
    }

    pub async fn run_otp_cleanup(&self) -> u64 {
        match self.context.otp.cleanup_expired().await {
            Ok(count) => {
                info!("OTP 정리 작업: {}건 삭제", count);
                count
            }
            Err(e) => {
                error!("OTP 정리 작업 실패: {}", e);
                0
            }
        }
    }

    pub async fn run_auto_unblock(&self) -> u64 {
        match self.context.blocks.auto_unblock_expired().await {
            Ok(count) => {
                info!("차단 해제 작업: {}건 해제", count);
                count
            }
            Err(e) => {
                error!("차단 해제 작업 실패: {}", e);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::otps::OtpPurpose;
    use crate::test_support::Harness;

    #[tokio::test]
    async fn test_otp_cleanup_removes_expired_records() {
        let h = Harness::new();
        h.otp.send("a@x.com", &OtpPurpose::PasswordReset).await.unwrap();
        h.otps.expire_all();

        let scheduler = JobScheduler::with_intervals(h.context(), Duration::from_secs(60), Duration::from_secs(60));

        assert_eq!(scheduler.run_otp_cleanup().await, 1);
        assert!(h.otps.all().is_empty());
    }

    #[tokio::test]
    async fn test_auto_unblock_with_nothing_to_release() {
        let h = Harness::new();
        let scheduler = JobScheduler::with_intervals(h.context(), Duration::from_secs(60), Duration::from_secs(60));

        assert_eq!(scheduler.run_auto_unblock().await, 0);
    }
}
