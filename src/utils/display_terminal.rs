//! 시작 배너 출력
//!
//! 서버가 뜰 때 바인드 주소와 주기 작업 설정을 박스 형태로 보여줍니다.

use std::time::Duration;

/// 박스 내부 폭
const CONTENT_WIDTH: usize = 50;

/// 제목을 박스 3줄로 만듭니다.
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║             IDENTITY SERVICE STARTED             ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn boxed_title(title: &str) -> String {
    let border = "═".repeat(CONTENT_WIDTH);
    format!(
        "╔{}╗\n║{:^width$}║\n╚{}╝",
        border,
        title,
        border,
        width = CONTENT_WIDTH
    )
}

pub struct StartupSummary<'a> {
    pub bind_address: &'a str,
    pub environment: &'a str,
    pub workers: usize,
    pub otp_cleanup_every: Duration,
    pub block_sweep_every: Duration,
}

impl StartupSummary<'_> {
    pub fn render(&self) -> String {
        let mut lines = vec![boxed_title("🔐 IDENTITY SERVICE")];
        lines.push(format!("   ├─ Listen: http://{}", self.bind_address));
        lines.push(format!("   ├─ Environment: {}", self.environment));
        lines.push(format!("   ├─ Workers: {}", self.workers));
        lines.push(format!(
            "   ├─ OTP cleanup: every {}s",
            self.otp_cleanup_every.as_secs()
        ));
        lines.push(format!(
            "   └─ Auto-unblock sweep: every {}s",
            self.block_sweep_every.as_secs()
        ));
        lines.join("\n")
    }

    pub fn print(&self) {
        println!();
        println!("{}", self.render());
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_title_centers_text() {
        let boxed = boxed_title("READY");
        let lines: Vec<&str> = boxed.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].chars().count(), CONTENT_WIDTH + 2);
        assert!(lines[1].contains("READY"));
    }

    #[test]
    fn test_summary_lists_job_intervals() {
        let summary = StartupSummary {
            bind_address: "127.0.0.1:8080",
            environment: "development",
            workers: 4,
            otp_cleanup_every: Duration::from_secs(3600),
            block_sweep_every: Duration::from_secs(300),
        };
        let rendered = summary.render();

        assert!(rendered.contains("http://127.0.0.1:8080"));
        assert!(rendered.contains("every 3600s"));
        assert!(rendered.contains("every 300s"));
    }
}
