//! 메일/SMS 본문 템플릿

pub const SERVICE_NAME: &str = "IdeaSpark";

fn layout(accent: &str, title: &str, name: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset='UTF-8'></head>\
         <body style='font-family: Arial, sans-serif;'>\
         <div style='max-width: 600px; margin: 0 auto; padding: 20px;'>\
         <h1 style='color: {accent};'>{title}</h1>\
         <p>Hi {name},</p>{body}\
         <p>Best regards,<br>The {SERVICE_NAME} Team</p>\
         </div></body></html>"
    )
}

fn code_box(otp: &str, background: &str, color: &str) -> String {
    format!(
        "<div style='background: {background}; padding: 20px; text-align: center; border-radius: 8px; margin: 20px 0;'>\
         <h2 style='color: {color}; margin: 0; font-size: 32px; letter-spacing: 8px;'>{otp}</h2></div>"
    )
}

pub fn email_verification(name: &str, otp: &str, ttl_minutes: i64) -> (String, String) {
    let body = format!(
        "<p>Please use the following OTP to verify your email address:</p>{}\
         <p>This OTP will expire in {} minutes.</p>\
         <p>If you didn't request this verification, please ignore this email.</p>",
        code_box(otp, "#F3F4F6", "#1F2937"),
        ttl_minutes
    );

    (
        format!("Verify Your Email - {}", SERVICE_NAME),
        layout("#4F46E5", "Verify Your Email", name, &body),
    )
}

pub fn password_reset(name: &str, otp: &str, ttl_minutes: i64) -> (String, String) {
    let body = format!(
        "<p>You requested to reset your password. Please use the following OTP:</p>{}\
         <p>This OTP will expire in {} minutes.</p>\
         <p>If you didn't request this password reset, please ignore this email and ensure your account is secure.</p>",
        code_box(otp, "#FEF2F2", "#DC2626"),
        ttl_minutes
    );

    (
        format!("Password Reset OTP - {}", SERVICE_NAME),
        layout("#4F46E5", "Password Reset Request", name, &body),
    )
}

pub fn account_blocked(name: &str, reason: &str) -> (String, String) {
    let body = format!(
        "<p>Your {SERVICE_NAME} account has been suspended.</p>\
         <p><strong>Reason:</strong> {reason}</p>\
         <p>If you believe this action was taken in error, please contact our support team.</p>"
    );

    (
        format!("Account Status Update - {}", SERVICE_NAME),
        layout("#DC2626", "Account Status Update", name, &body),
    )
}

pub fn phone_verification_sms(otp: &str, ttl_minutes: i64) -> String {
    format!(
        "Your {} phone verification OTP is: {}. This code will expire in {} minutes. Do not share this code with anyone.",
        SERVICE_NAME, otp, ttl_minutes
    )
}

pub fn password_reset_sms(otp: &str, ttl_minutes: i64) -> String {
    format!(
        "Your {} password reset OTP is: {}. This code will expire in {} minutes. If you didn't request this, please ignore.",
        SERVICE_NAME, otp, ttl_minutes
    )
}

pub fn generic_otp(otp: &str) -> String {
    format!("Your OTP is: {}", otp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_embed_code_and_expiry() {
        let (subject, html) = password_reset("Alice", "123456", 5);
        assert!(subject.starts_with("Password Reset OTP"));
        assert!(html.contains("123456"));
        assert!(html.contains("Hi Alice"));
        assert!(html.contains("5 minutes"));

        let sms = phone_verification_sms("654321", 10);
        assert!(sms.contains("654321"));
        assert!(sms.contains("10 minutes"));
    }
}
