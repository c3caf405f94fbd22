//! Builds the transactional emails sent by the auth flows

use super::traits::MailMessage;

/// Composes messages with links pointing at the public web app
#[derive(Debug, Clone)]
pub struct MailComposer {
    app_url: String,
}

impl MailComposer {
    pub fn new(app_url: impl Into<String>) -> Self {
        let app_url = app_url.into();
        Self {
            app_url: app_url.trim_end_matches('/').to_string(),
        }
    }

    fn link(&self, path: &str, token: &str) -> String {
        format!("{}{}?token={}", self.app_url, path, token)
    }

    /// Email address confirmation, also used after an email change
    pub fn verification_email(&self, to: &str, token: &str) -> MailMessage {
        let link = self.link("/auth/new-verification", token);
        MailMessage {
            to: to.to_string(),
            subject: "Confirm your email".to_string(),
            html: format!(r#"<p>Click <a href="{}">here</a> to confirm your email.</p>"#, link),
            text: format!("Confirm your email: {}", link),
        }
    }

    pub fn password_reset_email(&self, to: &str, token: &str) -> MailMessage {
        let link = self.link("/auth/new-password", token);
        MailMessage {
            to: to.to_string(),
            subject: "Reset your password".to_string(),
            html: format!(r#"<p>Click <a href="{}">here</a> to reset your password.</p>"#, link),
            text: format!("Reset your password: {}", link),
        }
    }

    /// For accounts created without a password
    pub fn password_set_email(&self, to: &str, token: &str) -> MailMessage {
        let link = self.link("/auth/set-password", token);
        MailMessage {
            to: to.to_string(),
            subject: "Set your password".to_string(),
            html: format!(r#"<p>Click <a href="{}">here</a> to set a password for your account.</p>"#, link),
            text: format!("Set your password: {}", link),
        }
    }

    pub fn two_factor_email(&self, to: &str, code: &str) -> MailMessage {
        MailMessage {
            to: to.to_string(),
            subject: "Your sign-in code".to_string(),
            html: format!("<p>Your two-factor authentication code: <strong>{}</strong></p>", code),
            text: format!("Your two-factor authentication code: {}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_use_app_url() {
        let composer = MailComposer::new("https://gurmania.com/");

        let verify = composer.verification_email("ana@example.com", "abc");
        assert!(verify.text.contains("https://gurmania.com/auth/new-verification?token=abc"));

        let reset = composer.password_reset_email("ana@example.com", "abc");
        assert!(reset.html.contains("https://gurmania.com/auth/new-password?token=abc"));

        let set = composer.password_set_email("ana@example.com", "abc");
        assert!(set.text.contains("/auth/set-password?token=abc"));
    }

    #[test]
    fn test_two_factor_email_contains_code() {
        let composer = MailComposer::new("http://localhost:3000");
        let message = composer.two_factor_email("ana@example.com", "123456");

        assert_eq!(message.to, "ana@example.com");
        assert!(message.text.ends_with("123456"));
    }
}
