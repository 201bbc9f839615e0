//! Rendering of the verification-code email.

use std::fmt::{self, Display};

use crate::mailer::OutboundEmail;

/// Verification email for one issued code. `Display` renders the HTML body;
/// `into_outbound` packages subject, text, and HTML for the mail port.
pub struct VerificationCodeEmail<'a> {
    pub name: &'a str,
    pub code: &'a str,
}

impl VerificationCodeEmail<'_> {
    pub const SUBJECT: &'static str = "Your verification code";

    pub fn text_body(&self) -> String {
        format!(
            "Hi {},\n\n\
             Your verification code is: {}\n\n\
             Enter it within 15 minutes to confirm this email address. \
             The code works once; requesting a new one replaces it.\n\n\
             If you didn't create an account, you can ignore this message.\n",
            self.name, self.code
        )
    }

    pub fn into_outbound(self, to: &str) -> OutboundEmail {
        OutboundEmail {
            to: to.to_string(),
            subject: Self::SUBJECT.to_string(),
            text: self.text_body(),
            html: self.to_string(),
        }
    }
}

impl Display for VerificationCodeEmail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Confirm your email address</title>
</head>
<body style="margin:0;background:#f4f4f5;font-family:Arial,Helvetica,sans-serif;">
  <table role="presentation" width="100%" cellpadding="0" cellspacing="0">
    <tr>
      <td align="center" style="padding:32px 16px;">
        <table role="presentation" width="480" cellpadding="0" cellspacing="0"
               style="background:#ffffff;border-radius:6px;padding:32px;">
          <tr>
            <td style="color:#18181b;font-size:18px;font-weight:bold;padding-bottom:16px;">
              Hi {name}, confirm your email address
            </td>
          </tr>
          <tr>
            <td align="center"
                style="font-size:30px;font-weight:bold;letter-spacing:6px;color:#2563eb;padding:16px 0;">
              {code}
            </td>
          </tr>
          <tr>
            <td style="color:#52525b;font-size:13px;line-height:1.5;padding-top:16px;">
              This code expires in 15 minutes and can be used once.
              Requesting a new code replaces this one.
              Never share it with anyone &mdash; we will never ask for it.
            </td>
          </tr>
        </table>
      </td>
    </tr>
  </table>
</body>
</html>
"#,
            name = self.name,
            code = self.code
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_body_includes_name_and_code() {
        let email = VerificationCodeEmail {
            name: "Dana",
            code: "482913",
        };
        let html = email.to_string();
        assert!(html.contains("Dana"));
        assert!(html.contains("482913"));
    }

    #[test]
    fn test_text_body_mentions_code_and_expiry() {
        let email = VerificationCodeEmail {
            name: "Dana",
            code: "482913",
        };
        let text = email.text_body();
        assert!(text.contains("482913"));
        assert!(text.contains("15 minutes"));
    }

    #[test]
    fn test_outbound_carries_both_bodies() {
        let outbound = VerificationCodeEmail {
            name: "Dana",
            code: "482913",
        }
        .into_outbound("dana@example.com");
        assert_eq!(outbound.to, "dana@example.com");
        assert_eq!(outbound.subject, VerificationCodeEmail::SUBJECT);
        assert!(outbound.text.contains("482913"));
        assert!(outbound.html.contains("482913"));
    }
}
