use crate::types::*;

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}

impl PushOptions {
    /// Check a title/message pair and these options against the API limits.
    ///
    /// Rules run in a fixed order and the first violation is returned.
    pub fn validate(&self, title: &str, message: &str) -> PushResult<()> {
        if self.recipients.is_empty() {
            return Err(PushError::invalid("recipients", "recipients must be supplied"));
        }

        if self.recipients.split(',').count() > MAX_RECIPIENTS {
            return Err(PushError::invalid(
                "recipients",
                "recipients exceeded the maximum of 50",
            ));
        }

        if !is_blank(title) && char_len(title) > MAX_TITLE_LEN {
            return Err(PushError::invalid("title", "title is limited to 250 characters"));
        }

        if is_blank(message) {
            return Err(PushError::invalid("message", "message must be supplied"));
        }

        if char_len(message) > MAX_MESSAGE_LEN {
            return Err(PushError::invalid(
                "message",
                "message is limited to 1024 characters",
            ));
        }

        // A link title is meaningless without the link itself.
        if !is_blank(&self.url_title) && is_blank(&self.url) {
            return Err(PushError::invalid(
                "url",
                "url must be supplied when url_title is set",
            ));
        }

        if !is_blank(&self.url_title) && char_len(&self.url_title) > MAX_URL_TITLE_LEN {
            return Err(PushError::invalid(
                "url_title",
                "url_title is limited to 100 characters",
            ));
        }

        if !is_blank(&self.url) && char_len(&self.url) > MAX_URL_LEN {
            return Err(PushError::invalid("url", "url is limited to 512 characters"));
        }

        Ok(())
    }
}

impl PushRequest {
    /// Validate and shape a message from the options form.
    pub fn build(
        token: &str,
        title: &str,
        message: &str,
        options: &PushOptions,
    ) -> PushResult<PushRequest> {
        Self::build_for_device(token, title, message, options, "")
    }

    /// Validate and shape a message from the legacy single-recipient form.
    ///
    /// An empty `user_key` falls back to `default_user_key`; if neither is
    /// set the call fails before anything else is checked.
    pub fn build_legacy(
        token: &str,
        default_user_key: Option<&str>,
        title: &str,
        message: &str,
        user_key: &str,
        device: &str,
        html: bool,
    ) -> PushResult<PushRequest> {
        let user = if user_key.is_empty() {
            default_user_key.unwrap_or_default()
        } else {
            user_key
        };

        if user.is_empty() {
            return Err(PushError::invalid("user_key", "user key must be supplied"));
        }

        let options = PushOptions::to(user).html(html);
        Self::build_for_device(token, title, message, &options, device)
    }

    fn build_for_device(
        token: &str,
        title: &str,
        message: &str,
        options: &PushOptions,
        device: &str,
    ) -> PushResult<PushRequest> {
        options.validate(title, message)?;

        Ok(PushRequest {
            token: token.to_string(),
            user: options.recipients.clone(),
            device: non_empty(device),
            title: non_empty(title),
            message: message.to_string(),
            html: if options.html { "1" } else { "0" },
            url: non_empty(&options.url),
            url_title: non_empty(&options.url_title),
            priority: options.priority.unwrap_or_default(),
            sound: options.sound.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: PushResult<PushRequest>) -> &'static str {
        result.unwrap_err().field().expect("validation error")
    }

    fn keys(n: usize) -> String {
        (0..n).map(|i| format!("user{}", i)).collect::<Vec<_>>().join(",")
    }

    #[test]
    fn test_build_defaults() {
        let req = PushRequest::build("app", "Server Down", "Database unreachable", &PushOptions::to("userkey123"))
            .unwrap();
        assert_eq!(req.user(), "userkey123");
        assert_eq!(req.title(), Some("Server Down"));
        assert_eq!(req.message(), "Database unreachable");
        assert!(!req.is_html());
        assert_eq!(req.priority(), Priority::Normal);
        assert_eq!(req.sound(), Sound::Pushover);
        assert_eq!(req.url(), None);
        assert_eq!(req.device(), None);
    }

    #[test]
    fn test_build_carries_options() {
        let opts = PushOptions::to("a,b")
            .html(true)
            .link("https://status.example.com", "Status")
            .priority(Priority::High)
            .sound(Sound::Siren);
        let req = PushRequest::build("app", "", "msg", &opts).unwrap();
        assert!(req.is_html());
        assert_eq!(req.title(), None);
        assert_eq!(req.url(), Some("https://status.example.com"));
        assert_eq!(req.url_title(), Some("Status"));
        assert_eq!(req.priority(), Priority::High);
        assert_eq!(req.sound(), Sound::Siren);
        assert_eq!(req.recipient_count(), 2);
    }

    #[test]
    fn test_empty_recipients() {
        assert_eq!(field_of(PushRequest::build("app", "t", "m", &PushOptions::default())), "recipients");
    }

    #[test]
    fn test_recipient_limit() {
        assert!(PushRequest::build("app", "t", "m", &PushOptions::to(keys(50))).is_ok());
        assert_eq!(field_of(PushRequest::build("app", "t", "m", &PushOptions::to(keys(51)))), "recipients");
    }

    #[test]
    fn test_title_limit() {
        let opts = PushOptions::to("u");
        assert!(PushRequest::build("app", &"t".repeat(250), "m", &opts).is_ok());
        assert_eq!(field_of(PushRequest::build("app", &"t".repeat(251), "m", &opts)), "title");
    }

    #[test]
    fn test_limits_count_characters_not_bytes() {
        let opts = PushOptions::to("u");
        assert!(PushRequest::build("app", &"é".repeat(250), &"ü".repeat(1024), &opts).is_ok());
    }

    #[test]
    fn test_message_required() {
        let opts = PushOptions::to("u").link("https://example.com", "ok");
        assert_eq!(field_of(PushRequest::build("app", "t", "", &opts)), "message");
        assert_eq!(field_of(PushRequest::build("app", "t", "  \n", &opts)), "message");
    }

    #[test]
    fn test_message_limit() {
        let opts = PushOptions::to("u");
        assert!(PushRequest::build("app", "t", &"m".repeat(1024), &opts).is_ok());
        assert_eq!(field_of(PushRequest::build("app", "t", &"m".repeat(1025), &opts)), "message");
    }

    #[test]
    fn test_url_title_requires_url() {
        let opts = PushOptions::to("u").link("", "Click here");
        assert_eq!(field_of(PushRequest::build("app", "t", "m", &opts)), "url");
    }

    #[test]
    fn test_url_title_limit() {
        let opts = PushOptions::to("u").link("https://example.com", "x".repeat(101));
        assert_eq!(field_of(PushRequest::build("app", "t", "m", &opts)), "url_title");
    }

    #[test]
    fn test_url_limit() {
        let url = format!("https://example.com/{}", "p".repeat(500));
        let opts = PushOptions::to("u").link(url, "");
        assert_eq!(field_of(PushRequest::build("app", "t", "m", &opts)), "url");
    }

    #[test]
    fn test_rule_order_recipients_first() {
        // Every rule is broken; the recipient check wins.
        let opts = PushOptions::to(keys(60)).link("", "x".repeat(200));
        assert_eq!(field_of(PushRequest::build("app", &"t".repeat(300), "", &opts)), "recipients");
    }

    #[test]
    fn test_legacy_uses_explicit_key() {
        let req = PushRequest::build_legacy("app", Some("default"), "t", "m", "explicit", "phone", true).unwrap();
        assert_eq!(req.user(), "explicit");
        assert_eq!(req.device(), Some("phone"));
        assert!(req.is_html());
    }

    #[test]
    fn test_legacy_falls_back_to_default_key() {
        let req = PushRequest::build_legacy("app", Some("default"), "t", "m", "", "", false).unwrap();
        assert_eq!(req.user(), "default");
        assert_eq!(req.device(), None);
    }

    #[test]
    fn test_legacy_without_any_key() {
        assert_eq!(field_of(PushRequest::build_legacy("app", None, "t", "m", "", "", false)), "user_key");
        assert_eq!(field_of(PushRequest::build_legacy("app", Some(""), "t", "m", "", "", false)), "user_key");
    }

    #[test]
    fn test_legacy_shares_message_rules() {
        assert_eq!(field_of(PushRequest::build_legacy("app", None, "t", "", "u", "", false)), "message");
    }
}
