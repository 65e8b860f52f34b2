use std::path::Path;

use anyhow::{Context, Result};
use pushover::PushOptions;
use serde::Deserialize;

use crate::cli::Args;

/// Defaults read from the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub app_key: String,
    #[serde(default)]
    pub user_group_key: String,
}

/// Load settings from a JSON file on disk. A missing file means no defaults.
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no settings file, using empty defaults");
        return Ok(Settings::default());
    }
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    parse_settings(&data).with_context(|| format!("parsing {}", path.display()))
}

/// Parse settings from raw JSON bytes.
pub fn parse_settings(data: &[u8]) -> Result<Settings, serde_json::Error> {
    serde_json::from_slice(data)
}

/// Everything needed for one push, after flags and defaults are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub app_key: String,
    pub title: String,
    pub message: String,
    pub options: PushOptions,
}

fn pick(flag: Option<&str>, fallback: &str) -> String {
    match flag {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

/// Merge flags over settings and check the required values are present.
pub fn resolve(args: &Args, settings: &Settings) -> Result<Job> {
    let app_key = pick(args.from.as_deref(), &settings.app_key);
    let user_key = pick(args.user.as_deref(), &settings.user_group_key);
    let title = args.title.clone().unwrap_or_default();
    let message = args.message.clone().unwrap_or_default();

    if app_key.is_empty() {
        anyhow::bail!("no app key: pass --from, set PUSHOVER_APP_KEY or appKey in the settings file");
    }
    if user_key.is_empty() {
        anyhow::bail!(
            "no user key: pass --user, set PUSHOVER_USER_KEY or userGroupKey in the settings file"
        );
    }
    if title.is_empty() {
        anyhow::bail!("no title: pass --title");
    }
    if message.is_empty() {
        anyhow::bail!("no message: pass --message");
    }

    let mut options = PushOptions::to(user_key).html(args.html());
    options.url = args.url.clone().unwrap_or_default();
    options.url_title = args.url_title.clone().unwrap_or_default();
    options.priority = args.priority;
    options.sound = args.sound;

    Ok(Job {
        app_key,
        title,
        message,
        options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn args(flags: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("sendpush").chain(flags.iter().copied())).unwrap()
    }

    fn defaults() -> Settings {
        Settings {
            app_key: "cfg-app".into(),
            user_group_key: "cfg-user".into(),
        }
    }

    #[test]
    fn test_parse_settings() {
        let settings = parse_settings(br#"{"appKey":"a1","userGroupKey":"u1","Logging":{}}"#).unwrap();
        assert_eq!(settings.app_key, "a1");
        assert_eq!(settings.user_group_key, "u1");
    }

    #[test]
    fn test_parse_settings_partial() {
        let settings = parse_settings(br#"{"appKey":"a1"}"#).unwrap();
        assert_eq!(settings.user_group_key, "");
    }

    #[test]
    fn test_parse_settings_malformed() {
        assert!(parse_settings(b"{not valid json").is_err());
    }

    #[test]
    fn test_load_settings_missing_file() {
        let settings = load_settings("/nonexistent/appsettings.json").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_settings_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"appKey":"file-app","userGroupKey":"file-user"}"#)
            .unwrap();
        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.app_key, "file-app");
        assert_eq!(settings.user_group_key, "file-user");
    }

    #[test]
    fn test_load_settings_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"appKey = nope").unwrap();
        let err = load_settings(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing"));
    }

    #[test]
    fn test_resolve_uses_settings() {
        let job = resolve(&args(&["-t", "T", "-m", "M"]), &defaults()).unwrap();
        assert_eq!(job.app_key, "cfg-app");
        assert_eq!(job.options.recipients, "cfg-user");
        assert!(!job.options.html);
    }

    #[test]
    fn test_resolve_flags_take_precedence() {
        let job = resolve(
            &args(&["-t", "T", "-m", "M", "-f", "flag-app", "-u", "flag-user", "-p", "html"]),
            &defaults(),
        )
        .unwrap();
        assert_eq!(job.app_key, "flag-app");
        assert_eq!(job.options.recipients, "flag-user");
        assert!(job.options.html);
    }

    #[test]
    fn test_resolve_empty_flag_falls_back() {
        let job = resolve(&args(&["-t", "T", "-m", "M", "-u", ""]), &defaults()).unwrap();
        assert_eq!(job.options.recipients, "cfg-user");
    }

    #[test]
    fn test_resolve_missing_values() {
        let err = resolve(&args(&["-t", "T", "-m", "M"]), &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("app key"));

        let settings = Settings {
            app_key: "a".into(),
            ..Default::default()
        };
        let err = resolve(&args(&["-t", "T", "-m", "M"]), &settings).unwrap_err();
        assert!(err.to_string().contains("user key"));

        let err = resolve(&args(&["-m", "M"]), &defaults()).unwrap_err();
        assert!(err.to_string().contains("title"));

        let err = resolve(&args(&["-t", "T"]), &defaults()).unwrap_err();
        assert!(err.to_string().contains("message"));
    }

    #[test]
    fn test_resolve_link_and_priority() {
        let job = resolve(
            &args(&[
                "-t", "T", "-m", "M", "--url", "https://example.com", "--url-title", "Example",
                "--priority", "emergency",
            ]),
            &defaults(),
        )
        .unwrap();
        assert_eq!(job.options.url, "https://example.com");
        assert_eq!(job.options.url_title, "Example");
        assert_eq!(job.options.priority, Some(pushover::Priority::Emergency));
        assert_eq!(job.options.sound, None);
    }
}
