//! CLI interface for the bridge.
//!
//! One invocation publishes one draft:
//! settings → draft → title → publish → log.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::{DEFAULT_CONFIG_PATH, Settings};
use crate::draft::{Draft, read_draft};
use crate::error::Result;
use crate::github::Forge;
use crate::logbook;
use crate::publish::{PublishResult, publish};

/// Publish the draft in the communication drop to GitHub and log it.
#[derive(Debug, Parser)]
#[command(name = "comm-bridge", version)]
pub struct Cli {
    /// Repository root. Config, source and log paths are resolved against it.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Override file (JSON, or TOML by `.toml` extension).
    /// Defaults to `comm/bridge.config.json` under the root.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the extracted title and draft without publishing.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        let path = self.config.as_deref().unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
        self.root.join(path)
    }
}

/// What a successful run did.
#[derive(Debug)]
pub enum Outcome {
    Published(PublishResult),
    DryRun { title: String, body: String },
}

/// Run the pipeline. `connect` builds the forge once the draft is ready;
/// nothing touches the network before it succeeds.
pub fn run<F, C>(cli: &Cli, connect: C) -> Result<Outcome>
where
    F: Forge,
    C: FnOnce(&Settings) -> Result<F>,
{
    let settings = Settings::load(&cli.config_path());
    let (owner, repo) = settings.owner_and_repo()?;
    tracing::info!(%owner, %repo, mode = ?settings.mode, "resolved settings");

    let draft = read_draft(&cli.root.join(&settings.source_path))?;

    if cli.dry_run {
        return Ok(Outcome::DryRun {
            title: draft.title(),
            body: draft.body().to_string(),
        });
    }

    let forge = connect(&settings)?;
    let log_path = cli.root.join(&settings.log_path);
    let published = publish_and_log(&forge, &settings, &draft, &log_path)?;
    Ok(Outcome::Published(published))
}

/// Publish, then record. A log failure leaves the publication in place.
fn publish_and_log(
    forge: &impl Forge,
    settings: &Settings,
    draft: &Draft,
    log_path: &Path,
) -> Result<PublishResult> {
    let published = publish(forge, settings, draft)?;
    tracing::info!(channel = %published.channel, url = %published.url, "published");
    logbook::append_entry(log_path, &published.channel, &published.url, draft.body())?;
    Ok(published)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    use crate::error::BridgeError;
    use crate::github::{DiscussionCategory, GitHubClient};
    use crate::publish::tests::{FakeForge, announcements};

    const DROP: &str = "# External Communication Module\n\n\
        ## Draft\nLaunch v2\nDetails follow.\n\n## Notes\nskip\n";

    fn workspace(config: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        let comm = dir.path().join("comm");
        fs::create_dir_all(&comm).unwrap();
        fs::write(comm.join("direct_drop.md"), DROP).unwrap();
        fs::write(comm.join("bridge.config.json"), config).unwrap();
        dir
    }

    fn cli(dir: &TempDir) -> Cli {
        Cli {
            root: dir.path().to_path_buf(),
            config: None,
            dry_run: false,
        }
    }

    fn log_of(dir: &TempDir) -> Option<String> {
        fs::read_to_string(dir.path().join("comm/logs/_index.md")).ok()
    }

    const ACME: &str =
        r#"{"repo": "acme/site", "mode": "discussion", "discussion_category": "Announcements"}"#;

    #[test]
    fn publishes_discussion_and_logs_it() {
        let dir = workspace(ACME);
        let url = "https://github.com/acme/site/discussions/5";

        let outcome =
            run(&cli(&dir), |_| Ok(FakeForge::new(announcements(), Some(url)))).unwrap();

        let Outcome::Published(result) = outcome else {
            panic!("expected a publication");
        };
        assert_eq!(result.channel, "Discussion (Announcements)");
        assert_eq!(result.url, url);

        let log = log_of(&dir).unwrap();
        assert!(log.contains(&format!("| Channel: Discussion (Announcements) | Link: {url}\n")));
        assert!(log.contains("  Text: Launch v2 Details follow.\n"));
    }

    #[test]
    fn fallback_issue_is_logged_as_such() {
        let dir = workspace(ACME);
        let general = vec![DiscussionCategory {
            id: 1,
            name: "General".into(),
        }];
        let url = "https://github.com/acme/site/issues/8";

        run(&cli(&dir), |_| Ok(FakeForge::new(general, Some(url)))).unwrap();

        assert!(log_of(&dir).unwrap().contains("| Channel: Issue (fallback) |"));
    }

    #[test]
    fn missing_credential_writes_no_log() {
        let dir = workspace(ACME);

        let err = run(&cli(&dir), |settings| GitHubClient::new(None, &settings.api_url))
            .unwrap_err();

        assert!(matches!(err, BridgeError::MissingCredential));
        assert_eq!(log_of(&dir), None);
    }

    #[test]
    fn connect_sees_configured_api_url() {
        let dir = workspace(
            r#"{"repo": "acme/site", "mode": "issue", "api_url": "https://ghe.example/api/v3"}"#,
        );
        let mut seen = None;

        run(&cli(&dir), |settings| {
            seen = Some(settings.api_url.clone());
            Ok(FakeForge::new(Vec::new(), Some("https://ghe.example/acme/site/issues/1")))
        })
        .unwrap();

        assert_eq!(seen.as_deref(), Some("https://ghe.example/api/v3"));
        assert!(log_of(&dir).unwrap().contains("| Channel: Issue |"));
    }

    #[test]
    fn dry_run_never_connects() {
        let dir = workspace(ACME);
        let cli = Cli {
            dry_run: true,
            ..cli(&dir)
        };

        let outcome = run(&cli, |_| -> Result<FakeForge> {
            panic!("dry run must not connect")
        })
        .unwrap();

        match outcome {
            Outcome::DryRun { title, body } => {
                assert_eq!(title, "Launch v2");
                assert_eq!(body, "Launch v2\nDetails follow.");
            }
            Outcome::Published(_) => panic!("dry run published"),
        }
        assert_eq!(log_of(&dir), None);
    }

    #[test]
    fn default_repo_placeholder_still_validates() {
        // The built-in placeholder is well-formed; the remote call is what fails.
        let dir = workspace("{}");
        let mut repo = String::new();

        let err = run(&cli(&dir), |settings| {
            repo.clone_from(&settings.repo);
            GitHubClient::new(None, &settings.api_url)
        })
        .unwrap_err();

        assert!(matches!(err, BridgeError::MissingCredential));
        assert_eq!(repo, "your-user-or-org/your-repo");
    }

    #[test]
    fn malformed_repo_fails_before_reading_source() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("comm")).unwrap();
        fs::write(dir.path().join("comm/bridge.config.json"), r#"{"repo": "acme"}"#).unwrap();

        let err = run(&cli(&dir), |_| Ok(FakeForge::new(Vec::new(), None))).unwrap_err();

        assert!(matches!(err, BridgeError::MissingConfigValue(_)));
    }

    #[test]
    fn missing_source_file() {
        let dir = TempDir::new().unwrap();
        let cli = Cli {
            config: Some(PathBuf::from("settings.toml")),
            ..cli(&dir)
        };
        fs::write(dir.path().join("settings.toml"), "repo = \"acme/site\"\n").unwrap();

        let err = run(&cli, |_| Ok(FakeForge::new(Vec::new(), None))).unwrap_err();

        assert!(matches!(err, BridgeError::MissingSourceFile(_)));
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "comm-bridge",
            "--root",
            "/srv/site",
            "--config",
            "b.toml",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.root, PathBuf::from("/srv/site"));
        assert_eq!(cli.config_path(), PathBuf::from("/srv/site/b.toml"));
        assert!(cli.dry_run);
    }
}
