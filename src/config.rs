use crate::error::{Error, Result};
use serde::Deserialize;
use std::{env, str::FromStr, time::Duration};

const NOTIFIER_CONFIG: &str = "NOTIFIER_CONFIG";
const REPORT_TEMPLATE: &str = "REPORT_TEMPLATE";
const GITLAB_BASE_URL: &str = "GITLAB_BASE_URL";
const GITLAB_BEARER: &str = "GITLAB_BEARER";
const SLACK_BASE_URL: &str = "SLACK_BASE_URL";
const SLACK_BEARER: &str = "SLACK_BEARER";
const LOG_LEVEL: &str = "LOG_LEVEL";
const RUN_TIMEOUT: &str = "RUN_TIMEOUT";

const DEFAULT_LOG_LEVEL: log::Level = log::Level::Info;

pub struct Config {
    pub notifiers: Vec<Subscription>,
    pub report_template: String,
    pub gitlab: EndpointConfig,
    pub slack: EndpointConfig,
    pub log_level: log::Level,
    /// Upper bound for a whole run, in seconds.
    pub run_timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Subscription {
    pub channel: String,
    #[serde(default, deserialize_with = "project_ids")]
    pub projects: Vec<String>,
}

/// Project keys may be numeric ids or namespaced paths.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectKey {
    Path(String),
    Id(u64),
}

impl From<ProjectKey> for String {
    fn from(key: ProjectKey) -> Self {
        match key {
            ProjectKey::Path(path) => path,
            ProjectKey::Id(id) => id.to_string(),
        }
    }
}

fn project_ids<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let keys = Vec::<ProjectKey>::deserialize(deserializer)?;
    Ok(keys.into_iter().map(Into::into).collect())
}

pub struct EndpointConfig {
    pub base_url: String,
    pub bearer: String,
}

#[derive(Deserialize)]
struct NotifierConfig {
    notifiers: Vec<Subscription>,
}

impl Config {
    pub fn load() -> Result<Config> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| Error::config(format!("{} must be set", key)))
        };

        let log_level = match lookup(LOG_LEVEL).filter(|value| !value.trim().is_empty()) {
            Some(level) => log::Level::from_str(level.trim())
                .map_err(|_| Error::config(format!("unknown {}: {}", LOG_LEVEL, level)))?,
            None => DEFAULT_LOG_LEVEL,
        };

        let run_timeout = match lookup(RUN_TIMEOUT).filter(|value| !value.trim().is_empty()) {
            Some(secs) => match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(Error::config(format!(
                        "{} must be a positive number of seconds",
                        RUN_TIMEOUT
                    )))
                }
            },
            None => None,
        };

        let notifiers = parse_notifiers(&required(NOTIFIER_CONFIG)?)?;

        Ok(Config {
            notifiers,
            report_template: required(REPORT_TEMPLATE)?,
            gitlab: EndpointConfig {
                base_url: required(GITLAB_BASE_URL)?,
                bearer: required(GITLAB_BEARER)?,
            },
            slack: EndpointConfig {
                base_url: required(SLACK_BASE_URL)?,
                bearer: required(SLACK_BEARER)?,
            },
            log_level,
            run_timeout,
        })
    }
}

/// Parses the subscription list. YAML is accepted as well as JSON.
fn parse_notifiers(raw: &str) -> Result<Vec<Subscription>> {
    let config = serde_yaml::from_str::<NotifierConfig>(raw)
        .map_err(|err| Error::config(format!("cannot parse {}: {}", NOTIFIER_CONFIG, err)))?;

    for notifier in &config.notifiers {
        if notifier.channel.trim().is_empty() {
            return Err(Error::config("notifier channel must not be empty"));
        }
        if notifier.projects.iter().any(|project| project.trim().is_empty()) {
            return Err(Error::config(format!(
                "channel {} lists an empty project id",
                notifier.channel
            )));
        }
    }

    Ok(config.notifiers)
}
