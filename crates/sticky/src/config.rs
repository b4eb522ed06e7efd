use crate::cli::Cli;
use crate::context;
use anyhow::{anyhow, Result};
use comment_core::{Credential, DiscussionRef, DEFAULT_IDENTITY};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map, Value},
    Figment, Metadata, Profile, Provider,
};
use github_backend::DEFAULT_API_URL;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

const LOCAL_CONFIG_FILE_NAME: &str = ".sticky-comment.toml";

/// Name of the credential input, as declared by the action
pub const TOKEN_INPUT: &str = "github-token";

/// Runner-provided variables and the config keys they feed
const PLATFORM_ENV: &[(&str, &str)] = &[
    ("GITHUB_TOKEN", "token"),
    ("GITHUB_REPOSITORY", "repository"),
    ("GITHUB_SHA", "sha"),
    ("GITHUB_API_URL", "api_url"),
    ("GITHUB_EVENT_PATH", "event_path"),
];

/// Configuration merged from defaults, files, environment and action inputs
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default, deserialize_with = "lenient_string")]
    pub token: Option<String>,
    /// `owner/repo`
    #[serde(default, deserialize_with = "lenient_string")]
    pub repository: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub number: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sha: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub api_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub identity: Option<u64>,
    #[serde(default, deserialize_with = "lenient_path")]
    pub event_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            repository: None,
            number: None,
            sha: None,
            api_url: Some(DEFAULT_API_URL.to_string()),
            identity: Some(DEFAULT_IDENTITY),
            event_path: None,
        }
    }
}

/// Everything a run needs, validated
#[derive(Debug)]
pub struct Settings {
    pub credential: Credential,
    pub discussion: DiscussionRef,
    pub sha: Option<String>,
    pub api_url: String,
    pub identity: u64,
}

impl Config {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(config_path) {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        let platform_keys: Vec<&str> = PLATFORM_ENV.iter().map(|(var, _)| *var).collect();
        figment = figment
            .merge(TextEnv(
                Env::raw()
                    .only(&platform_keys)
                    .map(|key| platform_key(key.as_str()).into()),
            ))
            .merge(TextEnv(Env::prefixed("STICKY_")))
            // Actions exposes `with:` inputs as INPUT_<NAME>, keeping dashes.
            // Dashed names are merged last so `github-token` beats `github_token`.
            .merge(TextEnv(action_inputs(false)))
            .merge(TextEnv(action_inputs(true)));

        figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    pub fn merge_with_cli(&mut self, cli: &Cli) {
        if let Some(token) = &cli.token {
            self.token = Some(token.clone());
        }
        if let Some(repo) = &cli.repo {
            self.repository = Some(repo.clone());
        }
        if let Some(number) = cli.number {
            self.number = Some(number);
        }
        if let Some(sha) = &cli.sha {
            self.sha = Some(sha.clone());
        }
        if let Some(api_url) = &cli.api_url {
            self.api_url = Some(api_url.clone());
        }
        if let Some(identity) = cli.identity {
            self.identity = Some(identity);
        }
    }

    /// Validate into run settings. The credential is checked before anything else.
    pub fn into_settings(self) -> Result<Settings> {
        let credential = Credential::new(TOKEN_INPUT, self.token.as_deref()).map_err(|e| {
            anyhow!(
                "{}. Set via --token, the {} input, GITHUB_TOKEN env var, or config file",
                e,
                TOKEN_INPUT
            )
        })?;

        let repository = non_empty(self.repository).ok_or_else(|| {
            anyhow!("Repository not configured. Set via --repo, GITHUB_REPOSITORY env var, or config file")
        })?;

        let number = match self.number {
            Some(number) => number,
            None => context::number_from_event(self.event_path.as_deref())?,
        };

        let discussion = DiscussionRef::parse_repository(&repository, number)?;

        Ok(Settings {
            credential,
            discussion,
            sha: non_empty(self.sha),
            api_url: non_empty(self.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            identity: self.identity.unwrap_or(DEFAULT_IDENTITY),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn platform_key(var: &str) -> String {
    PLATFORM_ENV
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(var))
        .map(|(_, key)| key.to_string())
        .unwrap_or_else(|| var.to_ascii_lowercase())
}

/// `INPUT_*` variables whose names do or do not contain a dash
fn action_inputs(dashed: bool) -> Env {
    Env::prefixed("INPUT_")
        .filter(move |key| key.as_str().contains('-') == dashed)
        .map(|key| input_key(key.as_str()).into())
}

/// An `Env` whose values all stay text; `Env` itself parses numbers and booleans.
struct TextEnv(Env);

impl Provider for TextEnv {
    fn metadata(&self) -> Metadata {
        self.0.metadata()
    }

    fn data(&self) -> figment::error::Result<Map<Profile, Dict>> {
        let dict: Dict = self
            .0
            .iter()
            .map(|(key, value)| (key.as_str().to_ascii_lowercase(), Value::from(value)))
            .collect();
        Ok(Profile::Default.collect(dict))
    }
}

/// Map an input name (`github-token`, `GITHUB_TOKEN`, `api-url`) to a config key
fn input_key(name: &str) -> String {
    let key = name.to_ascii_lowercase().replace('-', "_");
    match key.as_str() {
        "github_token" => "token".to_string(),
        "repo" => "repository".to_string(),
        _ => key,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

/// Accept text, numbers or booleans as text
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Bool(b) => b.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Signed(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
    }))
}

fn lenient_path<'de, D>(deserializer: D) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.map(PathBuf::from))
}

/// Accept numbers given as integers or strings; blank strings mean unset
fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid number '{}'", text))),
    }
}

fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sticky-comment").map(|d| d.config_dir().join("config.toml"))
}

fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(LOCAL_CONFIG_FILE_NAME))
}
