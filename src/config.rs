use std::env;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use clap::ArgMatches;
use yaml_rust2::{Yaml, YamlLoader};

use crate::cache::CacheKind;
use crate::error::{Error, Result};
use crate::steam_api::DEFAULT_API_BASE;

pub const API_KEY_ENV: &str = "STEAM_API_KEY";

const DEFAULT_LISTEN: &str = "127.0.0.1:8080";
const DEFAULT_DB_PATH: &str = "db/dev.sqlite3.db";
const DEFAULT_FILE_PATH: &str = "db/steam_ids.tsv";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub listen: String,
    pub api_key: String,
    pub api_base: String,
    pub cache_kind: CacheKind,
    pub cache_path: PathBuf,
}

/// Values found in the YAML config file; anything absent falls back to the
/// defaults or the command line.
#[derive(Debug, Default)]
struct FileSettings {
    listen: Option<String>,
    api_base: Option<String>,
    api_key_file: Option<PathBuf>,
    cache_kind: Option<CacheKind>,
    cache_path: Option<PathBuf>,
}

fn parse_config_file(contents: &str) -> Result<FileSettings> {
    let docs = YamlLoader::load_from_str(contents)
        .map_err(|e| Error::Config(format!("invalid YAML: {e}")))?;

    let Some(doc) = docs.first() else {
        return Ok(FileSettings::default());
    };

    if !matches!(doc, Yaml::Hash(_)) {
        return Err(Error::Config("config file must be a YAML mapping".to_string()));
    }

    let cache_kind = doc["cache"]["kind"]
        .as_str()
        .map(str::parse::<CacheKind>)
        .transpose()?;

    Ok(FileSettings {
        listen: doc["listen"].as_str().map(String::from),
        api_base: doc["api_base"].as_str().map(String::from),
        api_key_file: doc["api_key_file"].as_str().map(PathBuf::from),
        cache_kind,
        cache_path: doc["cache"]["path"].as_str().map(PathBuf::from),
    })
}

fn read_api_key(path: &Path) -> Result<String> {
    let key = read_to_string(path)
        .map_err(|e| Error::Config(format!("missing API key file {}: {e}", path.display())))?;
    Ok(key.trim().to_string())
}

impl Settings {
    /// Command line beats the config file, which beats `STEAM_API_KEY` and
    /// the built-in defaults.
    pub fn load(matches: &ArgMatches) -> Result<Self> {
        let file = match matches.get_one::<String>("config") {
            Some(path) => parse_config_file(&read_to_string(path).map_err(|e| {
                Error::Config(format!("cannot read config file {path}: {e}"))
            })?)?,
            None => FileSettings::default(),
        };

        let api_key_file = matches
            .get_one::<String>("api_key")
            .map(PathBuf::from)
            .or(file.api_key_file);
        let api_key = match api_key_file {
            Some(path) => read_api_key(&path)?,
            None => env::var(API_KEY_ENV).unwrap_or_default().trim().to_string(),
        };
        if api_key.is_empty() {
            return Err(Error::Config(format!(
                "no Steam API key: pass --api-key, set api_key_file or {API_KEY_ENV}"
            )));
        }

        let cache_kind = match matches.get_one::<String>("cache") {
            Some(kind) => kind.parse()?,
            None => file.cache_kind.unwrap_or(CacheKind::Sqlite),
        };
        let cache_path = matches
            .get_one::<String>("cache_path")
            .map(PathBuf::from)
            .or(file.cache_path)
            .unwrap_or_else(|| match cache_kind {
                CacheKind::File => PathBuf::from(DEFAULT_FILE_PATH),
                _ => PathBuf::from(DEFAULT_DB_PATH),
            });

        Ok(Self {
            listen: matches
                .get_one::<String>("listen")
                .cloned()
                .or(file.listen)
                .unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
            api_key,
            api_base: file.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            cache_kind,
            cache_path,
        })
    }
}
