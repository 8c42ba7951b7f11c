use std::collections::HashMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};
use std::time::Duration;

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info,
  trace,
  warn
};

use crate::api::{
  ApiConfig,
  DEFAULT_BASE_URL
};
use crate::commands::SyncPolicy;

#[derive(Debug, Clone)]
pub struct Config {
  map: HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Config {
  pub fn defaults() -> Self {
    let mut cfg = Config {
      map:          HashMap::new(),
      loaded_files: vec![]
    };

    cfg.map.insert(
      "api.base_url".to_string(),
      DEFAULT_BASE_URL.to_string()
    );
    cfg.map.insert(
      "api.key".to_string(),
      String::new()
    );
    cfg.map.insert(
      "api.timeout".to_string(),
      "30".to_string()
    );
    cfg.map.insert(
      "sync.policy".to_string(),
      SyncPolicy::default()
        .as_str()
        .to_string()
    );
    cfg.map.insert(
      "notice.hide_after".to_string(),
      "5".to_string()
    );
    cfg.map.insert(
      "color".to_string(),
      "on".to_string()
    );

    cfg
  }

  #[tracing::instrument(skip(
    todorc_override
  ))]
  pub fn load(
    todorc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Self::defaults();

    let todorc = resolve_todorc_path(
      todorc_override
    )?;
    if let Some(path) = todorc {
      info!(todorc = %path.display(), "loading todorc");
      cfg.load_file(&path)?;
    } else {
      warn!(
        "no todorc found; using \
         defaults"
      );
    }

    if cfg
      .get("api.key")
      .is_none_or(|key| key.is_empty())
      && let Ok(key) =
        std::env::var("TODO_API_KEY")
    {
      debug!(
        "api key taken from \
         TODO_API_KEY"
      );
      cfg.map.insert(
        "api.key".to_string(),
        key
      );
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  pub fn get_bool(
    &self,
    key: &str
  ) -> Option<bool> {
    self
      .map
      .get(key)
      .map(|v| parse_bool(v))
  }

  pub fn api_config(
    &self
  ) -> anyhow::Result<ApiConfig> {
    let base_url = self
      .get("api.base_url")
      .unwrap_or_else(|| {
        DEFAULT_BASE_URL.to_string()
      });
    let timeout =
      self.get_secs("api.timeout")?;

    let api = ApiConfig::new(&base_url)
      .with_context(|| {
        format!(
          "invalid api.base_url: \
           {base_url}"
        )
      })?
      .with_api_key(self.get("api.key"))
      .with_timeout(timeout);

    Ok(api)
  }

  pub fn sync_policy(
    &self
  ) -> anyhow::Result<SyncPolicy> {
    match self.get("sync.policy") {
      | Some(raw) => raw
        .parse::<SyncPolicy>()
        .map_err(|e| anyhow!(e)),
      | None => Ok(SyncPolicy::default())
    }
  }

  pub fn notice_hide_after(
    &self
  ) -> anyhow::Result<Duration> {
    self.get_secs("notice.hide_after")
  }

  fn get_secs(
    &self,
    key: &str
  ) -> anyhow::Result<Duration> {
    let raw = self
      .get(key)
      .ok_or_else(|| {
        anyhow!("missing {key}")
      })?;
    let secs: u64 = raw
      .trim()
      .parse()
      .with_context(|| {
        format!(
          "{key} must be a whole \
           number of seconds, got \
           {raw}"
        )
      })?;
    Ok(Duration::from_secs(secs))
  }

  #[tracing::instrument(skip(self))]
  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    self
      .loaded_files
      .push(path.clone());

    let base_dir = path
      .parent()
      .map(|p| p.to_path_buf())
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    for (line_num, raw_line) in
      text.lines().enumerate()
    {
      let mut line = raw_line.trim();
      if line.is_empty()
        || line.starts_with('#')
      {
        continue;
      }

      if let Some((before, _)) =
        line.split_once('#')
      {
        line = before.trim();
      }

      if line.is_empty() {
        continue;
      }

      if let Some(include_rest) =
        line.strip_prefix("include ")
      {
        let include_path =
          resolve_include_path(
            &base_dir,
            include_rest.trim()
          )?;
        debug!(
            file = %path.display(),
            include = %include_path.display(),
            line = line_num + 1,
            "processing include"
        );

        if include_path.exists() {
          self
            .load_file(&include_path)?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            path.display(),
            line_num + 1,
            raw_line
          )
        })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      trace!(key = %key, "loaded config key");
      self.map.insert(key, value);
    }

    Ok(())
  }
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_todorc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(todorc_env) =
    std::env::var("TODORC")
  {
    if todorc_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      todorc_env
    )));
  }

  let Some(home) = dirs::home_dir()
  else {
    warn!(
      "cannot determine home \
       directory"
    );
    return Ok(None);
  };
  let candidate = home.join(".todorc");
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.trim().is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let raw = PathBuf::from(include);
  let expanded = expand_tilde(&raw);
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(s: &str) -> bool {
  matches!(
    s.trim()
      .to_ascii_lowercase()
      .as_str(),
    "1" | "y" | "yes" | "on" | "true"
  )
}
