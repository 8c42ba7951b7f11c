pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
#[cfg(test)]
mod log_capture;
pub mod notification;
pub mod render;
pub mod session;
pub mod store;
pub mod tasks;
pub mod todolists;

use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{
  debug,
  info,
  warn
};

use crate::api::HttpTodolistApi;
use crate::cli::Command;
use crate::commands::Coordinator;
use crate::session::View;
use crate::store::Store;

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<ExitCode> {
  let pre =
    cli::preprocess_args(&raw_args)?;
  let cli = cli::GlobalCli::parse_from(
    pre.cleaned_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting todo CLI"
  );
  debug!(
    keys = ?pre
      .rc_overrides
      .iter()
      .map(|(k, _)| k.as_str())
      .collect::<Vec<_>>(),
    "preprocessed rc overrides"
  );

  let mut cfg = config::Config::load(
    cli.todorc.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );

  let api_config = cfg.api_config()?;
  info!(
    base_url = %api_config.base_url,
    "using todolist service"
  );
  let api =
    HttpTodolistApi::new(api_config)
      .context(
        "failed to build HTTP client"
      )?;
  let policy = cfg.sync_policy()?;
  let hide_after =
    cfg.notice_hide_after()?;
  let mut renderer =
    render::Renderer::new(&cfg)?;

  let command = cli
    .command
    .unwrap_or(Command::Lists);
  let store = Arc::new(Store::default());
  let coordinator = Coordinator::new(
    api,
    Arc::clone(&store),
    policy
  );

  let runtime =
    tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .context(
        "failed to start async runtime"
      )?;
  let outcome = runtime.block_on(async {
    let notices = tokio::spawn(
      notification::run_auto_dismiss(
        Arc::clone(&store),
        hide_after
      )
    );
    let outcome = session::execute(
      &coordinator,
      &command
    )
    .await;
    notices.abort();
    outcome
  });

  let state = store.state();
  let failed = match outcome {
    | Ok(View::Lists) => {
      renderer.print_lists(&state)?;
      false
    }
    | Ok(View::Tasks(list_id)) => {
      renderer
        .print_tasks(&state, &list_id)?;
      false
    }
    | Err(err) => {
      warn!(error = %err, "command did not complete");
      renderer.print_lists(&state)?;
      if state.app.error.is_none() {
        eprintln!("error: {err}");
      }
      true
    }
  };
  renderer.print_signal(&state.app)?;

  info!(
    status = state.app.status.as_str(),
    "done"
  );
  if failed || state.app.error.is_some()
  {
    return Ok(ExitCode::FAILURE);
  }
  Ok(ExitCode::SUCCESS)
}
