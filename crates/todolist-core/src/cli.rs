use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Args, Parser, Subcommand};
use todolist_shared::{TaskPriority, TaskStatus};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::tasks::UpdateDomainTaskModel;
use crate::todolists::FilterValue;

#[derive(Debug, Clone)]
pub struct PreprocessedArgs {
    pub cleaned_args: Vec<OsString>,
    pub rc_overrides: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "todo",
    version,
    about = "Todo lists and tasks against a remote todolist service",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "todorc", global = true)]
    pub todorc: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show all lists
    Lists,
    /// Create a list
    AddList { title: String },
    /// Delete a list and its tasks
    RmList { list_id: String },
    /// Rename a list
    RenameList { list_id: String, title: String },
    /// Show a list's tasks through a filter
    Filter {
        list_id: String,
        #[arg(value_parser = parse_filter)]
        filter: FilterValue,
    },
    /// Show a list's tasks
    Tasks { list_id: String },
    /// Create a task in a list
    AddTask { list_id: String, title: String },
    /// Delete a task
    RmTask { list_id: String, task_id: String },
    /// Change some fields of a task
    UpdateTask {
        list_id: String,
        task_id: String,
        #[command(flatten)]
        fields: TaskFieldArgs,
    },
}

impl Command {
    /// List whose tasks must be loaded before the command runs.
    pub fn list_scope(&self) -> Option<&str> {
        match self {
            Command::Lists | Command::AddList { .. } | Command::RmList { .. } => None,
            Command::RenameList { list_id, .. }
            | Command::Filter { list_id, .. }
            | Command::Tasks { list_id }
            | Command::AddTask { list_id, .. }
            | Command::RmTask { list_id, .. }
            | Command::UpdateTask { list_id, .. } => Some(list_id),
        }
    }
}

/// At least one field must be given.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
#[group(required = true, multiple = true)]
pub struct TaskFieldArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, value_parser = parse_status)]
    pub status: Option<TaskStatus>,
    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<TaskPriority>,
    #[arg(long = "start-date")]
    pub start_date: Option<String>,
    #[arg(long)]
    pub deadline: Option<String>,
}

impl From<TaskFieldArgs> for UpdateDomainTaskModel {
    fn from(args: TaskFieldArgs) -> Self {
        Self {
            title: args.title,
            description: args.description,
            status: args.status,
            priority: args.priority,
            start_date: args.start_date,
            deadline: args.deadline,
        }
    }
}

fn parse_filter(s: &str) -> Result<FilterValue, String> {
    s.parse()
}

fn parse_status(s: &str) -> Result<TaskStatus, String> {
    s.parse()
}

fn parse_priority(s: &str) -> Result<TaskPriority, String> {
    s.parse()
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[tracing::instrument(skip_all)]
pub fn preprocess_args(raw: &[OsString]) -> anyhow::Result<PreprocessedArgs> {
    let mut cleaned = Vec::with_capacity(raw.len());
    let mut overrides: Vec<(String, String)> = Vec::new();

    let mut iter = raw.iter().cloned();
    if let Some(bin) = iter.next() {
        cleaned.push(bin);
    }

    for arg in iter {
        let s = arg.to_string_lossy();
        if let Some(rest) = s.strip_prefix("rc.") {
            let parsed = if let Some((k, v)) = rest.split_once('=') {
                Some((format!("rc.{k}"), v.to_string()))
            } else if let Some((k, v)) = rest.split_once(':') {
                Some((format!("rc.{k}"), v.to_string()))
            } else {
                None
            };

            if let Some((k, v)) = parsed {
                debug!(key = %k, "captured positional rc override");
                overrides.push((k, v));
                continue;
            }
        }

        cleaned.push(arg);
    }

    Ok(PreprocessedArgs {
        cleaned_args: cleaned,
        rc_overrides: overrides,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn positional_rc_overrides_are_lifted_out() {
        let pre = preprocess_args(&os(&["todo", "rc.sync.policy=literal", "lists", "rc.color:off"]))
            .expect("preprocess");
        assert_eq!(pre.cleaned_args, os(&["todo", "lists"]));
        assert_eq!(
            pre.rc_overrides,
            vec![
                ("rc.sync.policy".to_string(), "literal".to_string()),
                ("rc.color".to_string(), "off".to_string()),
            ]
        );
    }

    #[test]
    fn positional_override_values_stay_out_of_logs() {
        let logs = crate::log_capture::capture(|| {
            let pre = preprocess_args(&os(&["todo", "rc.api.key=s3cr3t-key", "lists"]))
                .expect("preprocess");
            assert_eq!(pre.rc_overrides.len(), 1);
        });
        assert!(logs.contains("rc.api.key"), "{logs}");
        assert!(!logs.contains("s3cr3t-key"), "{logs}");
    }

    #[test]
    fn update_task_fields_parse() {
        let cli = GlobalCli::parse_from(os(&[
            "todo",
            "update-task",
            "L1",
            "T1",
            "--status",
            "done",
            "--priority",
            "high",
        ]));
        let Some(Command::UpdateTask {
            list_id,
            task_id,
            fields,
        }) = cli.command
        else {
            panic!("expected update-task");
        };
        assert_eq!(list_id, "L1");
        assert_eq!(task_id, "T1");
        let model = UpdateDomainTaskModel::from(fields);
        assert_eq!(model.status, Some(TaskStatus::Completed));
        assert_eq!(model.priority, Some(TaskPriority::Hi));
        assert!(model.title.is_none());
    }

    #[test]
    fn update_task_without_fields_is_rejected() {
        let parsed = GlobalCli::try_parse_from(os(&["todo", "update-task", "L1", "T1"]));
        assert!(parsed.is_err());

        let parsed =
            GlobalCli::try_parse_from(os(&["todo", "update-task", "L1", "T1", "--title", "x"]));
        assert!(parsed.is_ok());
    }

    #[test]
    fn filter_rejects_unknown_value() {
        let parsed = GlobalCli::try_parse_from(os(&["todo", "filter", "L1", "someday"]));
        assert!(parsed.is_err());
    }

    #[test]
    fn list_scope_names_touched_list() {
        assert_eq!(Command::Lists.list_scope(), None);
        assert_eq!(
            Command::Tasks {
                list_id: "L1".to_string()
            }
            .list_scope(),
            Some("L1")
        );
    }

    #[test]
    fn key_val_requires_equals() {
        assert!("api.key".parse::<KeyVal>().is_err());
        let kv: KeyVal = "api.key = abc".parse().expect("parse");
        assert_eq!(kv.key, "api.key");
        assert_eq!(kv.value, "abc");
    }
}
