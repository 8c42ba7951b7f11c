use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use todolist_shared::{TaskPriority, TaskRecord, TaskStatus};
use unicode_width::UnicodeWidthStr;

use crate::app::{AppState, RequestStatus};
use crate::config::Config;
use crate::store::RootState;
use crate::todolists::{TodolistEntity, visible_tasks};

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color = cfg.get_bool("color").unwrap_or(true);
        Ok(Self { color })
    }

    #[tracing::instrument(skip(self, state))]
    pub fn print_lists(&mut self, state: &RootState) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_lists(&mut out, state)
    }

    #[tracing::instrument(skip(self, state))]
    pub fn print_tasks(&mut self, state: &RootState, list_id: &str) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_tasks(&mut out, state, list_id)
    }

    /// Error signal goes to stderr so table output stays parseable.
    pub fn print_signal(&mut self, app: &AppState) -> anyhow::Result<()> {
        if let Some(error) = app.error.as_deref() {
            let mut err = io::stderr().lock();
            writeln!(err, "{}", self.paint(&format!("error: {error}"), "31"))?;
        }
        Ok(())
    }

    fn write_lists<W: Write>(&self, mut out: W, state: &RootState) -> anyhow::Result<()> {
        let headers = vec![
            "ID".to_string(),
            "Title".to_string(),
            "Filter".to_string(),
            "Status".to_string(),
            "Tasks".to_string(),
        ];

        let rows = state
            .todolists
            .iter()
            .map(|tl| {
                let count = state
                    .tasks
                    .get(&tl.id)
                    .map(|tasks| tasks.len())
                    .unwrap_or_default();
                vec![
                    self.paint(&tl.id, "33"),
                    tl.title.clone(),
                    tl.filter.as_str().to_string(),
                    self.entity_status(tl),
                    count.to_string(),
                ]
            })
            .collect();

        write_table(&mut out, headers, rows)
    }

    fn write_tasks<W: Write>(
        &self,
        mut out: W,
        state: &RootState,
        list_id: &str,
    ) -> anyhow::Result<()> {
        let Some(list) = state.todolist(list_id) else {
            return Err(anyhow!("no list with id {list_id}"));
        };
        let tasks = state
            .tasks
            .get(list_id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        writeln!(out, "{} [{}]", list.title, list.filter.as_str())?;

        let headers = vec![
            "ID".to_string(),
            "Title".to_string(),
            "Status".to_string(),
            "Priority".to_string(),
            "Deadline".to_string(),
        ];

        let rows = visible_tasks(tasks, list.filter)
            .into_iter()
            .map(|task| self.task_row(task))
            .collect();

        write_table(&mut out, headers, rows)
    }

    fn task_row(&self, task: &TaskRecord) -> Vec<String> {
        let status = status_label(task.status);
        let status = if task.status == TaskStatus::Completed {
            self.paint(status, "32")
        } else {
            status.to_string()
        };
        vec![
            self.paint(&task.id, "33"),
            task.title.clone(),
            status,
            priority_label(task.priority).to_string(),
            task.deadline.clone().unwrap_or_default(),
        ]
    }

    fn entity_status(&self, tl: &TodolistEntity) -> String {
        let label = tl.entity_status.as_str();
        match tl.entity_status {
            RequestStatus::Failed => self.paint(label, "31"),
            RequestStatus::Loading => self.paint(label, "36"),
            RequestStatus::Idle | RequestStatus::Succeeded => label.to_string(),
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::New => "new",
        TaskStatus::InProgress => "in-progress",
        TaskStatus::Completed => "completed",
        TaskStatus::Draft => "draft",
    }
}

fn priority_label(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "low",
        TaskPriority::Middle => "middle",
        TaskPriority::Hi => "hi",
        TaskPriority::Urgently => "urgently",
        TaskPriority::Later => "later",
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::tasks::TaskAction;
    use crate::todolists::{FilterValue, TodolistAction};
    use todolist_shared::ListRecord;

    fn plain() -> Renderer {
        Renderer { color: false }
    }

    fn seeded() -> RootState {
        let store = Store::default();
        store.dispatch(TodolistAction::SetTodolists(vec![ListRecord {
            id: "L1".to_string(),
            title: "Работа".to_string(),
            added_date: String::new(),
            order: 0,
        }]));
        for (id, status) in [("T1", TaskStatus::New), ("T2", TaskStatus::Completed)] {
            store.dispatch(TaskAction::AddTask(TaskRecord {
                id: id.to_string(),
                todo_list_id: "L1".to_string(),
                title: format!("task {id}"),
                description: None,
                status,
                priority: TaskPriority::Low,
                start_date: None,
                deadline: None,
                order: 0,
                added_date: String::new(),
            }));
        }
        store.dispatch(TodolistAction::ChangeFilter {
            id: "L1".to_string(),
            filter: FilterValue::Active,
        });
        store.state()
    }

    #[test]
    fn lists_table_counts_tasks() {
        let mut buf = Vec::new();
        plain().write_lists(&mut buf, &seeded()).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("ID"));
        assert!(lines[2].contains("Работа"));
        assert!(lines[2].contains("active"));
        assert!(lines[2].trim_end().ends_with('2'));
    }

    #[test]
    fn tasks_table_applies_list_filter() {
        let mut buf = Vec::new();
        plain()
            .write_tasks(&mut buf, &seeded(), "L1")
            .expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("task T1"));
        assert!(!text.contains("task T2"));
    }

    #[test]
    fn unknown_list_is_an_error() {
        let mut buf = Vec::new();
        assert!(plain().write_tasks(&mut buf, &seeded(), "nope").is_err());
    }

    #[test]
    fn color_setting_reads_as_bool() {
        assert!(Renderer::new(&Config::defaults()).expect("renderer").color);

        let mut cfg = Config::defaults();
        cfg.apply_overrides([("rc.color".to_string(), "off".to_string())]);
        assert!(!Renderer::new(&cfg).expect("renderer").color);
    }

    #[test]
    fn strip_ansi_removes_escape_sequences() {
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m"), "red");
    }
}
