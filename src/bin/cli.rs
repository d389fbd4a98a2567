use chrono::NaiveDate;
use critical_path::config::options_from_lookup;
use critical_path::logging::init_logging;
use critical_path::{
    AnalysisOptions, CriticalPathAnalysis, DateRangePolicy, Project, Task, TaskId, analyze,
    analysis_dataframe, load_project_from_json, load_tasks_from_csv, render_table,
    save_project_to_json, save_tasks_to_csv,
};
use std::io::{self, Write};
use tracing::{info, warn};

fn parse_dep_list(s: &str) -> Vec<TaskId> {
    s.split(',')
        .filter(|p| !p.trim().is_empty())
        .filter_map(|p| p.parse::<TaskId>().ok())
        .collect()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn join_ids(ids: &[TaskId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               List tasks\n  add <id> <start> <end> [deps_csv]  Upsert a task (dates YYYY-MM-DD, deps like 1,2,3)\n  delete <id>                        Delete a task\n  critical                           List critical tasks in path order\n  summary                            One-line analysis summary\n  timings                            Table of early/late dates and slack\n  policy <reject|allow>              How to treat end dates before start dates\n  load <json|csv> <path>             Load tasks from disk\n  save <json|csv> <path>             Persist tasks to disk\n  quit|exit                          Exit"
    );
}

fn print_tasks(project: &Project) {
    if project.tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for task in &project.tasks {
        let name = task.name.as_deref().unwrap_or("");
        let deps = join_ids(&task.dependencies);
        println!(
            "{:<8} {:<20} {} .. {}  {:>4}d  deps=[{}]",
            task.id,
            name,
            task.start_date,
            task.end_date,
            task.duration_days(),
            deps
        );
    }
}

struct Session {
    project: Project,
    options: AnalysisOptions,
}

impl Session {
    fn new(options: AnalysisOptions) -> Self {
        Self {
            project: Project::new("cli", ""),
            options,
        }
    }

    fn analyze(&self) -> Option<CriticalPathAnalysis> {
        match analyze(&self.project.tasks, &self.options) {
            Ok(analysis) => {
                info!(
                    tasks = self.project.tasks.len(),
                    duration = analysis.project_duration,
                    "analysis complete"
                );
                Some(analysis)
            }
            Err(e) => {
                warn!(error = %e, "analysis rejected");
                println!("Error: {}", e);
                None
            }
        }
    }

    fn upsert(&mut self, task: Task) {
        match self.project.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.project.tasks.push(task),
        }
    }

    fn delete(&mut self, id: &TaskId) -> bool {
        let before = self.project.tasks.len();
        self.project.tasks.retain(|t| &t.id != id);
        before != self.project.tasks.len()
    }
}

fn main() {
    init_logging(None);
    let options = match options_from_lookup(|key| std::env::var(key).ok()) {
        Ok(options) => options,
        Err(e) => {
            warn!(error = %e, "ignoring analysis options file");
            println!("Error: {}", e);
            AnalysisOptions::default()
        }
    };
    let mut session = Session::new(options);

    println!("Critical Path (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_tasks(&session.project),
            "add" => {
                let id_s = parts.next();
                let start_s = parts.next();
                let end_s = parts.next();
                let deps_s = parts.next();
                match (id_s, start_s, end_s) {
                    (Some(id_s), Some(start_s), Some(end_s)) => {
                        let (Some(start), Some(end)) = (parse_date(start_s), parse_date(end_s))
                        else {
                            println!("Invalid date (YYYY-MM-DD)");
                            continue;
                        };
                        let id: TaskId = match id_s.parse() {
                            Ok(id) => id,
                            Err(never) => match never {},
                        };
                        let deps = deps_s.map(parse_dep_list).unwrap_or_default();
                        session.upsert(Task::new(id.clone(), start, end).with_dependencies(deps));
                        println!("Task {} saved.", id);
                    }
                    _ => println!("Usage: add <id> <YYYY-MM-DD> <YYYY-MM-DD> [deps_csv]"),
                }
            }
            "delete" => match parts.next() {
                Some(id_s) => {
                    let id: TaskId = match id_s.parse() {
                        Ok(id) => id,
                        Err(never) => match never {},
                    };
                    if session.delete(&id) {
                        println!("Deleted task {}.", id);
                    } else {
                        println!("Task {} not found.", id);
                    }
                }
                None => println!("Usage: delete <id>"),
            },
            "critical" => {
                if let Some(analysis) = session.analyze() {
                    let chain = analysis.critical_chain();
                    if chain.is_empty() {
                        println!("Critical tasks: (none)");
                    } else {
                        let ids = chain
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(", ");
                        println!("Critical tasks: {}", ids);
                    }
                }
            }
            "summary" => {
                if let Some(analysis) = session.analyze() {
                    println!("{}", analysis.summary().to_cli_summary());
                }
            }
            "timings" => {
                if let Some(analysis) = session.analyze() {
                    match analysis_dataframe(&session.project.tasks, &analysis) {
                        Ok(df) => println!("{}", render_table(&df)),
                        Err(e) => println!("Error: {}", e),
                    }
                }
            }
            "policy" => match parts.next().map(str::parse::<DateRangePolicy>) {
                Some(Ok(policy)) => {
                    session.options.date_range_policy = policy;
                    println!("Date range policy: {}", policy.as_str());
                }
                Some(Err(e)) => println!("Error: {}", e),
                None => println!(
                    "Usage: policy <reject|allow> (current: {})",
                    session.options.date_range_policy.as_str()
                ),
            },
            "save" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some("json"), Some(p)) => match save_project_to_json(&session.project, p) {
                        Ok(_) => println!("Tasks saved to {}", p),
                        Err(e) => println!("Error: {}", e),
                    },
                    (Some("csv"), Some(p)) => match save_tasks_to_csv(&session.project.tasks, p) {
                        Ok(_) => println!("Tasks saved to {}", p),
                        Err(e) => println!("Error: {}", e),
                    },
                    _ => println!("Usage: save <json|csv> <path>"),
                }
            }
            "load" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some("json"), Some(p)) => match load_project_from_json(p) {
                        Ok(project) => {
                            session.project = project;
                            println!("Tasks loaded from {}", p);
                        }
                        Err(e) => println!("Error: {}", e),
                    },
                    (Some("csv"), Some(p)) => match load_tasks_from_csv(p) {
                        Ok(tasks) => {
                            session.project.tasks = tasks;
                            println!("Tasks loaded from {}", p);
                        }
                        Err(e) => println!("Error: {}", e),
                    },
                    _ => println!("Usage: load <json|csv> <path>"),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
