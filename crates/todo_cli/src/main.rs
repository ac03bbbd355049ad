//! Console host for `todo_core`.
//!
//! # Responsibility
//! - Wire configuration, logging and SQLite storage to the view-models.
//! - Act as the "view": bind console state through a `BindingScope` and
//!   forward commands as user actions.

use clap::{Parser, Subcommand};
use log::{error, info};
use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;
use todo_core::viewmodel::{
    AddEditEvent, AddEditTaskViewModel, StatisticsViewModel, TasksViewModel, UserMessage,
};
use todo_core::{
    init_logging, BindingScope, CoreConfig, FilterType, Task, TasksDataSource, TasksRepository,
};

#[derive(Debug, Parser)]
#[command(name = "todo", about = "Console host for the todo core", version)]
struct Cli {
    /// Print task lists as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Commands {
    /// List tasks, optionally filtered.
    List {
        #[arg(value_parser = parse_filter, default_value = "all")]
        filter: FilterType,
    },

    /// Add a task.
    Add {
        title: String,
        description: Option<String>,
    },

    /// Mark a task completed.
    Complete { id: String },

    /// Mark a task active again.
    Activate { id: String },

    /// Delete every completed task.
    #[command(name = "clear-completed")]
    ClearCompleted,

    /// Show active and completed counts.
    Stats,
}

fn parse_filter(value: &str) -> Result<FilterType, String> {
    FilterType::parse(value)
        .ok_or_else(|| format!("unknown filter `{value}`; expected all|active|completed"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Err(err) = init_logging(&config) {
        eprintln!("warning: logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok command={:?}",
        cli.command
    );

    let repository = TasksRepository::open(&config).map_err(|err| {
        error!("event=cli_start module=cli status=error error={err}");
        err.to_string()
    })?;
    let source: Rc<dyn TasksDataSource> = Rc::new(repository);

    match cli.command {
        Commands::List { filter } => list(&source, filter, cli.json),
        Commands::Add { title, description } => {
            add(&source, title, description.unwrap_or_default())
        }
        Commands::Complete { id } => toggle(&source, &id, true),
        Commands::Activate { id } => toggle(&source, &id, false),
        Commands::ClearCompleted => {
            let view_model = TasksViewModel::new(Rc::clone(&source));
            let mut scope = BindingScope::new();
            print_messages(&mut scope, &view_model);
            view_model.clear_completed_tasks();
            Ok(())
        }
        Commands::Stats => stats(&source),
    }
}

fn print_messages(scope: &mut BindingScope, view_model: &TasksViewModel) {
    scope.bind(
        |message: Option<UserMessage>| {
            if let Some(message) = message {
                println!("> {}", message.key());
            }
        },
        view_model.snackbar(),
    );
}

fn list(source: &Rc<dyn TasksDataSource>, filter: FilterType, json: bool) -> Result<(), String> {
    let view_model = TasksViewModel::new(Rc::clone(source));
    let rows: Rc<RefCell<Vec<Task>>> = Rc::new(RefCell::new(Vec::new()));
    let label = Rc::new(RefCell::new(""));
    let empty_label = Rc::new(RefCell::new(""));

    let mut scope = BindingScope::new();
    let rows_sink = Rc::clone(&rows);
    let label_sink = Rc::clone(&label);
    let empty_sink = Rc::clone(&empty_label);
    scope
        .bind_collection(
            move |items: &[Task]| *rows_sink.borrow_mut() = items.to_vec(),
            view_model.items(),
        )
        .bind(
            move |text: &'static str| *label_sink.borrow_mut() = text,
            view_model.current_filtering_label(),
        )
        .bind(
            move |text: &'static str| *empty_sink.borrow_mut() = text,
            view_model.no_tasks_label(),
        );

    view_model.set_filtering(filter);
    view_model.start();
    if view_model.data_loading_error().get() {
        return Err("tasks are not available".to_string());
    }

    let rows = rows.borrow();
    if json {
        let rendered = serde_json::to_string_pretty(&*rows).map_err(|err| err.to_string())?;
        println!("{rendered}");
        return Ok(());
    }

    println!("[{}]", label.borrow());
    if rows.is_empty() {
        println!("  ({})", empty_label.borrow());
    }
    for task in rows.iter() {
        let mark = if task.is_completed() { "x" } else { " " };
        println!("  [{mark}] {}  {}", task.id(), task.title_for_list());
    }
    Ok(())
}

fn add(source: &Rc<dyn TasksDataSource>, title: String, description: String) -> Result<(), String> {
    let view_model = AddEditTaskViewModel::new(Rc::clone(source));
    let saved = Rc::new(RefCell::new(false));
    let rejected = Rc::new(RefCell::new(false));

    let saved_sink = Rc::clone(&saved);
    let saved_handle = view_model.events().subscribe(move |event| match event {
        AddEditEvent::Saved => *saved_sink.borrow_mut() = true,
    });
    let rejected_sink = Rc::clone(&rejected);
    let mut scope = BindingScope::new();
    scope.hold(saved_handle).bind(
        move |message: Option<UserMessage>| {
            if message == Some(UserMessage::EmptyTask) {
                *rejected_sink.borrow_mut() = true;
            }
        },
        view_model.snackbar(),
    );

    view_model.start(None);
    view_model.title().set(title);
    view_model.description().set(description);
    view_model.save().map_err(|err| err.to_string())?;

    if *rejected.borrow() {
        return Err(UserMessage::EmptyTask.key().to_string());
    }
    if *saved.borrow() {
        println!("> {}", UserMessage::TaskAdded.key());
    }
    Ok(())
}

fn toggle(source: &Rc<dyn TasksDataSource>, id: &str, completed: bool) -> Result<(), String> {
    let view_model = TasksViewModel::new(Rc::clone(source));
    let mut scope = BindingScope::new();
    print_messages(&mut scope, &view_model);

    view_model.start();
    let task = view_model
        .items()
        .with(|items| items.iter().find(|task| task.id() == id).cloned())
        .ok_or_else(|| format!("task not found: {id}"))?;
    if completed {
        view_model.complete_task(&task);
    } else {
        view_model.activate_task(&task);
    }
    Ok(())
}

fn stats(source: &Rc<dyn TasksDataSource>) -> Result<(), String> {
    let view_model = StatisticsViewModel::new(Rc::clone(source));
    view_model.start();
    if view_model.error().get() {
        return Err("tasks are not available".to_string());
    }
    if view_model.is_empty() {
        println!("no tasks");
        return Ok(());
    }
    println!("active: {}", view_model.number_of_active_tasks());
    println!("completed: {}", view_model.number_of_completed_tasks());
    Ok(())
}
