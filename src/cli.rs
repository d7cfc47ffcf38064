// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use crate::app_log;
use crate::config::ClientConfig;
use crate::controller::{display_path, load_files, Controller};
use crate::core::{DirectorySink, ServiceClient};
use crate::report::{self, Tab};
use crate::session::{Action, Mode};
use crate::types::ResumeFile;
use crate::utils::ACCEPTED_EXTENSIONS;

#[derive(Parser)]
#[command(name = "resume-analyzer")]
#[command(about = "Upload resumes to the resume analysis service and review the results")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the analysis service
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory generated and exported files are written to
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// JSON log file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a resume and print the results
    Analyze {
        file: PathBuf,
        /// Print a single tab (overview, skills, ats, content, suggestions)
        #[arg(long, conflicts_with = "json")]
        tab: Option<Tab>,
        /// Print the service response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Download an improved resume generated by the service
    Download { file: PathBuf },
    /// Export the service's analysis to resume_analysis.json
    Export { file: PathBuf },
    /// Compare two or more resumes
    Compare { files: Vec<PathBuf> },
    /// Start an interactive session
    Shell,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, mut config: ClientConfig) -> Result<ClientConfig> {
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone())?;
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir.clone());
        }
        if let Some(file) = &self.log_file {
            config = config.with_log_file(file.clone());
        }
        Ok(config)
    }
}

pub fn build_controller(config: &ClientConfig) -> Result<Controller> {
    let service = ServiceClient::from_config(config)?;
    let sink = DirectorySink::new(config.output_dir().to_path_buf());
    Ok(Controller::new(Arc::new(service), Arc::new(sink)))
}

pub async fn handle_command(command: Command, controller: Controller) -> Result<()> {
    match command {
        Command::Analyze { file, tab, json } => {
            select(&controller, &[file]).await?;
            let result = controller.analyze().await?;

            if json {
                let session = controller.session().lock().await;
                if let Some(snapshot) = session.analysis() {
                    println!("{}", serde_json::to_string_pretty(&snapshot.payload.raw)?);
                }
            } else {
                match tab {
                    Some(tab) => print!("{}", report::render_tab(&result, tab)),
                    None => print!("{}", report::render_all(&result)),
                }
            }
        }

        Command::Download { file } => {
            select(&controller, &[file]).await?;
            let path = controller.download_improved_resume().await?;
            println!("✓ Improved resume saved to {}", display_path(&path));
        }

        Command::Export { file } => {
            select(&controller, &[file]).await?;
            let path = controller.export_analysis().await?;
            println!("✓ Analysis exported to {}", display_path(&path));
        }

        Command::Compare { files } => {
            controller.set_mode(Mode::Compare).await;
            select(&controller, &files).await?;
            let result = controller.compare().await?;
            print!("{}", report::render_comparison(&result));
        }

        Command::Shell => run_shell(controller).await?,
    }

    Ok(())
}

async fn select(controller: &Controller, paths: &[PathBuf]) -> Result<()> {
    let files = load_files(paths).await?;
    warn_unsupported(&files);
    controller.select_files(files).await;
    Ok(())
}

fn warn_unsupported(files: &[ResumeFile]) {
    for file in files.iter().filter(|f| !f.is_supported()) {
        eprintln!(
            "⚠️  {} is not one of {:?}; the service may reject it",
            file.file_name, ACCEPTED_EXTENSIONS
        );
    }
}

// ===== Interactive shell =====

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Select(Vec<PathBuf>),
    Clear,
    Mode(Mode),
    Tab(Tab),
    Show,
    Status,
    Run(Action),
    Save,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let parsed = match command.to_lowercase().as_str() {
            "select" => {
                if args.is_empty() {
                    return Err("usage: select <file> [file...]".to_string());
                }
                ShellCommand::Select(args.iter().map(|a| PathBuf::from(*a)).collect())
            }
            "clear" => ShellCommand::Clear,
            "mode" => match args.first().map(|a| a.to_lowercase()).as_deref() {
                Some("single") => ShellCommand::Mode(Mode::Single),
                Some("compare") => ShellCommand::Mode(Mode::Compare),
                _ => return Err("usage: mode single|compare".to_string()),
            },
            "tab" => {
                let name = args.first().ok_or("usage: tab <name>")?;
                ShellCommand::Tab(name.parse()?)
            }
            "show" => ShellCommand::Show,
            "status" => ShellCommand::Status,
            "analyze" => ShellCommand::Run(Action::Analyze),
            "download" => ShellCommand::Run(Action::GenerateResume),
            "export" => ShellCommand::Run(Action::Export),
            "compare" => ShellCommand::Run(Action::Compare),
            "save" => ShellCommand::Save,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => return Err(format!("unknown command '{other}', type help")),
        };
        Ok(Some(parsed))
    }
}

const SHELL_HELP: &str = "\
Commands:
  select <file>...        choose resume(s) to upload
  clear                   clear the selection
  mode single|compare     switch between single and comparison mode
  tab <name>              overview, skills, ats, content, suggestions
  show                    show the current view
  status                  show selection and busy state
  analyze                 analyze the selected resume
  download                download an improved resume PDF
  export                  export the service analysis as JSON
  save                    save the last analysis as JSON without a request
  compare                 compare the selected resumes
  quit                    wait for running requests and exit";

pub async fn run_shell(controller: Controller) -> Result<()> {
    println!("{SHELL_HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut running: Vec<JoinHandle<()>> = Vec::new();

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        running.retain(|handle| !handle.is_finished());

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => println!("{SHELL_HELP}"),
            ShellCommand::Select(paths) => match load_files(&paths).await {
                Ok(files) => {
                    warn_unsupported(&files);
                    controller.select_files(files).await;
                    println!("{}", report::render_status(&*controller.session().lock().await));
                }
                Err(e) => eprintln!("Error: {e}"),
            },
            ShellCommand::Clear => {
                if let Err(e) = controller.session().lock().await.clear_selection() {
                    eprintln!("Error: {e}");
                }
            }
            ShellCommand::Mode(mode) => controller.set_mode(mode).await,
            ShellCommand::Tab(tab) => {
                controller.session().lock().await.set_tab(tab);
                print!("{}", current_view(&controller).await);
            }
            ShellCommand::Show => print!("{}", current_view(&controller).await),
            ShellCommand::Status => {
                println!("{}", report::render_status(&*controller.session().lock().await))
            }
            ShellCommand::Save => match controller.save_last_analysis().await {
                Ok(path) => println!("✓ Analysis saved to {}", display_path(&path)),
                Err(e) => eprintln!("Error: {e}"),
            },
            ShellCommand::Run(action) => running.push(spawn_action(controller.clone(), action)),
        }
    }

    for handle in running {
        if let Err(e) = handle.await {
            app_log!(error, "Shell task ended abnormally: {}", e);
        }
    }
    Ok(())
}

fn spawn_action(controller: Controller, action: Action) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = match action {
            Action::Analyze => match controller.analyze().await {
                Ok(_) => Ok(current_view(&controller).await),
                Err(e) => Err(e),
            },
            Action::GenerateResume => controller
                .download_improved_resume()
                .await
                .map(|path| format!("✓ Improved resume saved to {}\n", display_path(&path))),
            Action::Export => controller
                .export_analysis()
                .await
                .map(|path| format!("✓ Analysis exported to {}\n", display_path(&path))),
            Action::Compare => controller
                .compare()
                .await
                .map(|result| report::render_comparison(&result)),
        };

        match outcome {
            Ok(output) => print!("{output}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    })
}

async fn current_view(controller: &Controller) -> String {
    let session = controller.session().lock().await;
    match (session.mode(), session.comparison(), session.analysis()) {
        (Mode::Compare, Some(comparison), _) => report::render_comparison(comparison),
        (_, _, Some(snapshot)) => report::render_snapshot(snapshot, session.active_tab()),
        _ => "Nothing to show yet\n".to_string(),
    }
}
