use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use control_session::{
    app::{GuiValue, Session, UiAction},
    config::Config,
    services::async_bridge::AsyncBridge,
    services::dispatch::RuntimeDispatcher,
    services::tracing_setup,
    services::transport::HttpTransport,
    view::ids,
};
use std::{
    io::{self, BufRead},
    path::PathBuf,
    sync::{mpsc, Arc},
    time::Duration,
};

/// Line-oriented client for a remote-evaluated code playground
#[derive(Parser, Debug)]
#[command(name = "control-session")]
#[command(about = "Edit, evaluate and store playground scripts from the terminal", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the server base URL (e.g., http://localhost:8080)
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Path to log file (default: system temp dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the JSON schema of the configuration file and exit
    #[arg(long)]
    dump_schema: bool,
}

/// One line of user input
#[derive(Debug, PartialEq)]
enum Command {
    Run,
    Window,
    Gui(Vec<GuiValue>),
    New,
    Example(String),
    Open,
    Load(String),
    Save(String),
    SaveAs,
    Delete(String),
    Yes,
    No,
    Click(String),
    /// Move the cursor to a byte offset
    Cursor(usize),
    /// Insert text at the cursor; `\n` stands for a line break
    Insert(String),
    Show,
    Quit,
    /// Not a command: text for the buffer
    Text(String),
}

impl Command {
    fn parse(line: &str) -> Result<Self, String> {
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Command::Text(line.to_string()));
        };

        let (word, raw_arg) = match rest.split_once(' ') {
            Some((word, arg)) => (word, arg),
            None => (rest.trim(), ""),
        };
        let arg = raw_arg.trim();
        let named = |make: fn(String) -> Command| {
            if arg.is_empty() {
                Err(format!(":{} needs a name", word))
            } else {
                Ok(make(arg.to_string()))
            }
        };

        match word {
            "run" => Ok(Command::Run),
            "window" => Ok(Command::Window),
            "gui" => Ok(Command::Gui(
                arg.split(',')
                    .filter(|v| !v.trim().is_empty())
                    .map(GuiValue::parse)
                    .collect(),
            )),
            "new" => Ok(Command::New),
            "example" => named(Command::Example),
            "open" => Ok(Command::Open),
            "load" => named(Command::Load),
            "save" => named(Command::Save),
            "saveas" => Ok(Command::SaveAs),
            "delete" => named(Command::Delete),
            "yes" => Ok(Command::Yes),
            "no" => Ok(Command::No),
            "click" => named(Command::Click),
            "cursor" => arg
                .parse()
                .map(Command::Cursor)
                .map_err(|_| format!(":cursor needs an offset, got '{}'", arg)),
            "insert" if !raw_arg.is_empty() => {
                Ok(Command::Insert(raw_arg.replace("\\n", "\n")))
            }
            "insert" => Err(":insert needs text".to_string()),
            "show" => Ok(Command::Show),
            "quit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command ':{}'", other)),
        }
    }
}

/// A session plus the bridge its dispatcher reports to
struct Running {
    session: Session,
    bridge: AsyncBridge,
    shown_overlay: Option<String>,
}

impl Running {
    fn start(config: &Config, runtime: &tokio::runtime::Runtime) -> Self {
        let bridge = AsyncBridge::new();
        let dispatcher =
            RuntimeDispatcher::new(runtime.handle().clone(), Arc::new(HttpTransport::new()), &bridge);
        Self {
            session: Session::new(config.clone(), Box::new(dispatcher)),
            bridge,
            shown_overlay: None,
        }
    }

    /// Print what changed since the last report
    fn report(&mut self) {
        for surface in self.session.take_surface_updates() {
            println!("--- {} ---", surface);
            println!("{}", self.session.surface(surface).unwrap_or_default());
        }

        let visible = self.session.visible_overlay().map(str::to_string);
        if visible != self.shown_overlay {
            match &visible {
                Some(id) => println!("[overlay: {}]", id),
                None => println!("[overlay closed]"),
            }
            self.shown_overlay = visible;
        }
    }

    /// Apply one command. Returns false on quit.
    fn apply(&mut self, command: Command) -> bool {
        let session = &mut self.session;
        let visible = session.visible_overlay().map(str::to_string);
        match command {
            Command::Run => {
                session.click(ids::RUN_BUTTON, Some(UiAction::RunSource));
            }
            Command::Window => {
                session.click(ids::WINDOW_BUTTON, Some(UiAction::RunInWindow));
            }
            Command::Gui(values) => {
                let source = session.buffer().content().to_string();
                session.perform(UiAction::UpdateGui { source, values });
            }
            Command::New => {
                session.click(ids::NEW_BUTTON, Some(UiAction::NewScript));
            }
            Command::Example(name) => {
                session.click(ids::EXAMPLES_MENU, Some(UiAction::LoadExample(name)));
            }
            Command::Open => {
                session.click(ids::LOAD_BUTTON, Some(UiAction::OpenLoadDialog));
            }
            Command::Load(name) => {
                session.click(ids::LOAD_LIST, Some(UiAction::LoadFile(name)));
            }
            Command::Save(name) => session.perform(UiAction::Save(name)),
            Command::SaveAs => {
                session.click(ids::SAVE_BUTTON, Some(UiAction::OpenSaveDialog));
            }
            Command::Delete(name) => {
                session.click(ids::LOAD_LIST, Some(UiAction::DeleteFile(name)));
            }
            Command::Yes => match visible.as_deref() {
                Some(ids::DISCARD_CONFIRM) => {
                    session.click(ids::DISCARD_CONFIRM_YES, Some(UiAction::ConfirmDiscard));
                }
                Some(ids::OVERWRITE_FILE_CONFIRM) => {
                    session.click(ids::OVERWRITE_FILE_YES, Some(UiAction::ConfirmOverwriteFile));
                }
                Some(ids::SAVE_DIALOG) => {
                    session.click(ids::SAVE_CONFIRM, Some(UiAction::SaveFromDialog));
                }
                _ => println!("nothing to confirm"),
            },
            Command::No => match visible.as_deref() {
                Some(ids::DISCARD_CONFIRM) => {
                    session.click(ids::DISCARD_CONFIRM_NO, Some(UiAction::Dismiss));
                }
                Some(ids::OVERWRITE_FILE_CONFIRM) => {
                    session.click(ids::OVERWRITE_FILE_NO, Some(UiAction::Dismiss));
                }
                _ => session.perform(UiAction::Dismiss),
            },
            Command::Click(id) => {
                session.click(&id, None);
            }
            Command::Cursor(offset) => {
                session.set_cursor(offset);
                println!("line {}", session.cursor_line());
            }
            Command::Insert(text) => session.insert_text(&text),
            Command::Show => show(session),
            Command::Quit => return false,
            Command::Text(line) => session.append_line(&line),
        }
        true
    }
}

/// Print label, dirty marker, cursor line and buffer
fn show(session: &Session) {
    let label = match session.filename_label() {
        "" => "<unnamed>",
        name => name,
    };
    println!(
        "{}{} (line {})",
        label,
        if session.is_dirty() { " *" } else { "" },
        session.cursor_line()
    );
    println!("{}", session.buffer().content());
    if let Some(id) = session.visible_overlay() {
        println!("[overlay: {}]", id);
    }
}

/// Forward stdin lines to the event loop
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

fn load_config(args: &Args) -> AnyhowResult<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_or_default(),
    };
    if let Some(server) = &args.server {
        config.server.base_url = server.trim_end_matches('/').to_string();
        config.validate().context("Invalid --server")?;
    }
    Ok(config)
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    if args.dump_schema {
        println!("{}", Config::json_schema());
        return Ok(());
    }

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(tracing_setup::default_log_path);
    tracing_setup::init_global(&log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let config = load_config(&args)?;
    if args.dump_config {
        let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{}", json);
        return Ok(());
    }

    tracing::info!("control-session starting (log file: {})", log_file.display());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let lines = spawn_stdin_reader();
    let mut running = Running::start(&config, &runtime);

    loop {
        running.session.process_async_messages(&running.bridge);
        running.report();

        if running.session.reload_requested() {
            println!("[reloading]");
            running = Running::start(&config, &runtime);
            continue;
        }

        match lines.recv_timeout(Duration::from_millis(50)) {
            Ok(line) => match Command::parse(&line) {
                Ok(command) => {
                    if !running.apply(command) {
                        break;
                    }
                }
                Err(e) => println!("{}", e),
            },
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    tracing::info!("control-session exiting");
    runtime.shutdown_timeout(Duration::from_secs(1));
    Ok(())
}
