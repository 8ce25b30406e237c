use std::{
    io::{self, IsTerminal},
    path::PathBuf,
    sync::Arc,
};

use anyhow::Result;
use clap::Parser;
use console_core::{compose_banners, ConsoleSession, EvalBackend, LiveInput};
use mal_vm::MalVm;
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::{load_settings, Settings};
use terminal::{Frontend, Painter};

#[derive(Parser, Debug)]
#[command(name = "mal-repl", version, about = "Interactive Make-A-Lisp console")]
struct Args {
    #[arg(long, default_value = "repl.toml")]
    config: PathBuf,
    #[arg(long)]
    prompt: Option<String>,
    /// Banner line shown at session start; repeat for several lines.
    #[arg(long = "banner")]
    banners: Vec<String>,
    #[arg(long)]
    no_color: bool,
    #[arg(long)]
    log_filter: Option<String>,
}

impl Args {
    fn apply(self, mut settings: Settings) -> Settings {
        if let Some(prompt) = self.prompt {
            settings.prompt = prompt;
        }
        if !self.banners.is_empty() {
            settings.banners = self.banners;
        }
        if self.no_color {
            settings.color = false;
        }
        if let Some(filter) = self.log_filter {
            settings.log_filter = filter;
        }
        settings
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args.config)?;
    let settings = args.apply(settings);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let vm: Arc<dyn EvalBackend> = Arc::new(MalVm::new());
    let banners = compose_banners(vm.as_ref(), settings.banners.clone());
    let session = ConsoleSession::with_backend(banners.clone(), vm);

    let stdout = io::stdout();
    let color = settings.color && stdout.is_terminal();
    let frontend = Frontend::new(
        session,
        LiveInput::new(settings.prompt.clone()),
        Painter::new(stdout, color),
        banners,
        io::stdin().is_terminal(),
    );
    terminal::run(frontend).await
}
