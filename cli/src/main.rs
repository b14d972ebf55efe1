use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use vidhost::ClientContext;
use vidhost::config::{ClientConfig, ConfigError, normalize_base_url};
use vidhost::net::ApiError;
use vidhost::net::types::{Credentials, EmbedConfig, Registration, UploadForm};
use vidhost::notify::{Notice, Notifier};
use vidhost::router::Navigation;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("client setup failed: {0}")]
    Client(#[from] ApiError),
    #[error("pass --username or --email")]
    MissingIdentity,
    #[error("cannot read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} failed")]
    Failed(&'static str),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "vidhost", about = "Video hosting client")]
struct Cli {
    /// API prefix, e.g. http://127.0.0.1:5000/api
    #[arg(long, env = "VIDHOST_BASE_URL")]
    base_url: Option<String>,

    /// File holding the persisted bearer token.
    #[arg(long, env = "VIDHOST_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login(LoginArgs),
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "VIDHOST_PASSWORD")]
        password: String,
    },
    Logout,
    /// Report whether a token is stored (no server call).
    Status,
    /// Fetch the signed-in user's profile.
    Whoami,
    Videos(VideosCommand),
    /// Run the navigation guard for a page path.
    Route {
        path: String,
    },
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long, conflicts_with = "email")]
    username: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long, env = "VIDHOST_PASSWORD")]
    password: String,
}

#[derive(Args, Debug)]
struct VideosCommand {
    #[command(subcommand)]
    command: VideosSubcommand,
}

#[derive(Subcommand, Debug)]
enum VideosSubcommand {
    /// Public catalog.
    List,
    /// Videos uploaded by the signed-in user.
    Mine,
    Show {
        slug: String,
    },
    Upload {
        file: PathBuf,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Delete {
        video_id: i64,
    },
    Embed(EmbedArgs),
}

#[derive(Args, Debug)]
struct EmbedArgs {
    video_id: i64,
    #[arg(long, default_value_t = 800)]
    width: u32,
    #[arg(long, default_value_t = 450)]
    height: u32,
    #[arg(long, default_value = "default")]
    theme: String,
    #[arg(long, default_value_t = false)]
    no_controls: bool,
    #[arg(long, default_value_t = false)]
    autoplay: bool,
    #[arg(long = "loop", default_value_t = false)]
    loop_playback: bool,
    #[arg(long, default_value = "metadata")]
    preload: String,
}

/// Prints notices to stderr so stdout stays machine-readable.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Success(message) => eprintln!("{message}"),
            Notice::Error(message) => eprintln!("error: {message}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    init_tracing();
    let cli = Cli::parse();
    let config = resolve_config(cli.base_url.as_deref(), cli.token_file)?;
    let ctx = ClientContext::from_config(&config, Arc::new(StderrNotifier))?;

    match cli.command {
        Command::Login(args) => run_login(&ctx, args).await,
        Command::Register { username, email, password } => {
            let registration = Registration { username, email, password };
            ensure(ctx.session.register(&registration).await, "registration")
        }
        Command::Logout => {
            ctx.session.logout();
            Ok(())
        }
        Command::Status => {
            let state = ctx.session.snapshot();
            println!("{}", serde_json::json!({
                "authenticated": state.is_authenticated(),
                "status": format!("{:?}", state.status).to_lowercase(),
            }));
            Ok(())
        }
        Command::Whoami => {
            let user = ctx.session.get_user().await.ok_or(CliError::Failed("fetching the current user"))?;
            print_json(&user)
        }
        Command::Videos(videos) => run_videos(&ctx, videos).await,
        Command::Route { path } => {
            match ctx.guard.check(&path) {
                Navigation::Proceed => println!("proceed"),
                Navigation::Redirect(to) => println!("redirect {to}"),
            }
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(base_url: Option<&str>, token_file: Option<PathBuf>) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = base_url {
        config.base_url = normalize_base_url(base_url)?;
    }
    if let Some(token_file) = token_file {
        config.token_file = token_file;
    }
    Ok(config)
}

async fn run_login(ctx: &ClientContext, args: LoginArgs) -> Result<(), CliError> {
    let credentials = match (args.username, args.email) {
        (Some(username), _) => Credentials::with_username(username, args.password),
        (None, Some(email)) => Credentials::with_email(email, args.password),
        (None, None) => return Err(CliError::MissingIdentity),
    };
    ensure(ctx.session.login(&credentials).await, "login")?;
    if let Some(user) = ctx.session.user() {
        print_json(&user)?;
    }
    Ok(())
}

async fn run_videos(ctx: &ClientContext, videos: VideosCommand) -> Result<(), CliError> {
    match videos.command {
        VideosSubcommand::List => {
            ensure(ctx.videos.get_all_videos().await, "loading videos")?;
            print_json(&ctx.videos.videos())
        }
        VideosSubcommand::Mine => {
            ensure(ctx.videos.get_user_videos().await, "loading your videos")?;
            print_json(&ctx.videos.user_videos())
        }
        VideosSubcommand::Show { slug } => {
            let video = ctx.videos.get_video(&slug).await.ok_or(CliError::Failed("loading video"))?;
            print_json(&video)
        }
        VideosSubcommand::Upload { file, title, description } => {
            let form = UploadForm::from_path(&file, &title, &description)
                .await
                .map_err(|source| CliError::ReadFile { path: file.clone(), source })?;
            let video = ctx.videos.upload_video(&form).await.ok_or(CliError::Failed("upload"))?;
            print_json(&video)
        }
        VideosSubcommand::Delete { video_id } => ensure(ctx.videos.delete_video(video_id).await, "delete"),
        VideosSubcommand::Embed(args) => {
            let config = EmbedConfig {
                width: args.width,
                height: args.height,
                theme: args.theme,
                controls: !args.no_controls,
                autoplay: args.autoplay,
                loop_playback: args.loop_playback,
                preload: args.preload,
            };
            let code = ctx
                .videos
                .create_embed_config(args.video_id, &config)
                .await
                .ok_or(CliError::Failed("embed configuration"))?;
            print_json(&code)
        }
    }
}

fn ensure(ok: bool, what: &'static str) -> Result<(), CliError> {
    if ok { Ok(()) } else { Err(CliError::Failed(what)) }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
