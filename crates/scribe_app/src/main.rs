use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};
use scribe_app::{
    initialize_logging, load_file_config, load_media, resolve_settings, write_transcript,
    CredentialHolder, EffectRunner, ExportFormat, FileConfig, LogDestination, Session,
    SettingsOverrides, TerminalSink,
};
use scribe_core::JobStatus;
use scribe_engine::{AccessToken, ApiSettings, EngineHandle, ReqwestApi};
use scribe_logging::scribe_info;

#[derive(Parser)]
#[command(
    name = "scribe",
    version,
    about = "Submit audio or video for transcription and print the transcript"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Config file (defaults to ./scribe.ron when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Base URL of the processing service
    #[arg(long, global = true, env = "SCRIBE_BASE_URL")]
    base_url: Option<String>,
    /// Where log output goes
    #[arg(long, value_enum, default_value = "terminal", global = true)]
    log: LogDestination,
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct AppCredentials {
    /// Application id used to generate an access token
    #[arg(long, env = "SCRIBE_APP_ID")]
    app_id: Option<String>,
    /// Application secret used to generate an access token
    #[arg(long, env = "SCRIBE_APP_SECRET", hide_env_values = true)]
    app_secret: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Exchange application credentials for an access token and print it
    Login {
        #[command(flatten)]
        credentials: AppCredentials,
    },
    /// Submit a media file, wait for processing and print the transcript
    Transcribe {
        /// Audio or video file to process
        file: PathBuf,
        /// Access token (otherwise generated from the app credentials)
        #[arg(long, env = "SCRIBE_TOKEN", hide_env_values = true)]
        token: Option<String>,
        #[command(flatten)]
        credentials: AppCredentials,
        /// Status poll period in milliseconds (default: 1000)
        #[arg(long)]
        poll_interval_ms: Option<u64>,
        /// Give up after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Also write the transcript to this file
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Format of the --output file
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    initialize_logging(cli.global.log, cli.global.verbose);

    let file_config = load_file_config(cli.global.config.as_deref())?;

    match cli.cmd {
        Command::Login { credentials } => {
            let settings = resolve_settings(&file_config, &overrides(&cli.global, None))?;
            let token = generate_token(&settings.api, &file_config, credentials).await?;
            println!("{}", token.expose());
            Ok(())
        }
        Command::Transcribe {
            file,
            token,
            credentials,
            poll_interval_ms,
            timeout_secs,
            output,
            format,
        } => {
            let settings =
                resolve_settings(&file_config, &overrides(&cli.global, poll_interval_ms))?;
            let media = load_media(&file)?;

            let token = match token {
                Some(token) => AccessToken::new(token),
                None => generate_token(&settings.api, &file_config, credentials).await?,
            };

            let engine = EngineHandle::connect(settings)?;
            let runner = EffectRunner::new(engine, CredentialHolder::with_token(token));
            let mut session = Session::new(runner, Box::new(TerminalSink::stdout()));

            let view = match timeout_secs {
                Some(secs) => tokio::time::timeout(
                    Duration::from_secs(secs),
                    session.transcribe(media),
                )
                .await
                .map_err(|_| anyhow!("gave up waiting for the job after {secs} s"))?,
                None => session.transcribe(media).await,
            };

            if let Some(failure) = &view.last_failure {
                bail!("{}", failure.message);
            }
            if view.status == JobStatus::Failed {
                bail!("the service reported the job as failed");
            }

            if let Some(path) = output {
                let written = write_transcript(&path, &view.messages, format)
                    .with_context(|| format!("writing transcript to {}", path.display()))?;
                scribe_info!(
                    "Wrote {} messages to {}",
                    view.messages.len(),
                    written.display()
                );
            }
            Ok(())
        }
    }
}

fn overrides(global: &GlobalArgs, poll_interval_ms: Option<u64>) -> SettingsOverrides {
    SettingsOverrides {
        base_url: global.base_url.clone(),
        poll_interval_ms,
    }
}

async fn generate_token(
    api: &ApiSettings,
    file_config: &FileConfig,
    credentials: AppCredentials,
) -> anyhow::Result<AccessToken> {
    let app_id = credentials
        .app_id
        .or_else(|| file_config.app_id.clone())
        .context("no access token: pass --token or --app-id/--app-secret")?;
    let app_secret = credentials
        .app_secret
        .context("no app secret: pass --app-secret or set SCRIBE_APP_SECRET")?;

    let client = ReqwestApi::new(api.clone())?;
    Ok(client.generate_token(&app_id, &app_secret).await?)
}
