use clap::{Parser, Subcommand};
use rgen_studio::{
    form::view, logger, ClientConfig, Config, EndpointClient, GenerationForm, ImageStyle,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rgen-studio", version, about = "Prompt-to-image studio")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the generation endpoint
    Serve {
        #[arg(long, env = "HOST")]
        host: Option<String>,
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
    /// Fill in the form and submit it to a running endpoint
    Generate {
        #[arg(long)]
        prompt: String,
        #[arg(long)]
        style: Option<ImageStyle>,
        /// Save the generated image after it is displayed
        #[arg(long)]
        download: bool,
        #[arg(long, env = "GENERATE_ENDPOINT")]
        endpoint: Option<String>,
        #[arg(long, env = "DOWNLOAD_DIR")]
        out: Option<PathBuf>,
    },
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(logger::LoggerConfig::from_env())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => serve(host, port).await?,
        Command::Generate {
            prompt,
            style,
            download,
            endpoint,
            out,
        } => generate(prompt, style, download, endpoint, out).await?,
    }

    Ok(())
}

async fn serve(host: Option<String>, port: Option<u16>) -> rgen_studio::Result<()> {
    let mut config = Config::from_env();
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        &config.host,
        config.port,
    );
    logger::log_config_info(&config);

    rgen_studio::server::run(config).await
}

async fn generate(
    prompt: String,
    style: Option<ImageStyle>,
    download: bool,
    endpoint: Option<String>,
    out: Option<PathBuf>,
) -> rgen_studio::Result<()> {
    let mut config = ClientConfig::from_env();
    if let Some(endpoint) = endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(out) = out {
        config = config.with_download_dir(out);
    }

    let mut form = GenerationForm::new(EndpointClient::new(config.endpoint.clone()))
        .with_observer(|state| println!("{}\n", view::render(state)));
    form.set_prompt(prompt);
    form.set_style(style);

    form.submit().await;

    if download && form.state().image_url.is_some() {
        form.download(&config.download_dir).await;
    }

    match &form.state().error {
        Some(message) => Err(rgen_studio::GenerationError::Rejected(message.clone())),
        None => Ok(()),
    }
}
