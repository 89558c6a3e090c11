use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use image_studio::app::Studio;
use image_studio::image;
use image_studio::models::{Config, GenerationMode, Session, UploadedImage};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "image-studio")]
#[command(about = "Generate images from a prompt and an optional source image")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate an image and save it to the output directory.
    Generate {
        /// Text prompt describing the image.
        prompt: String,

        /// Source image (JPEG, PNG or WebP) for image-to-image generation.
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,

        /// Rewrite the prompt before generating, overriding the stored preference.
        #[arg(long, overrides_with = "no_enhance")]
        enhance: bool,

        /// Send the prompt as typed, overriding the stored preference.
        #[arg(long, overrides_with = "enhance")]
        no_enhance: bool,

        /// Directory for the downloaded image.
        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// Manage the stored API key.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Show or change stored preferences.
    Prefs {
        #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
        auto_enhance: Option<bool>,

        #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
        dark_mode: Option<bool>,
    },
}

#[derive(Debug, Subcommand)]
enum KeyAction {
    /// Store a new API key.
    Set { key: String },
    /// Print the stored key, masked.
    Show,
    /// Remove the stored key.
    Clear,
}

fn enhance_override(enhance: bool, no_enhance: bool) -> Option<bool> {
    match (enhance, no_enhance) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_studio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    let config = Config::from_env()?;

    let studio = match Studio::from_config(&config) {
        Ok(studio) => studio,
        Err(e) => {
            error!("Failed to initialize: {}", e);
            std::process::exit(1);
        }
    };

    // `key` commands manage the store itself and must not see the env key
    // written back into it.
    if !matches!(args.command, Command::Key { .. }) {
        studio.seed_api_key(&config)?;
    }

    match args.command {
        Command::Generate {
            prompt,
            image: image_path,
            enhance,
            no_enhance,
            output,
        } => {
            let mut session = Session::new(prompt);
            if let Some(path) = image_path {
                session.mode = GenerationMode::ImageToImage;
                match UploadedImage::from_path(&path) {
                    Ok(upload) => session.attach_image(upload),
                    Err(e) => {
                        error!("Cannot use {}: {}", path.display(), e);
                        std::process::exit(1);
                    }
                }
            }

            let result = match enhance_override(enhance, no_enhance) {
                Some(auto_enhance) => studio.generate_with_enhance(&session, auto_enhance).await,
                None => studio.generate(&session).await,
            };

            match result {
                Ok(generated) => {
                    let dir = output.unwrap_or(config.output_dir);
                    let path =
                        image::save_download(&generated.image_b64, &dir, chrono::Utc::now())?;
                    println!("{}", path.display());
                }
                // The status sink has already reported the failure.
                Err(_) => std::process::exit(1),
            }
        }
        Command::Key { action } => match action {
            KeyAction::Set { key } => {
                studio.settings().set_api_key(key.trim())?;
                info!("API key saved");
            }
            KeyAction::Show => println!("{}", studio.settings().credentials().masked()),
            KeyAction::Clear => {
                studio.settings().clear_api_key()?;
                info!("API key removed");
                if config.gemini_api_key.is_some() {
                    println!(
                        "GEMINI_API_KEY is set; it will be stored again on the next generate or prefs command"
                    );
                }
            }
        },
        Command::Prefs {
            auto_enhance,
            dark_mode,
        } => {
            let settings = studio.settings();
            if let Some(enabled) = auto_enhance {
                settings.set_auto_enhance(enabled)?;
            }
            if let Some(enabled) = dark_mode {
                settings.set_dark_mode(enabled)?;
            }
            let prefs = settings.preferences();
            println!("auto_enhance = {}", prefs.auto_enhance);
            println!("dark_mode = {}", prefs.dark_mode);
        }
    }

    Ok(())
}
