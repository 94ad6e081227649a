//! printshop - CLI tool to quote, upload and order 3D prints.

mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use printshop_core::config::float_cmp::approx_eq;
use printshop_core::{
    quote_model_file, Color, Infill, LayerHeight, Material, ModelFile, OrderPatch, OrderSession,
    PrintSettings, Quote, ShippingForm, ShopConfig, ShopError, Step, SupportStructure,
    UploadStatus, Uploader,
};

/// Quote, upload and order 3D prints.
#[derive(Parser, Debug)]
#[command(name = "printshop")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Upload endpoint URL or path
    #[arg(long, global = true, env = "PRINTSHOP_UPLOAD_URL")]
    endpoint: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate the price of printing a model file
    Quote {
        /// Model file (STL, OBJ, 3MF)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Output the breakdown as JSON
        #[arg(long)]
        json: bool,
    },
    /// Upload a model file to the storefront
    Upload {
        /// Model file (STL, OBJ, 3MF)
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Validate a shipping form given as a JSON object
    ValidateShipping {
        /// JSON file with name, email, address, city, zip, country, phone
        #[arg(short, long)]
        form: PathBuf,
    },
    /// Upload, configure and place an order in one go
    Order {
        /// Model file (STL, OBJ, 3MF)
        #[arg(short, long)]
        input: PathBuf,

        /// Shipping form JSON file
        #[arg(short, long)]
        shipping: PathBuf,

        /// Ordering user id
        #[arg(long)]
        user_id: i64,

        /// Number of copies
        #[arg(short, long, default_value = "1")]
        quantity: u32,

        #[command(flatten)]
        settings: SettingsArgs,
    },
}

/// Print settings shared by the quoting and ordering commands.
#[derive(Args, Debug)]
struct SettingsArgs {
    /// Material (pla, abs, petg, tpu)
    #[arg(long, default_value = "pla")]
    material: Material,

    /// Color (white, black, red, blue, gray)
    #[arg(long, default_value = "white")]
    color: Color,

    /// Layer height in mm (0.10 to 0.30, step 0.05)
    #[arg(long, default_value = "0.2")]
    layer_height: f64,

    /// Infill percent (10 to 100, step 5)
    #[arg(long, default_value = "20")]
    infill: i64,

    /// Support structure (none, auto, everywhere, buildplate)
    #[arg(long, default_value = "auto")]
    support: SupportStructure,
}

impl SettingsArgs {
    fn to_settings(&self) -> PrintSettings {
        let settings = PrintSettings {
            material: self.material,
            color: self.color,
            layer_height: LayerHeight::from_mm(self.layer_height),
            infill: Infill::new(self.infill),
            support_structure: self.support,
        };
        if !approx_eq(settings.layer_height.mm(), self.layer_height) {
            warn!(
                "Layer height {} mm adjusted to {} mm",
                self.layer_height,
                settings.layer_height.mm()
            );
        }
        if settings.infill.percent() as i64 != self.infill {
            warn!(
                "Infill {}% adjusted to {}%",
                self.infill,
                settings.infill.percent()
            );
        }
        settings
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => ShopConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ShopConfig::default(),
    };
    if let Some(endpoint) = &cli.endpoint {
        config.set_endpoint(endpoint);
    }
    debug!("Upload endpoint: {}", config.upload.endpoint);

    match cli.command {
        Command::Quote {
            input,
            settings,
            json,
        } => quote(&input, &settings.to_settings(), &config, json),
        Command::Upload { input } => {
            let mut session = OrderSession::new(config.limits.clone());
            upload(&mut session, &input, &config).await
        }
        Command::ValidateShipping { form } => {
            let form = read_shipping_form(&form)?;
            match printshop_core::validate_shipping(&form) {
                Ok(details) => {
                    println!("{}", serde_json::to_string_pretty(&details)?);
                    Ok(())
                }
                Err(errors) => {
                    for err in errors.iter() {
                        error!("{}", err);
                    }
                    anyhow::bail!("Validation failed");
                }
            }
        }
        Command::Order {
            input,
            shipping,
            user_id,
            quantity,
            settings,
        } => order(&input, &shipping, user_id, quantity, &settings.to_settings(), &config).await,
    }
}

fn quote(input: &Path, settings: &PrintSettings, config: &ShopConfig, json: bool) -> Result<()> {
    info!("Quoting: {}", input.display());

    let breakdown = quote_model_file(input, settings, &config.limits)
        .with_context(|| format!("Failed to quote {}", input.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    let name = input.file_name().and_then(|s| s.to_str());
    println!("{}", render::render_quote(name, settings, &Quote::Priced(breakdown)));
    Ok(())
}

/// Select `input` in the session and upload it, cancelling on Ctrl-C.
async fn upload(session: &mut OrderSession, input: &Path, config: &ShopConfig) -> Result<()> {
    let file = ModelFile::from_path(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    info!("Uploading {} ({:.2} MB)", file.name, file.size_mib());

    let uploader = Uploader::new(&config.upload)?;
    let ticket = session.select_file(file)?;
    let Some(pending) = session.pending_file() else {
        anyhow::bail!("No file selected");
    };
    let mut events = uploader.start(&ticket, pending);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut last_logged = 0;

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                let terminal = event.is_terminal();
                session.apply_upload_event(ticket.id(), event);
                let percent = session.upload_status().percent();
                if !terminal && percent >= last_logged + 10 {
                    info!("{}", session.upload_status().message());
                    last_logged = percent - percent % 10;
                }
                if terminal {
                    break;
                }
            }
            _ = &mut ctrl_c, if !session.upload_status().is_terminal() => {
                warn!("Interrupted, cancelling upload");
                session.cancel_upload();
            }
        }
    }

    match session.upload_status() {
        UploadStatus::Succeeded(response) => {
            info!("{}", session.upload_status().message());
            if let Some(url) = &response.file_url {
                info!("Stored as {}", url);
            }
            Ok(())
        }
        UploadStatus::Failed(failure) => Err(ShopError::Upload(failure.clone()).into()),
        UploadStatus::Cancelled => anyhow::bail!("Upload cancelled"),
        other => anyhow::bail!("Upload ended unexpectedly: {:?}", other),
    }
}

async fn order(
    input: &Path,
    shipping: &Path,
    user_id: i64,
    quantity: u32,
    settings: &PrintSettings,
    config: &ShopConfig,
) -> Result<()> {
    let form = read_shipping_form(shipping)?;
    let mut session = OrderSession::new(config.limits.clone());

    upload(&mut session, input, config).await?;
    debug!("Step: {}", session.step());

    session
        .update(OrderPatch::settings(*settings))
        .context("Failed to apply print settings")?;

    for step in [Step::Settings, Step::Checkout, Step::Payment] {
        if session.advance() != step {
            anyhow::bail!("Could not reach the {} step", step);
        }
    }

    let name = session.state().uploaded_file.as_ref().map(|f| f.name.as_str());
    println!("{}", render::render_quote(name, &session.state().settings, session.quote()));
    if let Some(summary) = session.checkout_summary() {
        println!("{}", render::render_checkout(&summary));
    }

    match session.submit_shipping(&form) {
        Ok(details) => info!("Shipping to {}, {}", details.city, details.country),
        Err(ShopError::Validation(errors)) => {
            for err in errors.iter() {
                error!("{}", err);
            }
            anyhow::bail!("Shipping validation failed");
        }
        Err(err) => return Err(err.into()),
    }

    let submission = session.place_order(user_id, quantity)?;
    info!("Your order has been successfully placed!");
    println!("{}", serde_json::to_string_pretty(&submission)?);
    Ok(())
}

fn read_shipping_form(path: &Path) -> Result<ShippingForm> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON object of strings", path.display()))
}
