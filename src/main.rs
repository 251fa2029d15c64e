//! # Placard CLI
//!
//! Command-line interface for the template rendering service.
//!
//! ## Usage
//!
//! ```bash
//! # Run the HTTP service (TEMPLATES_DIR and PORT are read from the environment)
//! placard serve
//!
//! # Serve legacy templates that have no JSON configuration
//! placard serve --legacy-mode placeholders
//!
//! # Render a template to a file without the HTTP layer
//! placard render match.svg --var titulo=FINAL --var logo1=https://example.com/a.png --out match.png
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use placard::{
    PlacardError, RenderRequest, Renderer,
    legacy::{LegacyMode, LegacyPolicy},
    render::RenderOptions,
    server::{self, ServerConfig},
    substitute::ReplaceMode,
};

/// Placard - render PNG images from SVG templates
#[derive(Parser, Debug)]
#[command(name = "placard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP rendering service
    Serve {
        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = 3000)]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Render a single template to a PNG file
    Render {
        /// Template identifier, relative to the templates directory
        template: String,

        /// Template variable as NAME=VALUE (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,

        /// Output file
        #[arg(long, short, value_name = "FILE", default_value = "out.png")]
        out: PathBuf,

        #[command(flatten)]
        render: RenderArgs,
    },
}

/// Options shared by every command that renders.
#[derive(Args, Debug)]
struct RenderArgs {
    /// Directory containing templates, configs and an optional fonts/ folder
    #[arg(long, env = "TEMPLATES_DIR", default_value = "./templates")]
    templates_dir: PathBuf,

    /// Timeout for each remote logo download, in seconds
    #[arg(long, default_value_t = 10)]
    fetch_timeout_secs: u64,

    /// How to render templates that have no JSON configuration
    #[arg(long, value_enum, default_value_t = LegacyMode::Disabled)]
    legacy_mode: LegacyMode,

    /// Placeholder replacement for legacy templates
    #[arg(long, value_enum, default_value_t = ReplaceMode::All)]
    legacy_replace: ReplaceMode,
}

impl RenderArgs {
    fn options(&self) -> RenderOptions {
        RenderOptions {
            templates_dir: self.templates_dir.clone(),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            legacy: LegacyPolicy::new(self.legacy_mode, self.legacy_replace),
        }
    }
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    if name.is_empty() {
        return Err(format!("variable name cannot be empty in '{}'", s));
    }
    Ok((name.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("placard=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), PlacardError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host, render } => {
            let config = ServerConfig {
                listen_addr: format!("{}:{}", host, port),
                render: render.options(),
            };
            server::serve(config).await?;
        }
        Commands::Render {
            template,
            vars,
            out,
            render,
        } => {
            let renderer = Renderer::from_options(&render.options())?;
            let request = vars
                .into_iter()
                .fold(RenderRequest::new(template), |req, (name, value)| {
                    req.with(name, value)
                });

            let image = renderer.render(&request).await?;
            tokio::fs::write(&out, &image.png).await?;
            println!(
                "Saved {}x{} image to {}",
                image.width,
                image.height,
                out.display()
            );
        }
    }

    Ok(())
}
