use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use tokio::io::AsyncWriteExt;

use elevenlabs_gateway::config::GatewayConfig;
use elevenlabs_gateway::core::{
    ResponseKind, StreamChunk, ToolDispatcher, ToolOutput, ToolRegistry,
};

/// ElevenLabs Gateway - uniform tool dispatch over the speech API
#[derive(Parser, Debug)]
#[command(name = "elevenlabs-gateway")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every tool in the catalog
    Tools,

    /// Show one tool's parameter schema
    Describe {
        /// Tool name, e.g. `convert`
        tool: String,
    },

    /// Invoke a tool against the upstream API
    Invoke {
        /// Tool name, e.g. `get_voices`
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long = "args", value_name = "JSON", default_value = "{}")]
        args: String,

        /// Destination file for audio responses
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Tools => list_tools(),
        Commands::Describe { tool } => describe_tool(&tool),
        Commands::Invoke { tool, args, output } => invoke_tool(&tool, &args, output).await,
    }
}

/// Print the catalog without touching configuration or the network
fn list_tools() -> anyhow::Result<()> {
    let registry = ToolRegistry::builtin()?;
    for descriptor in registry.tools() {
        println!(
            "{:<58} {:>6} {}  [{}]",
            descriptor.name,
            descriptor.method.as_str(),
            descriptor.path,
            descriptor.response.as_str()
        );
    }
    println!("\n{} tools", registry.len());
    Ok(())
}

fn describe_tool(tool: &str) -> anyhow::Result<()> {
    let registry = ToolRegistry::builtin()?;
    let descriptor = registry.lookup(tool)?;
    println!("name:     {}", descriptor.name);
    println!("endpoint: {} {}", descriptor.method.as_str(), descriptor.path);
    println!("response: {}", descriptor.response.as_str());
    if descriptor.params.is_empty() {
        println!("parameters: none");
        return Ok(());
    }
    println!("parameters:");
    for param in &descriptor.params {
        let required = if param.required { " (required)" } else { "" };
        let default = match &param.default {
            Some(value) => format!(" default {value}"),
            None => String::new(),
        };
        println!(
            "  {:<32} {} @ {}{}{}",
            param.name,
            param.kind,
            param.location.as_str(),
            required,
            default
        );
    }
    Ok(())
}

async fn invoke_tool(tool: &str, args_json: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let args: serde_json::Value =
        serde_json::from_str(args_json).map_err(|e| anyhow!("--args is not valid JSON: {e}"))?;
    let Some(args) = args.as_object() else {
        anyhow::bail!("--args must be a JSON object");
    };

    let config = GatewayConfig::from_env().map_err(|e| anyhow!(e))?;
    let dispatcher = ToolDispatcher::from_config(&config)?;

    // Audio tools need a destination before any quota is spent upstream
    let response = dispatcher.describe(tool)?.response;
    if matches!(response, ResponseKind::Binary | ResponseKind::StreamBinary) && output.is_none() {
        anyhow::bail!("tool '{tool}' returns audio bytes; pass --output FILE");
    }

    match dispatcher.invoke(tool, args).await? {
        ToolOutput::Json(value) => {
            let rendered = serde_json::to_string_pretty(&value)?;
            match &output {
                Some(path) => {
                    tokio::fs::write(path, rendered.as_bytes()).await?;
                    println!("wrote JSON response to {}", path.display());
                }
                None => println!("{rendered}"),
            }
        }
        ToolOutput::Binary {
            content_type,
            bytes,
        } => {
            let Some(path) = &output else {
                anyhow::bail!("tool '{tool}' returned {} bytes; pass --output FILE", bytes.len());
            };
            tokio::fs::write(path, &bytes).await?;
            println!(
                "wrote {} bytes ({content_type}) to {}",
                bytes.len(),
                path.display()
            );
        }
        ToolOutput::Stream(mut stream) => {
            let mut file = match &output {
                Some(path) => Some(tokio::fs::File::create(path).await?),
                None => None,
            };
            let mut total = 0usize;
            while let Some(chunk) = stream.next_chunk().await {
                match chunk? {
                    StreamChunk::Audio(bytes) => {
                        let Some(file) = file.as_mut() else {
                            anyhow::bail!("received audio bytes with no --output file");
                        };
                        file.write_all(&bytes).await?;
                        total += bytes.len();
                    }
                    StreamChunk::Event(event) => println!("{event}"),
                }
            }
            if let (Some(mut file), Some(path)) = (file, &output) {
                file.flush().await?;
                println!("wrote {total} bytes to {}", path.display());
            }
        }
    }
    Ok(())
}
