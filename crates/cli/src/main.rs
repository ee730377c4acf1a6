#![deny(unsafe_code)]
//! CLI binary for the genart procedural image generator.
//!
//! Subcommands:
//! - `render <engine>`: one still image from flags, written as PNG
//! - `run <config>`: a JSON config (inline or a file), PNG or animated GIF
//! - `list`: available engines and palette types

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use genart_core::params::{parse_params, params_from_json, Params};
use genart_core::{Config, Engine, PaletteKind};
use genart_engines::animate::{self, RunOutput};
use genart_engines::EngineKind;
use std::process;
use tracing::Level;

#[derive(Parser)]
#[command(name = "genart", about = "Deterministic procedural image generator")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log debug events to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one image with an engine and write a PNG.
    Render {
        /// Engine name (see `genart list`).
        engine: String,

        /// Canvas width in pixels.
        #[arg(short = 'W', long, default_value_t = 1000)]
        width: i64,

        /// Canvas height in pixels.
        #[arg(short = 'H', long, default_value_t = 1000)]
        height: i64,

        /// Root seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: i64,

        /// Engine parameters as k=v,k=v (numbers) or a JSON object.
        #[arg(long, default_value = "")]
        params: String,

        /// Palette type (mono, analogous, split).
        #[arg(short, long, default_value = "mono")]
        palette: String,

        /// Output PNG path.
        #[arg(short, long, default_value = "out.png")]
        out: String,

        /// Margin as a fraction of the shorter side.
        #[arg(long, default_value_t = 0.05)]
        margin: f64,

        /// Render at N times the size and downsample.
        #[arg(long, default_value_t = 1)]
        supersample: u32,
    },
    /// Run a JSON config: inline (starting with `{`) or a file path.
    Run {
        config: String,

        /// Override the config's output path.
        #[arg(short, long)]
        out: Option<String>,
    },
    /// List available engines and palette types.
    List,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Parses `--params`: a JSON object, or `k=v` pairs.
fn parse_params_arg(params: &str) -> Result<Params, CliError> {
    if params.trim_start().starts_with('{') {
        let value: serde_json::Value = serde_json::from_str(params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
        return Ok(params_from_json(&value));
    }
    Ok(parse_params(params)?)
}

/// Builds the run config for `render` flags.
#[allow(clippy::too_many_arguments)]
fn render_config(
    engine: String,
    width: i64,
    height: i64,
    seed: i64,
    params: &str,
    palette: String,
    out: String,
    margin: f64,
    supersample: u32,
) -> Result<Config, CliError> {
    let mut config = Config::new(&engine);
    config.width = width;
    config.height = height;
    config.seed = seed;
    config.params = parse_params_arg(params)?;
    config.palette.kind = palette;
    config.out = out;
    config.render.margin = margin;
    config.render.supersample = supersample;
    Ok(config)
}

fn report(config: &Config, output: &RunOutput, json: bool) -> Result<(), CliError> {
    if json {
        let info = serde_json::json!({
            "engine": config.engine,
            "width": config.width,
            "height": config.height,
            "out": output.out.display().to_string(),
            "seed": config.seed,
            "params": config.params,
            "frames": output.frames,
            "frame_log": output.frame_log.as_ref().map(|p| p.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!("Root seed: {}", config.seed);
        eprintln!(
            "rendered {} ({}x{}, {} frame(s)) -> {}",
            config.engine,
            config.width,
            config.height,
            output.frames,
            output.out.display()
        );
        if let Some(log) = &output.frame_log {
            eprintln!("frame log -> {}", log.display());
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let engines = EngineKind::list_engines();
            let palettes = PaletteKind::NAMES;
            if cli.json {
                let mut schemas = serde_json::Map::new();
                for name in engines {
                    let kind = EngineKind::from_name(name)?;
                    schemas.insert(name.to_string(), kind.param_schema());
                }
                let info = serde_json::json!({
                    "engines": engines,
                    "palettes": palettes,
                    "params": schemas,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Engines:");
                for name in engines {
                    println!("  {name}");
                }
                println!("Palettes:");
                println!("  {}", palettes.join(", "));
            }
        }
        Command::Render {
            engine,
            width,
            height,
            seed,
            params,
            palette,
            out,
            margin,
            supersample,
        } => {
            let config = render_config(
                engine,
                width,
                height,
                seed,
                &params,
                palette,
                out,
                margin,
                supersample,
            )?;
            let output = animate::run(&config)?;
            report(&config, &output, cli.json)?;
        }
        Command::Run { config, out } => {
            let mut config = Config::load(&config)?;
            if let Some(out) = out {
                config.out = out;
            }
            let output = animate::run(&config)?;
            report(&config, &output, cli.json)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("genart: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_flags_become_config() {
        let config = render_config(
            "circle".into(),
            64,
            32,
            7,
            "radius=0.25, segments=90",
            "split".into(),
            "c.png".into(),
            0.0,
            2,
        )
        .unwrap();
        assert_eq!(config.engine, "circle");
        assert_eq!((config.width, config.height), (64, 32));
        assert_eq!(config.seed, 7);
        assert_eq!(config.params["radius"], 0.25);
        assert_eq!(config.params["segments"], 90.0);
        assert_eq!(config.palette.kind, "split");
        assert_eq!(config.render.supersample, 2);
        assert!(!config.is_animated());
    }

    #[test]
    fn malformed_params_are_input_errors() {
        let err = render_config(
            "square".into(),
            10,
            10,
            1,
            "size",
            "mono".into(),
            "o.png".into(),
            0.05,
            1,
        )
        .err()
        .unwrap();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn params_accept_json_objects() {
        let params = parse_params_arg(r#"{"dots": 200, "step": 0.01, "label": "x"}"#).unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params["dots"], 200.0);

        let err = parse_params_arg("{not json").unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn parses_render_subcommand() {
        let cli = Cli::try_parse_from([
            "genart", "render", "flowfield", "-W", "200", "-H", "100", "--seed", "9", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Render {
                engine,
                width,
                height,
                seed,
                ..
            } => {
                assert_eq!(engine, "flowfield");
                assert_eq!((width, height, seed), (200, 100, 9));
            }
            _ => panic!("expected render"),
        }
    }
}
