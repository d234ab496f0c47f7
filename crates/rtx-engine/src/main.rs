//! rendertext - command line entry point
//!
//! ```text
//! rendertext [--locale TAG] [--no-strike-scaling] [--measure]
//!            TEXT FONT_SIZE TEXT_FONT EMOJI_FONT WIDTH HEIGHT OUTPUT
//! ```

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use rtx_engine::{Error, ErrorKind, RenderConfig, RenderRequest, Renderer};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const USAGE: &str = "usage: rendertext [--locale TAG] [--no-strike-scaling] [--measure] \
                     TEXT FONT_SIZE TEXT_FONT EMOJI_FONT WIDTH HEIGHT OUTPUT";

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(std::env::args_os().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let kind = err
                .downcast_ref::<Error>()
                .map(|e| e.kind().to_string())
                .unwrap_or_else(|| ErrorKind::Configuration.to_string());
            eprintln!("rendertext: {kind}: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<OsString>) -> anyhow::Result<()> {
    let mut config = RenderConfig::default();
    let mut measure_only = false;
    let mut positional = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.to_str() {
            Some("--locale") => {
                let tag = args.next().context("--locale needs a value")?;
                let tag = tag
                    .into_string()
                    .map_err(|_| Error::Configuration("locale is not valid Unicode".into()))?;
                config = config.locale(tag);
            }
            Some("--no-strike-scaling") => config = config.scale_color_strikes(false),
            Some("--measure") => measure_only = true,
            Some("-h" | "--help") => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => positional.push(arg),
        }
    }

    let [text, font_size, text_font, emoji_font, width, height, output]: [OsString; 7] =
        match positional.try_into() {
            Ok(args) => args,
            Err(args) => bail!(Error::Configuration(format!(
                "expected 7 arguments, got {}\n{USAGE}",
                args.len()
            ))),
        };

    let text = text.into_string().map_err(|raw| {
        Error::from(rtx_engine::text::TextError::TextConversion(format!(
            "argument is not valid Unicode: {}",
            raw.to_string_lossy()
        )))
    })?;

    let request = RenderRequest::new(
        text,
        parse_number(&font_size, "font size")?,
        PathBuf::from(text_font),
        PathBuf::from(emoji_font),
        parse_number(&width, "width")?,
        parse_number(&height, "height")?,
        PathBuf::from(output),
    );

    tracing::info!("rendertext v{}", rtx_engine::VERSION);
    let renderer = Renderer::new(config);

    if measure_only {
        let extent = renderer.measure(&request)?;
        println!("{} {}", extent.width, extent.height);
        return Ok(());
    }

    let summary = renderer.render(&request)?;
    if summary.missing_glyphs > 0 {
        tracing::warn!("{} code points had no glyph in either font", summary.missing_glyphs);
    }
    Ok(())
}

fn parse_number(arg: &OsString, name: &str) -> Result<u32, Error> {
    arg.to_str()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| Error::Configuration(format!("{name} must be a non-negative integer, got {}", arg.to_string_lossy())))
}
