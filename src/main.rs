use anyhow::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ccstatusline::cli::Args;
use ccstatusline::config;
use ccstatusline::context::RenderContext;
use ccstatusline::models::StatusJson;
use ccstatusline::render::render_lines;
use ccstatusline::terminal::terminal_width;
use ccstatusline::utils::read_stdin;

/// Logs go to stderr; stdout carries only the status lines
fn init_tracing(debug: bool) {
    let fallback = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let settings = config::load_settings(args.settings.as_deref());
    let stdin = if args.preview { Vec::new() } else { read_stdin()? };
    let width = args.width.or_else(terminal_width);

    let context = if stdin.iter().all(u8::is_ascii_whitespace) {
        debug!("no session input, rendering preview");
        RenderContext::preview()
    } else {
        let data: StatusJson = serde_json::from_slice(&stdin).context("parse status json")?;
        let config_dir = args.config_dir().or_else(config::active_config_dir);
        RenderContext::for_session(data, &settings, config_dir.as_deref())
    }
    .with_terminal_width(width);

    debug!(
        lines = settings.lines.len(),
        width = ?context.terminal_width,
        powerline = settings.powerline.enabled,
        "rendering"
    );
    for line in render_lines(&settings, &context) {
        println!("{line}");
    }
    Ok(())
}
