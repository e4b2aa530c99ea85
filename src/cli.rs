use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(name = "ccstatusline", about = "Configurable status line for Claude Code sessions")]
pub struct Args {
    /// Active Claude profile directory (first entry when comma-separated). Defaults to ~/.claude
    #[arg(long, env = "CLAUDE_CONFIG_DIR")]
    pub config_dir: Option<String>,

    /// Settings file. Defaults to ~/.config/ccstatusline/settings.json
    #[arg(long, env = "CCSTATUSLINE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Render sample values instead of reading the session
    #[arg(long)]
    pub preview: bool,

    /// Terminal width to lay out for, overriding detection
    #[arg(long)]
    pub width: Option<u16>,

    /// Debug mode: log cache and render decisions to stderr
    #[arg(long, env = "CCSTATUSLINE_DEBUG")]
    pub debug: bool,
}

impl Args {
    pub fn parse() -> Self {
        <Args as clap::Parser>::parse()
    }

    /// First non-empty entry of `--config-dir`
    pub fn config_dir(&self) -> Option<PathBuf> {
        self.config_dir
            .as_deref()?
            .split(',')
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "ccstatusline",
            "--config-dir",
            "/tmp/a,/tmp/b",
            "--width",
            "120",
            "--preview",
        ])
        .unwrap();
        assert!(args.preview);
        assert_eq!(args.width, Some(120));
        assert_eq!(args.config_dir(), Some(PathBuf::from("/tmp/a")));
    }
}
