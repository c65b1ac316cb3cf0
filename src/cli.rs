use clap::Parser;

#[derive(Parser)]
#[command(name = "evo-persona")]
#[command(version)]
#[command(about = "Terminal client for the evolving-persona chat backend")]
pub struct Args {
    /// Base URL of the persona gateway
    #[arg(long, default_value = "http://localhost:5000")]
    pub base_url: String,

    /// Event poll interval in seconds
    #[arg(long, default_value = "3600")]
    pub poll_interval: u64,

    /// Seed a demo session via /api/demo/quick-start on launch
    #[arg(long)]
    pub demo: bool,

    /// Auto-submit the #evolve_now test command after startup
    #[arg(long)]
    pub quick_evolve: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Optional message to send before entering the interactive loop
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_minimal() {
        let args = Args::parse_from(["evo-persona"]);
        assert_eq!(args.base_url, "http://localhost:5000");
        assert_eq!(args.poll_interval, 3600);
        assert!(!args.demo);
        assert!(!args.quick_evolve);
        assert!(!args.no_color);
        assert!(args.message.is_none());
    }

    #[test]
    fn test_args_parse_full() {
        let args = Args::parse_from([
            "evo-persona",
            "hello there",
            "--base-url",
            "http://127.0.0.1:8000",
            "--poll-interval",
            "60",
            "--demo",
            "--quick-evolve",
            "--no-color",
        ]);
        assert_eq!(args.message.as_deref(), Some("hello there"));
        assert_eq!(args.base_url, "http://127.0.0.1:8000");
        assert_eq!(args.poll_interval, 60);
        assert!(args.demo);
        assert!(args.quick_evolve);
        assert!(args.no_color);
    }

    #[test]
    fn test_args_parse_demo_only() {
        let args = Args::parse_from(["evo-persona", "--demo"]);
        assert!(args.demo);
        assert!(!args.quick_evolve);
    }

    #[test]
    fn test_args_default_poll_interval_one_hour() {
        let args = Args::parse_from(["evo-persona"]);
        assert_eq!(args.poll_interval, 60 * 60);
    }
}
