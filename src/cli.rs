use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";

#[derive(Parser, Debug)]
#[command(
    name = "pdf-renamer",
    about = "Rename PDFs after the author, title and year a language model reads off their first pages",
    version = "0.1.0"
)]
pub struct Args {
    /// Directory holding the PDFs
    #[arg(
        value_name = "PATH",
        help = "Directory to process (prompted for when omitted)"
    )]
    pub path: Option<PathBuf>,

    /// Number of leading pages sent to the model
    #[arg(
        long,
        value_name = "N",
        default_value_t = 10,
        help = "Number of leading pages whose text is sent to the model"
    )]
    pub pages: usize,

    /// Model identifier
    #[arg(long, value_name = "NAME", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Response token cap
    #[arg(long, value_name = "N", default_value_t = 1000)]
    pub max_tokens: u32,

    /// Messages endpoint
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Fallback file for the API key
    #[arg(
        long,
        value_name = "PATH",
        help = "Env file read when ANTHROPIC_API_KEY is not set (default: ./.env)"
    )]
    pub env_file: Option<PathBuf>,

    /// Only show what would be done, don't make changes
    #[arg(
        long,
        short = 'd',
        help = "Query the model and show the planned names without rewriting or deleting any file"
    )]
    pub dry_run: bool,

    /// Output results in JSON format
    #[arg(
        long,
        help = "Print the run report as JSON instead of human-readable text"
    )]
    pub json: bool,

    /// Verbose output
    #[arg(long, short = 'v', help = "Enable verbose logging")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["pdf-renamer"]);
        assert!(args.path.is_none());
        assert_eq!(args.pages, 10);
        assert_eq!(args.model, DEFAULT_MODEL);
        assert_eq!(args.max_tokens, 1000);
        assert_eq!(args.api_url, DEFAULT_API_URL);
        assert!(!args.dry_run);
        assert!(!args.json);
    }

    #[test]
    fn test_path_and_flags() {
        let args = Args::parse_from([
            "pdf-renamer",
            "/tmp/papers",
            "--pages",
            "3",
            "-d",
            "--json",
            "--env-file",
            "secrets.env",
        ]);
        assert_eq!(args.path, Some(PathBuf::from("/tmp/papers")));
        assert_eq!(args.pages, 3);
        assert!(args.dry_run);
        assert!(args.json);
        assert_eq!(args.env_file, Some(PathBuf::from("secrets.env")));
    }
}
