use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "lwedit")]
#[command(about = "A minimal tabbed text editor with Python highlighting")]
#[command(version)]
pub struct Cli {
    /// Files to open, one tab each (missing files open as empty buffers)
    pub files: Vec<PathBuf>,

    /// Configuration file (defaults to <config dir>/lwedit/config.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to this file (the terminal is owned by the editor)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_files_and_options() {
        let cli = Cli::parse_from([
            "lwedit",
            "a.py",
            "notes.txt",
            "--log-file",
            "/tmp/lwedit.log",
            "-v",
        ]);
        assert_eq!(
            cli.files,
            vec![PathBuf::from("a.py"), PathBuf::from("notes.txt")]
        );
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/lwedit.log")));
        assert_eq!(cli.config, None);
        assert!(cli.verbose);
    }
}
