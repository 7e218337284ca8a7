//! Navegar command line.
//!
//! Scaffolds and inspects suite configuration:
//!
//! ```text
//! navegar init                         # write a default navegar.yaml
//! navegar --browser-name firefox config
//! navegar --config custom.yaml config
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use navegar::config::TestConfig;
use navegar::result::NavegarResult;
use navegar::session::BrowserKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BrowserArg {
    Chrome,
    Firefox,
    Ie,
}

impl From<BrowserArg> for BrowserKind {
    fn from(arg: BrowserArg) -> Self {
        match arg {
            BrowserArg::Chrome => Self::Chrome,
            BrowserArg::Firefox => Self::Firefox,
            BrowserArg::Ie => Self::Ie,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "navegar", version, about = "Page-object UI test harness")]
struct Cli {
    /// Browser the suite targets
    #[arg(long, value_enum, default_value = "chrome")]
    browser_name: BrowserArg,

    /// Configuration file to load instead of defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run the browser without a visible window
    #[arg(long)]
    headless: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Where to write the file
        #[arg(default_value = "navegar.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration as YAML
    Config,
}

fn load_config(cli: &Cli) -> NavegarResult<TestConfig> {
    let config = match &cli.config {
        Some(path) => TestConfig::from_file(path)?,
        None => TestConfig::default(),
    };
    let mut config = config.with_browser(cli.browser_name.into());
    config.headless = cli.headless;
    Ok(config)
}

fn run(cli: &Cli) -> NavegarResult<()> {
    match &cli.command {
        Commands::Init { path, force } => {
            if path.exists() && !force {
                return Err(navegar::result::NavegarError::Config {
                    message: format!("{} already exists (use --force to overwrite)", path.display()),
                });
            }
            let config = load_config(cli)?;
            std::fs::write(path, config.to_yaml()?)?;
            println!("wrote {}", path.display());
            Ok(())
        }
        Commands::Config => {
            let config = load_config(cli)?;
            print!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_browser_is_chrome() {
        let cli = Cli::try_parse_from(["navegar", "config"]).unwrap();
        assert_eq!(cli.browser_name, BrowserArg::Chrome);
    }

    #[test]
    fn test_browser_flag_is_applied() {
        let cli = Cli::try_parse_from(["navegar", "--browser-name", "firefox", "config"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.browser, BrowserKind::Firefox);
    }

    #[test]
    fn test_unknown_browser_is_rejected() {
        assert!(Cli::try_parse_from(["navegar", "--browser-name", "opera", "config"]).is_err());
    }

    #[test]
    fn test_init_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("navegar.yaml");
        let cli = Cli::try_parse_from([
            "navegar",
            "init",
            path.to_str().unwrap(),
        ])
        .unwrap();
        run(&cli).unwrap();
        let loaded = TestConfig::from_file(&path).unwrap();
        assert_eq!(loaded.browser, BrowserKind::Chrome);
    }

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("navegar.yaml");
        std::fs::write(&path, "browser: firefox\n").unwrap();
        let cli = Cli::try_parse_from(["navegar", "init", path.to_str().unwrap()]).unwrap();
        assert!(run(&cli).is_err());
    }

    #[test]
    fn test_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(&path, "base_url: https://shop.example.test\n").unwrap();
        let cli = Cli::try_parse_from([
            "navegar",
            "--config",
            path.to_str().unwrap(),
            "config",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.base_url, "https://shop.example.test");
    }
}
