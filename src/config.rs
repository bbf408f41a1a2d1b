use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::save::SaveController;

pub const DEFAULT_TYPE: &str = "rabbit";
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const WINDOW_SIZE: [f32; 2] = [800.0, 600.0];

/// Save clipboard images named by date and hour.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory the images are written to.
    #[arg(
        short = 'd',
        long = "directory",
        visible_alias = "dir",
        value_name = "DIR",
        default_value = "."
    )]
    pub directory: PathBuf,

    /// File name prefix, also shown in the window title.
    #[arg(short = 't', long = "type", value_name = "NAME", default_value = DEFAULT_TYPE)]
    pub kind: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub directory: PathBuf,
    pub kind: String,
    pub tick_interval: Duration,
    pub poll_interval: Duration,
    pub window_size: [f32; 2],
}

impl Settings {
    pub fn title(&self) -> String {
        format!("Save {}", self.kind)
    }

    pub fn save_controller(&self) -> SaveController {
        SaveController::new(&self.directory, &self.kind)
    }
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Self {
            directory: cli.directory,
            kind: cli.kind,
            tick_interval: TICK_INTERVAL,
            poll_interval: POLL_INTERVAL,
            window_size: WINDOW_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["saverabbit"]).unwrap();
        assert_eq!(cli.directory, PathBuf::from("."));
        assert_eq!(cli.kind, "rabbit");
        let settings = Settings::from(cli);
        assert_eq!(settings.title(), "Save rabbit");
        assert_eq!(settings.poll_interval, Duration::from_secs(10));
    }

    #[test]
    fn every_directory_spelling_is_accepted() {
        for flag in ["--directory", "--dir", "-d"] {
            let cli = Cli::try_parse_from(["saverabbit", flag, "/tmp/out"]).unwrap();
            assert_eq!(cli.directory, PathBuf::from("/tmp/out"));
        }
    }

    #[test]
    fn type_sets_prefix_and_title() {
        for flag in ["--type", "-t"] {
            let settings = Settings::from(Cli::try_parse_from(["saverabbit", flag, "cat"]).unwrap());
            assert_eq!(settings.kind, "cat");
            assert_eq!(settings.title(), "Save cat");
            assert_eq!(settings.save_controller().directory(), PathBuf::from("."));
        }
    }
}
