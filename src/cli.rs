use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "havaa",
    version,
    about = "Weather-aware situations, music and clothing in your terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config and test connections
    Check,
    /// Fetch the weather once and print the matching situation
    Match {
        /// Print as JSON
        #[arg(long)]
        json: bool,
        /// Categorize as if it were this hour of the day (0-23)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,
    },
    /// Manage situations
    #[command(subcommand)]
    Situation(SituationCommand),
    /// Manage music
    #[command(subcommand)]
    Music(MusicCommand),
    /// Manage clothing
    #[command(subcommand)]
    Clothing(ClothingCommand),
    /// Attach music or clothing to a situation
    #[command(subcommand)]
    Assign(AssociationCommand),
    /// Detach music or clothing from a situation
    #[command(subcommand)]
    Unassign(AssociationCommand),
}

/// Weather pattern flags. Each accepts a category name or `any`.
#[derive(Args, Debug, Default)]
pub struct PatternArgs {
    /// sunny, cloudy, rainy, snowy, stormy, foggy
    #[arg(long)]
    pub weather: Option<String>,
    /// cold, mild, hot
    #[arg(long)]
    pub temperature: Option<String>,
    /// dry, normal, humid
    #[arg(long)]
    pub humidity: Option<String>,
    /// calm, breezy, windy
    #[arg(long)]
    pub wind: Option<String>,
    /// morning, noon, evening, night
    #[arg(long)]
    pub time_of_day: Option<String>,
    /// happy, sad, energetic, calm, romantic (or `none`)
    #[arg(long)]
    pub mood: Option<String>,
    /// City tag (empty to clear)
    #[arg(long)]
    pub city: Option<String>,
}

#[derive(Subcommand)]
pub enum SituationCommand {
    /// List all situations, newest first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add a situation; omitted dimensions are wildcards
    Add {
        /// Persian sentence shown on the display
        #[arg(long)]
        sentence: String,
        #[command(flatten)]
        pattern: PatternArgs,
    },
    /// Change fields of an existing situation
    Edit {
        id: String,
        #[arg(long)]
        sentence: Option<String>,
        #[command(flatten)]
        pattern: PatternArgs,
    },
    /// Delete a situation and its assignments
    Remove { id: String },
}

#[derive(Subcommand)]
pub enum MusicCommand {
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add music from a Spotify track, album or playlist link
    Add {
        url: String,
        /// Override the resolved title
        #[arg(long)]
        title: Option<String>,
        /// Override the resolved artist
        #[arg(long)]
        artist: Option<String>,
        /// Skip Spotify lookup; requires --title and --artist
        #[arg(long)]
        offline: bool,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        artist: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        cover_url: Option<String>,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ClothingCommand {
    List {
        #[arg(long)]
        json: bool,
    },
    Add {
        /// Persian description
        description: String,
        /// Optional English phrase
        #[arg(long)]
        english: Option<String>,
    },
    Edit {
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        english: Option<String>,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum AssociationCommand {
    Music {
        situation_id: String,
        music_id: String,
    },
    Clothing {
        situation_id: String,
        clothing_id: String,
    },
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
    fn parses_situation_add() {
        let cli = Cli::try_parse_from([
            "havaa",
            "situation",
            "add",
            "--sentence",
            "باران می‌بارد",
            "--weather",
            "rainy",
            "--time-of-day",
            "evening",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Situation(SituationCommand::Add { sentence, pattern })) => {
                assert_eq!(sentence, "باران می‌بارد");
                assert_eq!(pattern.weather.as_deref(), Some("rainy"));
                assert_eq!(pattern.time_of_day.as_deref(), Some("evening"));
                assert!(pattern.wind.is_none());
            }
            _ => panic!("expected situation add"),
        }
    }

    #[test]
    fn match_hour_is_range_checked() {
        assert!(Cli::try_parse_from(["havaa", "match", "--hour", "24"]).is_err());
        assert!(Cli::try_parse_from(["havaa", "match", "--hour", "23", "--json"]).is_ok());
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["havaa", "-vv"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 2);
    }
}
