use crate::config::AppConfig;
use crate::domain::model::{Field, VenueDraft};
use crate::i18n::Language;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "wedding-planner")]
#[command(about = "Plan the wedding: venues, checklist and budget", version)]
pub struct Cli {
    #[arg(long, global = true, help = "Read settings from a TOML file instead of the environment")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, env = "PLANNER_EMAIL", help = "Sign in with this email first")]
    pub email: Option<String>,

    #[arg(long, global = true, env = "PLANNER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the coordinates behind a maps URL or a "lat,lng" pair
    Resolve { reference: String },

    /// List the venues as a table
    Venues {
        #[arg(long, help = "Sort by region, name, price, comment, map, external_link or created_at")]
        sort: Option<Field>,

        #[arg(long)]
        desc: bool,

        #[arg(long)]
        lang: Option<Language>,
    },

    /// Add a venue
    Add(VenueArgs),

    /// Replace the fields of an existing venue
    Edit {
        id: String,

        #[command(flatten)]
        venue: VenueArgs,
    },

    /// Delete a venue
    Delete { id: String },

    /// Write the venue list as CSV
    Export {
        #[arg(long, help = "Output file, stdout when omitted")]
        output: Option<PathBuf>,
    },

    /// Render a page as HTML
    Render {
        route: String,

        #[arg(long)]
        lang: Option<Language>,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Create an account with --email and --password
    SignUp,

    /// Revoke the saved session
    SignOut,
}

#[derive(Debug, Clone, Args)]
pub struct VenueArgs {
    #[arg(long)]
    pub region: String,

    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub price: String,

    #[arg(long, default_value = "")]
    pub comment: String,

    #[arg(long, default_value = "", help = "Google Maps URL or \"lat,lng\"")]
    pub map: String,

    #[arg(long)]
    pub link: Option<String>,
}

impl From<VenueArgs> for VenueDraft {
    fn from(args: VenueArgs) -> Self {
        VenueDraft {
            region: args.region,
            name: args.name,
            price: args.price,
            comment: args.comment,
            map: args.map,
            external_link: args.link,
        }
    }
}

impl Cli {
    pub fn load_config(&self) -> Result<AppConfig> {
        match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                AppConfig::from_file(path)
            }
            None => AppConfig::from_env(),
        }
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.email.as_deref()?, self.password.as_deref()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_venues_sorting() {
        let cli = Cli::try_parse_from(["wedding-planner", "venues", "--sort", "price", "--desc"]).unwrap();
        match cli.command {
            Command::Venues { sort, desc, lang } => {
                assert_eq!(sort, Some(Field::Price));
                assert!(desc);
                assert_eq!(lang, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_desc_alone_sorts_default_column_descending() {
        let cli = Cli::try_parse_from(["wedding-planner", "venues", "--desc"]).unwrap();
        match cli.command {
            Command::Venues { sort, desc, .. } => {
                assert_eq!(sort, None);
                assert!(desc);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_add_into_draft() {
        let cli = Cli::try_parse_from([
            "wedding-planner",
            "add",
            "--region",
            "Bourgogne",
            "--name",
            "Château de Savigny",
            "--price",
            "4200",
            "--map",
            "47.0644992,4.8175578",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Add(args) = cli.command else {
            panic!("expected add");
        };
        let draft = VenueDraft::from(args);
        assert_eq!(draft.name, "Château de Savigny");
        assert_eq!(draft.comment, "");
        assert_eq!(draft.external_link, None);
    }

    #[test]
    fn test_render_language() {
        let cli = Cli::try_parse_from(["wedding-planner", "render", "/budget", "--lang", "ja"]).unwrap();
        assert!(matches!(cli.command, Command::Render { lang: Some(Language::Ja), .. }));
    }
}
