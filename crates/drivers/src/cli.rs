use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use meme_studio_domain::UnauthorizedBehavior;

#[derive(Debug, Parser)]
#[command(name = "meme-studio")]
#[command(version, about = "Meme editor core: style state, display, catalog and style transfer", long_about = None)]
pub struct Cli {
    /// JSON config file (falls back to $MEME_STUDIO_CONFIG)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log filter, overrides the config file
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply the style of one image to another
    Stylize {
        /// Content image
        content: PathBuf,

        /// Style image
        style: PathBuf,

        /// Output image
        output: PathBuf,

        /// Style strength in [0, 1]
        strength: Option<f32>,

        /// Seconds before falling back to a plain copy of the content image
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Inspect or change the persisted style state
    State {
        #[command(subcommand)]
        action: StateAction,
    },

    /// Resolve the image that would be displayed and optionally render it
    Display(DisplayArgs),

    /// Resolve a location to a page
    Route {
        /// Location path, e.g. /meme-generator/3
        path: String,
    },

    /// Manage meme templates
    Templates {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Manage saved memes
    Memes {
        #[command(subcommand)]
        action: MemeAction,
    },

    /// Manage collages
    Collages {
        #[command(subcommand)]
        action: CollageAction,
    },

    /// Browse the AI style catalog
    Styles {
        #[command(subcommand)]
        action: StyleAction,
    },

    /// Talk to the meme backend
    Api {
        #[command(subcommand)]
        action: ApiAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum StateAction {
    /// Print the current style state
    Show,

    /// Replace the current image
    SetImage {
        /// Data URI or path to an image file
        source: String,

        /// Read SOURCE as a file and store it as a data URI
        #[arg(long)]
        embed: bool,
    },

    /// Store a stylized image as the current image
    ApplyStyle {
        /// Data URI or path to an image file
        source: String,

        /// Name of the style that produced it; omitting it clears the
        /// recorded style
        #[arg(long, value_name = "NAME")]
        style: Option<String>,

        /// Read SOURCE as a file and store it as a data URI
        #[arg(long)]
        embed: bool,
    },

    /// Record the last style used; an empty name clears it
    SetStyle { name: String },

    /// Forget both fields
    Clear,
}

#[derive(Debug, Args)]
pub struct DisplayArgs {
    /// Local fallback images, in order of preference
    #[arg(long = "candidate", value_name = "SOURCE")]
    pub candidates: Vec<String>,

    /// Write the drawn surface to this PNG
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// How long to wait for the decode
    #[arg(long, value_name = "MS", default_value_t = 5000)]
    pub wait_ms: u64,
}

#[derive(Debug, Subcommand)]
pub enum TemplateAction {
    /// List templates visible to everyone, or to one user
    List {
        #[arg(long)]
        user: Option<i64>,
    },
    /// Show one template as JSON
    Show { id: i64 },
    /// Create a template
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        image_url: String,
        #[arg(long)]
        user: Option<i64>,
        /// Only visible to its owner
        #[arg(long)]
        private: bool,
    },
    /// Import every image in a folder as a public template
    Import { folder: String },
    /// Rename a template or change its visibility
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        public: Option<bool>,
    },
    /// Delete a template
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum MemeAction {
    /// List saved memes for a user
    List {
        #[arg(long)]
        user: Option<i64>,
    },
    /// Show one meme as JSON
    Show { id: i64 },
    /// Save a meme
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        image_url: String,
        #[arg(long)]
        template: Option<i64>,
        #[arg(long)]
        style: Option<String>,
    },
    /// Delete a meme
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum CollageAction {
    /// List collages for a user
    List {
        #[arg(long)]
        user: Option<i64>,
    },
    /// Show one collage as JSON
    Show { id: i64 },
    /// Save a collage
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        image_url: String,
        #[arg(long)]
        layout: String,
        /// Source image, repeatable
        #[arg(long = "source", value_name = "SOURCE")]
        sources: Vec<String>,
    },
    /// Delete a collage
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum StyleAction {
    /// List every style
    List,
    /// Show one style as JSON
    Show { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum ApiAction {
    /// GET a path and print the JSON reply
    Get {
        path: String,

        /// What to do when the backend answers 401
        #[arg(long = "on-401", value_enum, default_value_t = OnUnauthorized::Throw)]
        on_unauthorized: OnUnauthorized,
    },

    /// Send an image to the backend style endpoint and keep the result
    ApplyStyle {
        /// Image file to stylize
        image: PathBuf,

        /// Backend style id
        style_id: i64,

        /// Name recorded as the last style used; looked up from the
        /// backend when omitted
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnUnauthorized {
    ReturnNull,
    Throw,
}

impl From<OnUnauthorized> for UnauthorizedBehavior {
    fn from(value: OnUnauthorized) -> Self {
        match value {
            OnUnauthorized::ReturnNull => UnauthorizedBehavior::ReturnNull,
            OnUnauthorized::Throw => UnauthorizedBehavior::Throw,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("meme-studio").chain(args.iter().copied()))
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn stylize_strength_is_optional() {
        let cli = parse(&["stylize", "in.png", "style.png", "out.png"]).expect("parse");
        assert!(matches!(
            cli.command,
            Command::Stylize { strength: None, .. }
        ));

        let cli = parse(&["stylize", "in.png", "style.png", "out.png", "0.4"]).expect("parse");
        assert!(matches!(
            cli.command,
            Command::Stylize {
                strength: Some(value),
                ..
            } if (value - 0.4).abs() < f32::EPSILON
        ));
    }

    #[test]
    fn stylize_requires_three_paths() {
        assert!(parse(&["stylize", "in.png", "style.png"]).is_err());
    }

    #[test]
    fn api_get_accepts_unauthorized_policy() {
        let cli = parse(&["api", "get", "/api/user", "--on-401", "return-null"]).expect("parse");
        match cli.command {
            Command::Api {
                action:
                    ApiAction::Get {
                        path,
                        on_unauthorized,
                    },
            } => {
                assert_eq!(path, "/api/user");
                assert_eq!(
                    UnauthorizedBehavior::from(on_unauthorized),
                    UnauthorizedBehavior::ReturnNull
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn display_collects_repeated_candidates() {
        let cli = parse(&[
            "display",
            "--candidate",
            "a.png",
            "--candidate",
            "b.png",
            "--config",
            "cfg.json",
        ])
        .expect("parse");
        assert_eq!(cli.config, Some(PathBuf::from("cfg.json")));
        match cli.command {
            Command::Display(args) => {
                assert_eq!(args.candidates, vec!["a.png", "b.png"]);
                assert_eq!(args.wait_ms, 5000);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn api_apply_style_takes_numeric_style_id() {
        let cli = parse(&["api", "apply-style", "in.png", "4"]).expect("parse");
        assert!(matches!(
            cli.command,
            Command::Api {
                action: ApiAction::ApplyStyle {
                    style_id: 4,
                    name: None,
                    ..
                }
            }
        ));
        assert!(parse(&["api", "apply-style", "in.png", "neon"]).is_err());
    }

    #[test]
    fn styles_show_requires_id() {
        assert!(matches!(
            parse(&["styles", "show", "2"]).expect("parse").command,
            Command::Styles {
                action: StyleAction::Show { id: 2 }
            }
        ));
        assert!(parse(&["styles", "show"]).is_err());
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(parse(&["paint"]).is_err());
    }
}
