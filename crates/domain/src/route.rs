use crate::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Editor,
    MemeGenerator { meme_id: Option<RecordId> },
    SimpleMeme { meme_id: Option<RecordId> },
    CollageCreator,
    Templates,
    NotFound,
}

impl Route {
    /// Maps a location path to its page. `/memes` is an alias of `/meme-generator`.
    pub fn resolve(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["editor"] => Self::Editor,
            ["meme-generator" | "memes"] => Self::MemeGenerator { meme_id: None },
            ["meme-generator" | "memes", id] => match parse_id(id) {
                Some(meme_id) => Self::MemeGenerator {
                    meme_id: Some(meme_id),
                },
                None => Self::NotFound,
            },
            ["simple-meme"] => Self::SimpleMeme { meme_id: None },
            ["simple-meme", id] => match parse_id(id) {
                Some(meme_id) => Self::SimpleMeme {
                    meme_id: Some(meme_id),
                },
                None => Self::NotFound,
            },
            ["collage-creator"] => Self::CollageCreator,
            ["templates"] => Self::Templates,
            _ => Self::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Editor => "/editor".to_string(),
            Self::MemeGenerator { meme_id: None } => "/meme-generator".to_string(),
            Self::MemeGenerator { meme_id: Some(id) } => format!("/meme-generator/{}", id.get()),
            Self::SimpleMeme { meme_id: None } => "/simple-meme".to_string(),
            Self::SimpleMeme { meme_id: Some(id) } => format!("/simple-meme/{}", id.get()),
            Self::CollageCreator => "/collage-creator".to_string(),
            Self::Templates => "/templates".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Editor => "Image Editor",
            Self::MemeGenerator { .. } => "Meme Generator",
            Self::SimpleMeme { .. } => "Simple Meme Generator",
            Self::CollageCreator => "Collage Creator",
            Self::Templates => "Templates",
            Self::NotFound => "Not Found",
        }
    }
}

fn parse_id(segment: &str) -> Option<RecordId> {
    segment
        .parse::<i64>()
        .ok()
        .and_then(|value| RecordId::new(value).ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub title: &'static str,
    pub href: &'static str,
}

impl NavItem {
    pub fn is_active(&self, location: &str) -> bool {
        self.href == location
    }
}

pub const NAV_ITEMS: [NavItem; 4] = [
    NavItem {
        title: "Home",
        href: "/",
    },
    NavItem {
        title: "Meme Generator",
        href: "/meme-generator",
    },
    NavItem {
        title: "Collage Creator",
        href: "/collage-creator",
    },
    NavItem {
        title: "Templates",
        href: "/templates",
    },
];
