/// Image chosen for display: the context image wins over any local candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplaySelection {
    Context(String),
    Candidate(String),
    #[default]
    Empty,
}

impl DisplaySelection {
    pub fn image(&self) -> Option<&str> {
        match self {
            Self::Context(image) | Self::Candidate(image) => Some(image),
            Self::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

pub fn select_display_image(current_image: Option<&str>, candidates: &[String]) -> DisplaySelection {
    if let Some(image) = current_image.filter(|image| !image.is_empty()) {
        return DisplaySelection::Context(image.to_string());
    }
    match candidates.first() {
        Some(first) => DisplaySelection::Candidate(first.clone()),
        None => DisplaySelection::Empty,
    }
}
