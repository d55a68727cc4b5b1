//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}

/// Genre for list/detail pages
#[derive(Debug, Clone, Serialize)]
pub struct GenreView {
    pub id: Uuid,
    pub name: String,
    pub url: String,
}

impl From<&Genre> for GenreView {
    fn from(genre: &Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name.clone(),
            url: genre.url(),
        }
    }
}

/// Checkbox entry on the book form
#[derive(Debug, Clone, Serialize)]
pub struct GenreOption {
    pub id: Uuid,
    pub name: String,
    pub checked: bool,
}

impl GenreOption {
    /// Mark every genre whose identifier appears in `selected`.
    pub fn mark(genres: &[Genre], selected: &[String]) -> Vec<Self> {
        genres
            .iter()
            .map(|genre| {
                let id = genre.id.to_string();
                Self {
                    id: genre.id,
                    name: genre.name.clone(),
                    checked: selected.iter().any(|s| *s == id),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_selected_genres() {
        let fantasy = Genre { id: Uuid::new_v4(), name: "Fantasy".to_string() };
        let poetry = Genre { id: Uuid::new_v4(), name: "Poetry".to_string() };
        let options = GenreOption::mark(
            &[fantasy.clone(), poetry.clone()],
            &[poetry.id.to_string(), "not-a-genre".to_string()],
        );
        assert_eq!(options.len(), 2);
        assert!(!options[0].checked);
        assert!(options[1].checked);
    }
}
