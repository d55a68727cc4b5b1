//! Author model and derived display fields

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Full author record from storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Validated author fields, ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl NewAuthor {
    pub fn into_author(self, id: Uuid) -> Author {
        Author {
            id,
            first_name: self.first_name,
            family_name: self.family_name,
            date_of_birth: self.date_of_birth,
            date_of_death: self.date_of_death,
        }
    }
}

/// Medium date form used across the catalog pages, e.g. `Oct 19, 2026`
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

impl Author {
    /// "first family", or empty when either name is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{} {}", self.first_name, self.family_name)
    }

    /// Lifespan in years relative to the current year
    pub fn lifespan(&self) -> Option<i32> {
        self.lifespan_in(Utc::now().year())
    }

    /// Lifespan in years; a living author is measured up to `current_year`.
    pub fn lifespan_in(&self, current_year: i32) -> Option<i32> {
        let born = self.date_of_birth?.year();
        match self.date_of_death {
            Some(died) => Some(died.year() - born),
            None => Some(current_year - born),
        }
    }

    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }

    pub fn formatted_date_of_birth(&self) -> String {
        format_date(self.date_of_birth)
    }

    pub fn formatted_date_of_death(&self) -> String {
        format_date(self.date_of_death)
    }
}

/// Author as handed to templates, with the derived fields computed on read
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub name: String,
    pub lifespan: String,
    pub url: String,
    pub formatted_date_of_birth: String,
    pub formatted_date_of_death: String,
}

impl From<&Author> for AuthorView {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            name: author.name(),
            lifespan: author
                .lifespan()
                .map(|years| years.to_string())
                .unwrap_or_default(),
            url: author.url(),
            formatted_date_of_birth: author.formatted_date_of_birth(),
            formatted_date_of_death: author.formatted_date_of_death(),
        }
    }
}

/// Select entry on the book form
#[derive(Debug, Clone, Serialize)]
pub struct AuthorOption {
    pub id: Uuid,
    pub name: String,
    pub selected: bool,
}

impl AuthorOption {
    pub fn mark(authors: &[Author], selected: &str) -> Vec<Self> {
        authors
            .iter()
            .map(|author| Self {
                id: author.id,
                name: author.name(),
                selected: author.id.to_string() == selected,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(first: &str, family: &str) -> Author {
        Author {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_name() {
        assert_eq!(author("Ursula", "Le Guin").name(), "Ursula Le Guin");
        assert_eq!(author("", "Le Guin").name(), "");
        assert_eq!(author("Ursula", "").name(), "");
    }

    #[test]
    fn test_lifespan() {
        let mut a = author("Isaac", "Asimov");
        assert_eq!(a.lifespan_in(2026), None);

        a.date_of_birth = date(1920, 1, 2);
        assert_eq!(a.lifespan_in(2026), Some(106));

        a.date_of_death = date(1992, 4, 6);
        assert_eq!(a.lifespan_in(2026), Some(72));
    }

    #[test]
    fn test_death_without_birth_has_no_lifespan() {
        let mut a = author("Ben", "Bova");
        a.date_of_death = date(2020, 11, 29);
        assert_eq!(a.lifespan_in(2026), None);
    }

    #[test]
    fn test_url_and_dates() {
        let mut a = author("Jim", "Jones");
        a.date_of_birth = date(1971, 12, 16);
        assert_eq!(a.url(), format!("/catalog/author/{}", a.id));
        assert_eq!(a.formatted_date_of_birth(), "Dec 16, 1971");
        assert_eq!(a.formatted_date_of_death(), "");
    }

    #[test]
    fn test_view_carries_derived_fields() {
        let mut a = author("Patrick", "Rothfuss");
        a.date_of_birth = date(1973, 6, 6);
        a.date_of_death = date(2000, 1, 1);
        let view = AuthorView::from(&a);
        assert_eq!(view.name, "Patrick Rothfuss");
        assert_eq!(view.lifespan, "27");
        assert_eq!(view.formatted_date_of_birth, "Jun 6, 1973");
        assert_eq!(view.url, a.url());
    }
}
