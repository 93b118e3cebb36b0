//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings. Embedded documents (identity payload,
//! creator snapshot, technologies, tags, reviews) are compact JSON.

use std::str::FromStr as _;

use chrono::{DateTime, Utc};
use stackr_core::{
  creator::{Creator, CreatorSnapshot},
  id::{CreatorId, StackId},
  identity::VerifiedIdentity,
  stack::{Category, Review, Stack},
  technology::Technology,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Category ────────────────────────────────────────────────────────────────

pub fn encode_category(c: Category) -> &'static str { c.as_str() }

pub fn decode_category(s: &str) -> Result<Category> {
  Category::from_str(s).map_err(|_| Error::UnknownValue {
    column: "category",
    value:  s.to_owned(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawCreator::from_row`].
pub const CREATOR_COLUMNS: &str = "creator_id, name, username, avatar, expertise, bio, \
                                   github, twitter, identity_json, created_at, updated_at";

/// Raw strings read directly from a `creators` row.
pub struct RawCreator {
  pub creator_id:    String,
  pub name:          String,
  pub username:      String,
  pub avatar:        String,
  pub expertise:     String,
  pub bio:           String,
  pub github:        Option<String>,
  pub twitter:       Option<String>,
  pub identity_json: String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawCreator {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      creator_id:    row.get(0)?,
      name:          row.get(1)?,
      username:      row.get(2)?,
      avatar:        row.get(3)?,
      expertise:     row.get(4)?,
      bio:           row.get(5)?,
      github:        row.get(6)?,
      twitter:       row.get(7)?,
      identity_json: row.get(8)?,
      created_at:    row.get(9)?,
      updated_at:    row.get(10)?,
    })
  }

  pub fn into_creator(self) -> Result<Creator> {
    let identity: VerifiedIdentity = serde_json::from_str(&self.identity_json)?;
    Ok(Creator {
      id: CreatorId::new(self.creator_id),
      name: self.name,
      username: self.username,
      avatar: self.avatar,
      expertise: self.expertise,
      bio: self.bio,
      github: self.github,
      twitter: self.twitter,
      identity,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching [`RawStack::from_row`].
pub const STACK_COLUMNS: &str = "stack_id, title, description, category, technologies_json, \
                                 tags_json, creator_json, reviews_json, rating, created_at, \
                                 updated_at";

/// Raw values read directly from a `stacks` row.
pub struct RawStack {
  pub stack_id:          String,
  pub title:             String,
  pub description:       String,
  pub category:          String,
  pub technologies_json: String,
  pub tags_json:         String,
  pub creator_json:      String,
  pub reviews_json:      String,
  pub rating:            f64,
  pub created_at:        String,
  pub updated_at:        String,
}

impl RawStack {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      stack_id:          row.get(0)?,
      title:             row.get(1)?,
      description:       row.get(2)?,
      category:          row.get(3)?,
      technologies_json: row.get(4)?,
      tags_json:         row.get(5)?,
      creator_json:      row.get(6)?,
      reviews_json:      row.get(7)?,
      rating:            row.get(8)?,
      created_at:        row.get(9)?,
      updated_at:        row.get(10)?,
    })
  }

  pub fn into_stack(self) -> Result<Stack> {
    let technologies: Vec<Technology> = serde_json::from_str(&self.technologies_json)?;
    let tags: Vec<String> = serde_json::from_str(&self.tags_json)?;
    let creator: CreatorSnapshot = serde_json::from_str(&self.creator_json)?;
    let reviews: Vec<Review> = serde_json::from_str(&self.reviews_json)?;

    Ok(Stack {
      id: StackId::new(self.stack_id),
      title: self.title,
      description: self.description,
      category: decode_category(&self.category)?,
      technologies,
      tags,
      creator,
      reviews,
      rating: self.rating,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching [`technology_from_row`].
pub const TECHNOLOGY_COLUMNS: &str = "name, category, tag, website, description";

pub fn technology_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Technology> {
  Ok(Technology {
    name:        row.get(0)?,
    category:    row.get(1)?,
    tag:         row.get(2)?,
    website:     row.get(3)?,
    description: row.get(4)?,
  })
}
