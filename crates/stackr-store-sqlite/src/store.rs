//! [`SqliteStore`], the SQLite implementation of [`CatalogStore`].

use std::{path::Path, time::Duration};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, types::Value};
use stackr_core::{
  creator::{Creator, CreatorPatch},
  id::{CreatorId, StackId},
  stack::{Review, Stack, StackPatch},
  store::{CatalogStore, CreatorConflict, CreatorQuery, StackFilter, StackOrder, StackQuery},
  technology::Technology,
};

use crate::{
  Result,
  encode::{
    CREATOR_COLUMNS, RawCreator, RawStack, STACK_COLUMNS, TECHNOLOGY_COLUMNS, encode_category,
    encode_dt, technology_from_row,
  },
  error::Error,
  schema::SCHEMA,
};

/// How long a statement waits on a locked database before failing.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Stackr catalog backed by a single SQLite file.
///
/// Clones share the same background connection.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT).await
  }

  /// Like [`open`](Self::open), bounding every statement by `busy_timeout`.
  pub async fn open_with_timeout(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init(busy_timeout).await?;
    Ok(store)
  }

  /// Open a private in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init(DEFAULT_BUSY_TIMEOUT).await?;
    Ok(store)
  }

  async fn init(&self, busy_timeout: Duration) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Query helpers ───────────────────────────────────────────────────────────

fn select_stack(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<Option<RawStack>> {
  conn
    .query_row(
      &format!("SELECT {STACK_COLUMNS} FROM stacks WHERE stack_id = ?1"),
      rusqlite::params![id],
      RawStack::from_row,
    )
    .optional()
}

fn select_creator(
  conn: &rusqlite::Connection,
  column: &str,
  value: &str,
) -> rusqlite::Result<Option<RawCreator>> {
  conn
    .query_row(
      &format!("SELECT {CREATOR_COLUMNS} FROM creators WHERE {column} = ?1 LIMIT 1"),
      rusqlite::params![value],
      RawCreator::from_row,
    )
    .optional()
}

/// Build a `WHERE` clause for `filter`, returning it with its bound values.
/// Placeholders are numbered from `?1`.
fn filter_clause(filter: &StackFilter) -> (String, Vec<Value>) {
  let mut conds: Vec<String> = Vec::new();
  let mut values: Vec<Value> = Vec::new();

  if let Some(category) = filter.category {
    values.push(Value::Text(encode_category(category).to_owned()));
    conds.push(format!("category = ?{}", values.len()));
  }
  if let Some(rating) = filter.rating {
    values.push(Value::Real(rating));
    conds.push(format!("rating = ?{}", values.len()));
  }
  if let Some(creator_id) = &filter.creator_id {
    values.push(Value::Text(creator_id.as_str().to_owned()));
    conds.push(format!("creator_id = ?{}", values.len()));
  }

  let clause = if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  };
  (clause, values)
}

/// Which creator key a failed `INSERT INTO creators` collided with.
fn creator_conflict(err: &rusqlite::Error) -> Option<CreatorConflict> {
  let rusqlite::Error::SqliteFailure(failure, Some(message)) = err else {
    return None;
  };
  if failure.code != rusqlite::ErrorCode::ConstraintViolation {
    return None;
  }
  match message.strip_prefix("UNIQUE constraint failed: creators.")? {
    "creator_id" => Some(CreatorConflict::Id),
    "subject" => Some(CreatorConflict::Subject),
    "email" => Some(CreatorConflict::Email),
    "username" => Some(CreatorConflict::Username),
    _ => None,
  }
}

/// Column 0 as a count; a negative value is an out-of-range error.
fn count_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<u64> { row.get(0) }

fn to_i64(n: u64) -> i64 { i64::try_from(n).unwrap_or(i64::MAX) }

fn decode_stacks(raws: Vec<RawStack>) -> Result<Vec<Stack>> {
  raws.into_iter().map(RawStack::into_stack).collect()
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  // ── Creators ──────────────────────────────────────────────────────────────

  async fn insert_creator(
    &self,
    creator: Creator,
  ) -> Result<std::result::Result<Creator, CreatorConflict>> {
    let id_str        = creator.id.to_string();
    let name          = creator.name.clone();
    let username      = creator.username.clone();
    let avatar        = creator.avatar.clone();
    let expertise     = creator.expertise.clone();
    let bio           = creator.bio.clone();
    let github        = creator.github.clone();
    let twitter       = creator.twitter.clone();
    let subject       = creator.identity.subject.clone();
    let email         = creator.identity.email.clone();
    let identity_json = serde_json::to_string(&creator.identity)?;
    let created_str   = encode_dt(creator.created_at);
    let updated_str   = encode_dt(creator.updated_at);

    let conflict = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO creators (
             creator_id, name, username, avatar, expertise, bio, github, twitter,
             subject, email, identity_json, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            id_str,
            name,
            username,
            avatar,
            expertise,
            bio,
            github,
            twitter,
            subject,
            email,
            identity_json,
            created_str,
            updated_str,
          ],
        );
        match inserted {
          Ok(_) => Ok(None),
          Err(e) => match creator_conflict(&e) {
            Some(conflict) => Ok(Some(conflict)),
            None => Err(e.into()),
          },
        }
      })
      .await?;

    Ok(match conflict {
      Some(conflict) => Err(conflict),
      None => Ok(creator),
    })
  }

  async fn find_creator(&self, query: CreatorQuery) -> Result<Option<Creator>> {
    let (column, value) = match query {
      CreatorQuery::Id(id) => ("creator_id", id.to_string()),
      CreatorQuery::Subject(sub) => ("subject", sub),
      CreatorQuery::Email(email) => ("email", email),
      CreatorQuery::Username(username) => ("username", username),
    };

    let raw = self
      .conn
      .call(move |conn| Ok(select_creator(conn, column, &value)?))
      .await?;

    raw.map(RawCreator::into_creator).transpose()
  }

  async fn update_creator(&self, id: CreatorId, patch: CreatorPatch) -> Result<Option<Creator>> {
    let id_str = id.to_string();
    let now    = encode_dt(Utc::now());
    let CreatorPatch { name, username, avatar, expertise, bio, github, twitter } = patch;

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE creators SET
             name       = COALESCE(?2, name),
             username   = COALESCE(?3, username),
             avatar     = COALESCE(?4, avatar),
             expertise  = COALESCE(?5, expertise),
             bio        = COALESCE(?6, bio),
             github     = COALESCE(?7, github),
             twitter    = COALESCE(?8, twitter),
             updated_at = ?9
           WHERE creator_id = ?1",
          rusqlite::params![id_str, name, username, avatar, expertise, bio, github, twitter, now],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_creator(conn, "creator_id", &id_str)?)
      })
      .await?;

    raw.map(RawCreator::into_creator).transpose()
  }

  // ── Technologies ──────────────────────────────────────────────────────────

  async fn insert_technologies(&self, technologies: Vec<Technology>) -> Result<Vec<Technology>> {
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO technologies (name, category, tag, website, description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for t in &technologies {
            stmt.execute(rusqlite::params![t.name, t.category, t.tag, t.website, t.description])?;
          }
        }
        tx.commit()?;
        Ok(technologies)
      })
      .await?;

    Ok(inserted)
  }

  async fn find_technologies(&self) -> Result<Vec<Technology>> {
    let techs = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {TECHNOLOGY_COLUMNS} FROM technologies ORDER BY seq"))?;
        let rows = stmt
          .query_map([], technology_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(techs)
  }

  // ── Stacks ────────────────────────────────────────────────────────────────

  async fn insert_stack(&self, stack: Stack) -> Result<Stack> {
    let id_str            = stack.id.to_string();
    let title             = stack.title.clone();
    let description       = stack.description.clone();
    let category          = encode_category(stack.category);
    let technologies_json = serde_json::to_string(&stack.technologies)?;
    let tags_json         = serde_json::to_string(&stack.tags)?;
    let creator_id        = stack.creator.id.to_string();
    let creator_json      = serde_json::to_string(&stack.creator)?;
    let reviews_json      = serde_json::to_string(&stack.reviews)?;
    let rating            = stack.rating;
    let created_str       = encode_dt(stack.created_at);
    let updated_str       = encode_dt(stack.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO stacks (
             stack_id, title, description, category, technologies_json, tags_json,
             creator_id, creator_json, reviews_json, rating, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          rusqlite::params![
            id_str,
            title,
            description,
            category,
            technologies_json,
            tags_json,
            creator_id,
            creator_json,
            reviews_json,
            rating,
            created_str,
            updated_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(stack)
  }

  async fn find_stack(&self, id: StackId) -> Result<Option<Stack>> {
    let id_str = id.to_string();
    let raw = self
      .conn
      .call(move |conn| Ok(select_stack(conn, &id_str)?))
      .await?;
    raw.map(RawStack::into_stack).transpose()
  }

  async fn find_stacks(&self, query: StackQuery) -> Result<Vec<Stack>> {
    let (where_clause, mut values) = filter_clause(&query.filter);

    let order_clause = match query.order {
      StackOrder::Natural => "ORDER BY seq",
      StackOrder::RatingDesc => "ORDER BY rating DESC",
    };

    let window_clause = match query.window {
      Some(window) => {
        values.push(Value::Integer(to_i64(window.take)));
        values.push(Value::Integer(to_i64(window.skip)));
        format!("LIMIT ?{} OFFSET ?{}", values.len() - 1, values.len())
      }
      None => String::new(),
    };

    let sql = format!(
      "SELECT {STACK_COLUMNS} FROM stacks {where_clause} {order_clause} {window_clause}"
    );

    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(values.iter()), RawStack::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    decode_stacks(raws)
  }

  async fn count_stacks(&self, filter: StackFilter) -> Result<u64> {
    let (where_clause, values) = filter_clause(&filter);
    let sql = format!("SELECT COUNT(*) FROM stacks {where_clause}");

    let count = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, rusqlite::params_from_iter(values.iter()), count_from_row)?)
      })
      .await?;

    Ok(count)
  }

  async fn push_review(&self, id: StackId, review: Review) -> Result<Option<Stack>> {
    let id_str      = id.to_string();
    let review_json = serde_json::to_string(&review)?;
    let now         = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        // Single-statement append; concurrent pushes to the same stack
        // serialise on the row and none are lost.
        let changed = conn.execute(
          "UPDATE stacks
             SET reviews_json = json_insert(reviews_json, '$[#]', json(?2)),
                 updated_at   = ?3
           WHERE stack_id = ?1",
          rusqlite::params![id_str, review_json, now],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_stack(conn, &id_str)?)
      })
      .await?;

    raw.map(RawStack::into_stack).transpose()
  }

  async fn set_rating(&self, id: StackId, rating: f64) -> Result<Option<Stack>> {
    let id_str = id.to_string();
    let now    = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE stacks SET rating = ?2, updated_at = ?3 WHERE stack_id = ?1",
          rusqlite::params![id_str, rating, now],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_stack(conn, &id_str)?)
      })
      .await?;

    raw.map(RawStack::into_stack).transpose()
  }

  async fn update_stack(&self, id: StackId, patch: StackPatch) -> Result<Option<Stack>> {
    let id_str            = id.to_string();
    let now               = encode_dt(Utc::now());
    let category          = patch.category.map(encode_category);
    let technologies_json = patch.technologies.as_ref().map(serde_json::to_string).transpose()?;
    let tags_json         = patch.tags.as_ref().map(serde_json::to_string).transpose()?;
    let StackPatch { title, description, .. } = patch;

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE stacks SET
             title             = COALESCE(?2, title),
             description       = COALESCE(?3, description),
             category          = COALESCE(?4, category),
             technologies_json = COALESCE(?5, technologies_json),
             tags_json         = COALESCE(?6, tags_json),
             updated_at        = ?7
           WHERE stack_id = ?1",
          rusqlite::params![
            id_str,
            title,
            description,
            category,
            technologies_json,
            tags_json,
            now,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_stack(conn, &id_str)?)
      })
      .await?;

    raw.map(RawStack::into_stack).transpose()
  }

  async fn delete_stack(&self, id: StackId) -> Result<Option<Stack>> {
    let id_str = id.to_string();

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = select_stack(&tx, &id_str)?;
        if raw.is_some() {
          tx.execute("DELETE FROM stacks WHERE stack_id = ?1", rusqlite::params![id_str])?;
        }
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawStack::into_stack).transpose()
  }
}
