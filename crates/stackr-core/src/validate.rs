//! Field constraints, checked before any store call.

use crate::{
  Error, Result,
  creator::CreatorPatch,
  stack::{NewReview, NewStack, StackPatch},
  technology::Technology,
};

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 1000;
pub const RATE_MIN: f64 = 1.0;
pub const RATE_MAX: f64 = 5.0;

fn required(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::invalid(format!("{field} is required")));
  }
  Ok(())
}

fn bounded(field: &str, value: &str, max: usize) -> Result<()> {
  required(field, value)?;
  let len = value.chars().count();
  if len > max {
    return Err(Error::invalid(format!(
      "{field} must be at most {max} characters (got {len})"
    )));
  }
  Ok(())
}

pub fn title(value: &str) -> Result<()> { bounded("title", value, TITLE_MAX) }

pub fn description(value: &str) -> Result<()> {
  bounded("description", value, DESCRIPTION_MAX)
}

pub fn technology(tech: &Technology) -> Result<()> {
  required("technology name", &tech.name)?;
  required("technology category", &tech.category)
}

pub fn new_stack(input: &NewStack) -> Result<()> {
  title(&input.title)?;
  description(&input.description)?;
  required("creator_id", input.creator_id.as_str())?;
  input.technologies.iter().try_for_each(technology)
}

pub fn stack_patch(patch: &StackPatch) -> Result<()> {
  if let Some(v) = &patch.title {
    title(v)?;
  }
  if let Some(v) = &patch.description {
    description(v)?;
  }
  if let Some(techs) = &patch.technologies {
    techs.iter().try_for_each(technology)?;
  }
  Ok(())
}

pub fn rate(value: f64) -> Result<()> {
  if !value.is_finite() || !(RATE_MIN..=RATE_MAX).contains(&value) {
    return Err(Error::invalid(format!(
      "rate must be between {RATE_MIN} and {RATE_MAX} (got {value})"
    )));
  }
  Ok(())
}

pub fn new_review(input: &NewReview) -> Result<()> {
  rate(input.rate)?;
  required("comment", &input.comment)
}

pub fn creator_patch(patch: &CreatorPatch) -> Result<()> {
  if let Some(v) = &patch.name {
    required("name", v)?;
  }
  if let Some(v) = &patch.username {
    required("username", v)?;
    if v.chars().any(char::is_whitespace) {
      return Err(Error::invalid("username must not contain whitespace"));
    }
  }
  if let Some(v) = &patch.expertise {
    required("expertise", v)?;
  }
  Ok(())
}
