//! Technology Registry: a flat catalog of technology descriptors.

use std::collections::BTreeMap;

use crate::{Error, Result, store::CatalogStore, technology::Technology, validate};

pub struct TechnologyRegistry<'a, S> {
  store: &'a S,
}

impl<'a, S: CatalogStore> TechnologyRegistry<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Insert every descriptor or none. Duplicates are accepted. Returns the
  /// number of records written.
  pub async fn bulk_insert(&self, technologies: Vec<Technology>) -> Result<usize> {
    technologies.iter().try_for_each(validate::technology)?;
    if technologies.is_empty() {
      return Ok(0);
    }

    let inserted = self
      .store
      .insert_technologies(technologies)
      .await
      .map_err(|e| Error::RegistryWriteFailed(Box::new(e)))?;
    Ok(inserted.len())
  }

  /// Every descriptor, grouped by its `category`. Within a group entries keep
  /// the store's iteration order.
  pub async fn list_grouped_by_category(&self) -> Result<BTreeMap<String, Vec<Technology>>> {
    let all = self.store.find_technologies().await.map_err(Error::store)?;
    Ok(group_by_category(all))
  }
}

fn group_by_category(technologies: Vec<Technology>) -> BTreeMap<String, Vec<Technology>> {
  let mut groups: BTreeMap<String, Vec<Technology>> = BTreeMap::new();
  for tech in technologies {
    groups.entry(tech.category.clone()).or_default().push(tech);
  }
  groups
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tech(name: &str, category: &str) -> Technology {
    Technology {
      name:        name.into(),
      category:    category.into(),
      tag:         String::new(),
      website:     String::new(),
      description: String::new(),
    }
  }

  #[test]
  fn grouping_keeps_order_within_a_category() {
    let groups = group_by_category(vec![
      tech("React", "frontend"),
      tech("Postgres", "database"),
      tech("Vue", "frontend"),
      tech("React", "frontend"),
    ]);
    assert_eq!(groups.len(), 2);
    let names: Vec<_> = groups["frontend"].iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["React", "Vue", "React"]);
    assert_eq!(groups["database"].len(), 1);
  }

  #[test]
  fn grouping_nothing_is_empty() {
    assert!(group_by_category(Vec::new()).is_empty());
  }
}
