//! Uniqueness checks over a desired collection
//!
//! These run before a transaction is opened, so a rejected collection never
//! causes a write. Only the submitted array is checked: names held by rows
//! that the same call is about to delete are not considered.

use crate::definition::{Definition, DefinitionKind, Record};
use crate::error::{Error, Result};
use crate::identity_set::IdentitySet;
use crate::translation::Translation;
use crate::value::ValueRow;
use std::collections::HashSet;

/// Validate a desired definition collection and index it by id
///
/// Rejects duplicate ids, then duplicate names (or codes for languages).
/// Names are compared exactly, case-sensitive.
pub fn validate_definitions<D: Definition>(desired: Vec<D>) -> Result<IdentitySet<D>> {
    let set = IdentitySet::try_from_vec(desired)
        .map_err(|id| Error::DuplicateId { kind: D::KIND, id })?;

    if let Some(dup) = first_duplicate_key(&set) {
        return Err(duplicate_key_error(D::KIND, &dup));
    }
    Ok(set)
}

fn first_duplicate_key<D: Definition>(set: &IdentitySet<D>) -> Option<String> {
    let mut seen = HashSet::new();
    set.iter()
        .map(|item| item.unique_key())
        .find(|key| !seen.insert(*key))
        .map(str::to_string)
}

fn duplicate_key_error(kind: DefinitionKind, key: &str) -> Error {
    match kind {
        DefinitionKind::Language => Error::DuplicateLanguageCode(key.to_string()),
        _ => Error::DuplicateName {
            kind,
            name: key.to_string(),
        },
    }
}

/// Validate a desired translation collection, one row per (language, target)
pub fn validate_translations(desired: Vec<Translation>) -> Result<IdentitySet<Translation>> {
    IdentitySet::try_from_vec(desired).map_err(|key| Error::DuplicateTranslation {
        language_id: key.language_id,
        target: key.target,
    })
}

/// Validate a desired value collection, one row per (location, target)
pub fn validate_values(desired: Vec<ValueRow>) -> Result<IdentitySet<ValueRow>> {
    IdentitySet::try_from_vec(desired).map_err(|key| Error::DuplicateValue {
        location_id: key.location_id,
        target: key.target,
    })
}

/// Check that every row in a desired collection was submitted for `shop`
pub fn validate_shop<'a, T, I>(
    shop: &crate::ShopId,
    rows: I,
    owner: impl Fn(&T) -> &crate::ShopId,
) -> Result<()>
where
    T: Record + 'a,
    I: IntoIterator<Item = &'a T>,
{
    for row in rows {
        let actual = owner(row);
        if actual != shop {
            return Err(Error::ShopMismatch {
                record: format!("{:?}", row.key()),
                expected: shop.clone(),
                actual: actual.clone(),
            });
        }
    }
    Ok(())
}
