//! Name/value array mapping and secret-name substitution

use crate::error::{Result, SpinupError};
use crate::spinup::container::{NameValue, NameValueFrom};
use crate::spinup::secret::Secret;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

fn insert_unique(
    out: &mut BTreeMap<String, String>,
    field: &'static str,
    name: &str,
    value: &str,
) -> Result<()> {
    match out.entry(name.to_string()) {
        Entry::Occupied(_) => Err(SpinupError::NameCollision {
            field,
            name: name.to_string(),
        }),
        Entry::Vacant(slot) => {
            slot.insert(value.to_string());
            Ok(())
        }
    }
}

/// Environment array to a map; a repeated name is an error
pub fn map_name_values(input: &[NameValue]) -> Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for nv in input {
        insert_unique(&mut out, "name value", &nv.name, &nv.value)?;
    }
    Ok(out)
}

/// Secrets array to a map of name to ARN; a repeated name is an error
pub fn map_name_value_froms(input: &[NameValueFrom]) -> Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for nv in input {
        insert_unique(&mut out, "name valuefrom", &nv.name, &nv.value_from)?;
    }
    Ok(out)
}

/// Container secrets keyed by name, with every ARN that belongs to a known
/// space secret replaced by that secret's name. Unknown ARNs are kept.
pub fn map_secrets(
    container_secrets: &[NameValueFrom],
    space_secrets: &[Secret],
) -> Result<BTreeMap<String, String>> {
    let mut mapped = map_name_value_froms(container_secrets)?;
    for secret in space_secrets.iter().filter(|s| !s.arn.is_empty()) {
        for value in mapped.values_mut() {
            if *value == secret.arn {
                *value = secret.name.clone();
            }
        }
    }
    Ok(mapped)
}
