//! Mapping human permission labels onto platform role ids.

use wholesale_platform::payload::ContactRole;

/// Lower-case and drop everything that is not a letter or digit, so
/// `"location-admin"` and `"Location admin"` compare equal.
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Find the role whose normalized name contains the normalized label.
///
/// The first match in platform order wins. An empty label matches
/// nothing; callers treat `None` as "proceed without a role".
pub fn resolve_role<'a>(label: &str, roles: &'a [ContactRole]) -> Option<&'a ContactRole> {
    let wanted = normalize_label(label);
    if wanted.is_empty() {
        return None;
    }
    roles
        .iter()
        .find(|role| normalize_label(&role.name).contains(&wanted))
}
