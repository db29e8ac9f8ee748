use crate::annotations::Member;

/// Finds the schema property key for a member.
///
/// The declared name is tried first, then each serialization-format
/// override in declaration order. Comparison ignores case.
pub fn find_key<'k, I>(member: &Member, keys: I) -> Option<String>
where
    I: IntoIterator<Item = &'k String>,
{
    let keys: Vec<&String> = keys.into_iter().collect();
    member.name_variants().find_map(|variant| {
        keys.iter()
            .find(|key| key.eq_ignore_ascii_case(variant))
            .map(|key| key.to_string())
    })
}

/// Like [`find_key`] for a bare name, when the member is not known to the host
pub fn find_name<'k, I>(name: &str, keys: I) -> Option<String>
where
    I: IntoIterator<Item = &'k String>,
{
    keys.into_iter()
        .find(|key| key.eq_ignore_ascii_case(name))
        .cloned()
}

/// Every key that matches any of the member's name variants
pub fn matching_keys<'k, I>(member: &Member, keys: I) -> Vec<String>
where
    I: IntoIterator<Item = &'k String>,
{
    keys.into_iter()
        .filter(|key| member.name_variants().any(|variant| key.eq_ignore_ascii_case(variant)))
        .cloned()
        .collect()
}

/// Member declared under `name`, ignoring case
pub fn member_named<'m>(members: &'m [Member], name: &str) -> Option<&'m Member> {
    members.iter().find(|member| member.name.eq_ignore_ascii_case(name))
}
