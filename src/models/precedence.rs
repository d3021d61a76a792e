use std::collections::BTreeSet;

/// Smallest positive integer not used by any precedence in the scope.
///
/// Entries that are not plain integers (blank, mistyped) do not occupy a
/// value.
pub fn next_precedence<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let used: BTreeSet<u64> = existing
        .into_iter()
        .filter_map(|value| value.trim().parse::<u64>().ok())
        .collect();

    let mut next = 1;
    while used.contains(&next) {
        next += 1;
    }
    next.to_string()
}
