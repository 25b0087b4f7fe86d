//! Reconciliation of requirement lists coming from different package managers.
//!
//! Both functions are pure: they take ownership of their inputs and hand back
//! new lists, never touching process state.

use std::collections::HashSet;

use crate::requirements::{PackageName, RequirementRecord};

/// Drop every secondary record whose package already appears in `primary`.
///
/// `primary` comes back unchanged. Surviving secondary records keep their
/// relative order. Each input is expected to be free of duplicates on its
/// own; only duplicates across the two lists are removed.
///
/// ```
/// use envsnap::requirements::FullRequirement;
/// use envsnap::snapshot::dedupe;
///
/// let primary: Vec<FullRequirement> =
///     vec!["numpy==1.2".parse().unwrap(), "requests==2.0".parse().unwrap()];
/// let secondary: Vec<FullRequirement> =
///     vec!["numpy==1.1".parse().unwrap(), "click==8.0".parse().unwrap()];
///
/// let (primary, secondary) = dedupe(primary, secondary);
/// assert_eq!(primary.len(), 2);
/// assert_eq!(secondary[0].to_string(), "click==8.0");
/// ```
pub fn dedupe<P, S>(primary: Vec<P>, secondary: Vec<S>) -> (Vec<P>, Vec<S>)
where
    P: RequirementRecord,
    S: RequirementRecord,
{
    let remaining = {
        let claimed: HashSet<&PackageName> = primary.iter().map(RequirementRecord::name).collect();
        secondary
            .into_iter()
            .filter(|record| !claimed.contains(record.name()))
            .collect()
    };
    (primary, remaining)
}

/// Remove the first record named `target` from `records`.
///
/// Returns the removed record (if any) and the rest of the list in its
/// original order. Should the list contain the name twice, only the first
/// occurrence is taken.
pub fn pop_by_name<R>(mut records: Vec<R>, target: &PackageName) -> (Option<R>, Vec<R>)
where
    R: RequirementRecord,
{
    match records.iter().position(|record| record.name() == target) {
        Some(index) => {
            let found = records.remove(index);
            (Some(found), records)
        }
        None => (None, records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::{FullRequirement, SimpleRequirement};

    fn pip(lines: &[&str]) -> Vec<FullRequirement> {
        lines.iter().map(|l| l.parse().unwrap()).collect()
    }

    fn conda(lines: &[&str]) -> Vec<SimpleRequirement> {
        lines.iter().map(|l| l.parse().unwrap()).collect()
    }

    fn rendered<R: RequirementRecord>(records: &[R]) -> Vec<String> {
        records.iter().map(ToString::to_string).collect()
    }

    fn name(raw: &str) -> PackageName {
        PackageName::new(raw).unwrap()
    }

    #[test]
    fn primary_wins_on_shared_names() {
        let (primary, secondary) = dedupe(
            pip(&["numpy==1.2", "requests==2.0"]),
            pip(&["numpy==1.1", "click==8.0"]),
        );

        assert_eq!(rendered(&primary), vec!["numpy==1.2", "requests==2.0"]);
        assert_eq!(rendered(&secondary), vec!["click==8.0"]);
    }

    #[test]
    fn primary_order_and_length_never_change() {
        let cases: Vec<(Vec<&str>, Vec<&str>)> = vec![
            (vec![], vec![]),
            (vec![], vec!["a==1", "b==2"]),
            (vec!["z==1", "a==1", "m==1"], vec![]),
            (vec!["z==1", "a==1"], vec!["a==2", "z==2", "q==1"]),
        ];

        for (p, s) in cases {
            let before = rendered(&pip(&p));
            let (primary, secondary) = dedupe(pip(&p), pip(&s));
            assert_eq!(rendered(&primary), before);

            let names: HashSet<&PackageName> = primary.iter().map(|r| r.name()).collect();
            assert!(secondary.iter().all(|r| !names.contains(r.name())));
        }
    }

    #[test]
    fn surviving_secondary_keep_relative_order() {
        let (_, secondary) = dedupe(pip(&["b"]), pip(&["d", "b", "a", "c"]));
        assert_eq!(rendered(&secondary), vec!["d", "a", "c"]);
    }

    #[test]
    fn names_match_across_spellings() {
        let (_, secondary) = dedupe(pip(&["Foo-Bar==1"]), pip(&["foo_bar==2", "FOO-BAR==3", "baz"]));
        assert_eq!(rendered(&secondary), vec!["baz"]);
    }

    #[test]
    fn mixes_record_kinds() {
        let (primary, remaining) = dedupe(
            conda(&["python=3.11.4=h955ad1f_0", "numpy=1.26.4=py311_0"]),
            pip(&["numpy==1.26.0", "requests==2.31.0"]),
        );
        assert_eq!(primary.len(), 2);
        assert_eq!(rendered(&remaining), vec!["requests==2.31.0"]);
    }

    #[test]
    fn pop_removes_match_and_keeps_order() {
        let (found, rest) = pop_by_name(conda(&["openssl=3.0", "python==3.11", "zlib=1.2"]), &name("python"));

        assert_eq!(found.unwrap().version(), Some("3.11"));
        assert_eq!(rendered(&rest), vec!["openssl=3.0", "zlib=1.2"]);
    }

    #[test]
    fn pop_only_record() {
        let (found, rest) = pop_by_name(conda(&["python==3.11"]), &name("python"));
        assert_eq!(found.unwrap().to_string(), "python=3.11");
        assert!(rest.is_empty());
    }

    #[test]
    fn pop_twice_finds_nothing_the_second_time() {
        let records = conda(&["python=3.11", "pip=24.0"]);
        let before = records.len();

        let (first, rest) = pop_by_name(records, &name("python"));
        assert!(first.is_some());
        assert_eq!(rest.len(), before - 1);

        let after_first = rest.len();
        let (second, rest) = pop_by_name(rest, &name("python"));
        assert!(second.is_none());
        assert_eq!(rest.len(), after_first);
    }

    #[test]
    fn pop_missing_name_leaves_list_untouched() {
        let (found, rest) = pop_by_name(pip(&["a", "b"]), &name("c"));
        assert!(found.is_none());
        assert_eq!(rendered(&rest), vec!["a", "b"]);
    }

    #[test]
    fn pop_takes_only_first_of_duplicates() {
        let (found, rest) = pop_by_name(conda(&["python=3.10", "python=3.11"]), &name("python"));
        assert_eq!(found.unwrap().version(), Some("3.10"));
        assert_eq!(rendered(&rest), vec!["python=3.11"]);
    }
}
