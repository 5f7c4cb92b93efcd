////////////////////////////////////////////////////////////////////
// field resolver module
////////////////////////////////////////////////////////////////////

use std::cmp::Ordering;

use crate::errors::throw;
use crate::errors::Errors::{IndexOutOfRange, UnknownField, UnsupportedReferenceKind};
use crate::field_refs::FieldRef;
use crate::field_table::FieldTable;

/// The outcome of resolving a [FieldRef]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resolved {
    /// the reference matched nothing (lenient resolution only)
    Unresolved,
    At(usize),
    Span(Vec<usize>),
}

impl Resolved {
    /// Returns the resolved positions in order
    pub fn positions(&self) -> Vec<usize> {
        match self {
            Resolved::Unresolved => Vec::new(),
            Resolved::At(position) => vec![*position],
            Resolved::Span(positions) => positions.to_owned(),
        }
    }
}

/// Maps field references to positions within a [FieldTable].
/// In strict mode unknown names and out-of-range positions fail;
/// otherwise they come back as [Resolved::Unresolved] or as the raw position.
#[derive(Clone, Copy, Debug)]
pub struct FieldResolver<'a> {
    fields: &'a FieldTable,
    strict: bool,
}

impl<'a> FieldResolver<'a> {
    pub fn new(fields: &'a FieldTable, strict: bool) -> Self {
        Self { fields, strict }
    }

    /// Resolves a reference that must denote at most one position
    pub fn position(&self, field: &FieldRef) -> std::io::Result<Option<usize>> {
        match self.resolve(field)? {
            Resolved::Unresolved => Ok(None),
            Resolved::At(position) => Ok(Some(position)),
            Resolved::Span(..) =>
                throw(UnsupportedReferenceKind(format!("{} [{}] where a single field is expected", field.kind_name(), field)))
        }
    }

    pub fn resolve(&self, field: &FieldRef) -> std::io::Result<Resolved> {
        match field {
            FieldRef::Name(name) => self.resolve_name(name),
            FieldRef::Index(index) => self.resolve_index(*index),
            FieldRef::Range { from, to, exclusive } =>
                self.resolve_range(from.as_deref(), to.as_deref(), *exclusive),
        }
    }

    fn resolve_name(&self, name: &str) -> std::io::Result<Resolved> {
        match self.fields.position_of(name) {
            Some(position) => Ok(Resolved::At(position)),
            None if self.strict => throw(UnknownField(name.to_string())),
            None => Ok(Resolved::Unresolved)
        }
    }

    fn resolve_index(&self, index: i64) -> std::io::Result<Resolved> {
        let count = self.fields.len();
        match index {
            n if n >= count as i64 && self.strict => throw(IndexOutOfRange(n, count)),
            n if n >= 0 => Ok(Resolved::At(n as usize)),
            n if count == 0 && self.strict => throw(IndexOutOfRange(n, count)),
            _ if count == 0 => Ok(Resolved::Unresolved),
            n => Ok(Resolved::At(n.rem_euclid(count as i64) as usize))
        }
    }

    fn resolve_range(
        &self,
        from: Option<&FieldRef>,
        to: Option<&FieldRef>,
        exclusive: bool,
    ) -> std::io::Result<Resolved> {
        // bounds are always resolved strictly
        let bounds = FieldResolver::new(self.fields, true);
        let from = match from {
            Some(bound) if !bound.is_blank() => bounds.resolve_bound(bound)?,
            _ => 0
        };
        let to = match to {
            Some(bound) if !bound.is_blank() => bounds.resolve_bound(bound)?,
            _ => match self.fields.len() {
                0 => return throw(IndexOutOfRange(-1, 0)),
                count => count - 1
            }
        };
        Ok(match from.cmp(&to) {
            Ordering::Greater => {
                let low = if exclusive { to + 1 } else { to };
                Resolved::Span((low..=from).rev().collect())
            }
            Ordering::Equal => Resolved::At(from),
            Ordering::Less if exclusive => Resolved::Span((from..to).collect()),
            Ordering::Less => Resolved::Span((from..=to).collect()),
        })
    }

    fn resolve_bound(&self, bound: &FieldRef) -> std::io::Result<usize> {
        match self.resolve(bound)? {
            Resolved::At(position) => Ok(position),
            _ => throw(UnsupportedReferenceKind(format!("{} [{}] as a range bound", bound.kind_name(), bound)))
        }
    }
}

// Unit tests
#[cfg(test)]
mod tests {
    use crate::errors::Errors;

    use super::*;
    use super::Resolved::*;

    #[test]
    fn test_resolve_names() {
        let table = FieldTable::with_fields(["Name", "Age", "Zip Code"]);
        let resolver = table.resolver(true);
        assert_eq!(resolver.resolve(&"Name".into()).unwrap(), At(0));
        assert_eq!(resolver.resolve(&"name".into()).unwrap(), At(0));
        assert_eq!(resolver.resolve(&"AGE".into()).unwrap(), At(1));
        assert_eq!(resolver.resolve(&"zip code".into()).unwrap(), At(2));
        assert_eq!(resolver.resolve(&"zip_code".into()).unwrap(), At(2));
    }

    #[test]
    fn test_resolve_unknown_name() {
        let table = FieldTable::with_fields(["Name"]);
        let err = table.resolver(true).resolve(&"email".into()).unwrap_err();
        assert_eq!(Errors::of(&err), Some(&Errors::UnknownField("email".into())));
        assert_eq!(table.resolver(false).resolve(&"email".into()).unwrap(), Unresolved);
    }

    #[test]
    fn test_resolve_indices() {
        let table = FieldTable::with_fields(["A", "B", "C", "D"]);
        let resolver = table.resolver(true);
        for p in 0..4 {
            assert_eq!(resolver.resolve(&FieldRef::Index(p)).unwrap(), At(p as usize));
        }
        assert_eq!(resolver.resolve(&(-1).into()).unwrap(), At(3));
        assert_eq!(resolver.resolve(&(-4).into()).unwrap(), At(0));
        assert_eq!(resolver.resolve(&(-5).into()).unwrap(), At(3));
    }

    #[test]
    fn test_resolve_index_out_of_range() {
        let table = FieldTable::with_fields(["A", "B"]);
        let err = table.resolver(true).resolve(&2.into()).unwrap_err();
        assert_eq!(Errors::of(&err), Some(&Errors::IndexOutOfRange(2, 2)));
        // lenient resolution hands back the raw position
        assert_eq!(table.resolver(false).resolve(&7.into()).unwrap(), At(7));
    }

    #[test]
    fn test_resolve_negative_index_without_fields() {
        let table = FieldTable::new();
        assert_eq!(table.resolver(false).resolve(&(-1).into()).unwrap(), Unresolved);
        let err = table.resolver(true).resolve(&(-1).into()).unwrap_err();
        assert_eq!(Errors::of(&err), Some(&Errors::IndexOutOfRange(-1, 0)));
    }

    #[test]
    fn test_resolve_ranges() {
        let table = FieldTable::with_fields(["A", "B", "C", "D"]);
        let resolver = table.resolver(true);
        assert_eq!(resolver.resolve(&(1..=3).into()).unwrap(), Span(vec![1, 2, 3]));
        assert_eq!(resolver.resolve(&(3..=1).into()).unwrap(), Span(vec![3, 2, 1]));
        assert_eq!(resolver.resolve(&(1..3).into()).unwrap(), Span(vec![1, 2]));
        assert_eq!(resolver.resolve(&(3..1).into()).unwrap(), Span(vec![3, 2]));
        assert_eq!(resolver.resolve(&(2..=2).into()).unwrap(), At(2));
        assert_eq!(resolver.resolve(&(2..2).into()).unwrap(), At(2));
        assert_eq!(resolver.resolve(&("b"..="d").into()).unwrap(), Span(vec![1, 2, 3]));
        assert_eq!(resolver.resolve(&("D"..="b").into()).unwrap(), Span(vec![3, 2, 1]));
        assert_eq!(resolver.resolve(&(1..=-1).into()).unwrap(), Span(vec![1, 2, 3]));
    }

    #[test]
    fn test_resolve_open_ranges() {
        let table = FieldTable::with_fields(["A", "B", "C", "D"]);
        let resolver = table.resolver(true);
        assert_eq!(resolver.resolve(&(..).into()).unwrap(), Span(vec![0, 1, 2, 3]));
        assert_eq!(resolver.resolve(&(2..).into()).unwrap(), Span(vec![2, 3]));
        assert_eq!(resolver.resolve(&(..2).into()).unwrap(), Span(vec![0, 1]));
        assert_eq!(resolver.resolve(&(..="c").into()).unwrap(), Span(vec![0, 1, 2]));
        let blank = FieldRef::span(Some("".into()), Some(" ".into()), false);
        assert_eq!(resolver.resolve(&blank).unwrap(), Span(vec![0, 1, 2, 3]));
    }

    #[test]
    fn test_reversal_of_swapped_bounds() {
        let table = FieldTable::with_fields(["a", "b", "c", "d", "e", "f"]);
        let resolver = table.resolver(true);
        for a in 0..6i64 {
            for b in (a + 1)..6 {
                let mut forward = resolver.resolve(&(a..=b).into()).unwrap().positions();
                forward.reverse();
                let backward = resolver.resolve(&(b..=a).into()).unwrap().positions();
                assert_eq!(forward, backward);
            }
        }
    }

    #[test]
    fn test_range_bounds_are_strict() {
        let table = FieldTable::with_fields(["A", "B"]);
        let err = table.resolver(false).resolve(&("a"..="zzz").into()).unwrap_err();
        assert_eq!(Errors::of(&err), Some(&Errors::UnknownField("zzz".into())));
        let err = table.resolver(false).resolve(&(0..=5).into()).unwrap_err();
        assert_eq!(Errors::of(&err), Some(&Errors::IndexOutOfRange(5, 2)));
    }

    #[test]
    fn test_range_bound_must_be_single() {
        let table = FieldTable::with_fields(["A", "B", "C"]);
        let nested = FieldRef::span(Some(FieldRef::from(0..=1)), Some(2.into()), false);
        let err = table.resolver(true).resolve(&nested).unwrap_err();
        assert!(matches!(Errors::of(&err), Some(Errors::UnsupportedReferenceKind(..))));
    }

    #[test]
    fn test_range_over_empty_table() {
        let table = FieldTable::new();
        let err = table.resolver(false).resolve(&(..).into()).unwrap_err();
        assert_eq!(Errors::of(&err), Some(&Errors::IndexOutOfRange(-1, 0)));
    }

    #[test]
    fn test_position() {
        let table = FieldTable::with_fields(["A", "B", "C"]);
        assert_eq!(table.resolver(true).position(&"c".into()).unwrap(), Some(2));
        assert_eq!(table.resolver(false).position(&"x".into()).unwrap(), None);
        assert!(table.resolver(true).position(&(0..=1).into()).is_err());
    }
}
