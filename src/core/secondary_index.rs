////////////////////////////////////////////////////////////////////
// secondary index module
////////////////////////////////////////////////////////////////////

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use log::debug;

use crate::cell_values::CellValue;
use crate::cellar::Cellar;
use crate::errors::throw;
use crate::errors::Errors::{DuplicateKey, NoIndexSpec};
use crate::field_refs::FieldRef;

/// Derives an index key from the row the cellar is positioned on
pub type KeyFn = Rc<dyn Fn(&Cellar) -> std::io::Result<CellValue>>;

/// Describes how the index key of a row is obtained
#[derive(Clone)]
pub enum IndexSpec {
    Field(FieldRef),
    Derived(KeyFn),
}

impl IndexSpec {
    /// Keys rows by the value of a field
    pub fn field(field: impl Into<FieldRef>) -> Self {
        IndexSpec::Field(field.into())
    }

    /// Keys rows by a function of the row
    /// ex: IndexSpec::derived(|c| Ok(c.attr("last name")?))
    pub fn derived<F>(f: F) -> Self
    where
        F: Fn(&Cellar) -> std::io::Result<CellValue> + 'static,
    {
        IndexSpec::Derived(Rc::new(f))
    }

    /// A field spec naming nothing (an empty name) does not specify an index
    pub fn is_specified(&self) -> bool {
        match self {
            IndexSpec::Field(field) => !field.is_blank(),
            IndexSpec::Derived(..) => true,
        }
    }
}

impl Debug for IndexSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexSpec::Field(field) => write!(f, "Field({field})"),
            IndexSpec::Derived(..) => write!(f, "Derived(..)"),
        }
    }
}

/// Maps derived keys to row positions. Keys are unique; blank keys are not indexed.
#[derive(Clone, Debug, Default)]
pub struct SecondaryIndex {
    spec: Option<IndexSpec>,
    seeker: HashMap<CellValue, usize>,
}

impl SecondaryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes a row, failing if another row already owns the key.
    /// Returns false if the key was blank and therefore skipped.
    pub fn insert(&mut self, key: CellValue, position: usize) -> std::io::Result<bool> {
        if key.is_blank() { return Ok(false); }
        if self.seeker.contains_key(&key) {
            return throw(DuplicateKey(key.to_code()));
        }
        self.seeker.insert(key, position);
        Ok(true)
    }

    /// Returns true once a key specification has been installed
    pub fn is_active(&self) -> bool { self.spec.is_some() }

    pub fn is_empty(&self) -> bool { self.seeker.is_empty() }

    pub fn len(&self) -> usize { self.seeker.len() }

    /// Returns the position of the row owning the key
    pub fn lookup(&self, key: &CellValue) -> Option<usize> {
        self.seeker.get(key).copied()
    }

    /// Clears the seeker and re-indexes `count` rows in order using the key
    /// deriving function. On failure the seeker is left empty.
    pub fn rebuild<F>(&mut self, count: usize, mut key_at: F) -> std::io::Result<usize>
    where
        F: FnMut(usize) -> std::io::Result<CellValue>,
    {
        if self.spec.is_none() { return throw(NoIndexSpec); }
        self.seeker.clear();
        for position in 0..count {
            let outcome = key_at(position).and_then(|key| self.insert(key, position));
            if let Err(err) = outcome {
                self.seeker.clear();
                return Err(err);
            }
        }
        debug!("indexed {} of {} row(s)", self.seeker.len(), count);
        Ok(self.seeker.len())
    }

    /// Installs the key specification; the seeker must be rebuilt afterwards
    pub fn set_spec(&mut self, spec: IndexSpec) -> std::io::Result<()> {
        if !spec.is_specified() { return throw(NoIndexSpec); }
        self.spec = Some(spec);
        self.seeker.clear();
        Ok(())
    }

    pub fn spec(&self) -> Option<&IndexSpec> {
        self.spec.as_ref()
    }
}

// Unit tests
#[cfg(test)]
mod tests {
    use crate::cell_values::CellValue::*;
    use crate::errors::Errors;

    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut index = SecondaryIndex::new();
        assert!(index.insert(Integer(1), 0).unwrap());
        assert!(index.insert(StringValue("b".into()), 1).unwrap());
        assert_eq!(index.lookup(&Integer(1)), Some(0));
        assert_eq!(index.lookup(&StringValue("b".into())), Some(1));
        assert_eq!(index.lookup(&Integer(99)), None);
    }

    #[test]
    fn test_insert_blank_keys_are_skipped() {
        let mut index = SecondaryIndex::new();
        assert!(!index.insert(Null, 0).unwrap());
        assert!(!index.insert(StringValue(" ".into()), 1).unwrap());
        assert!(!index.insert(Null, 2).unwrap());
        assert!(index.is_empty());
    }

    #[test]
    fn test_insert_duplicate() {
        let mut index = SecondaryIndex::new();
        index.insert(StringValue("AAA".into()), 0).unwrap();
        let err = index.insert(StringValue("AAA".into()), 1).unwrap_err();
        assert_eq!(Errors::of(&err), Some(&DuplicateKey("\"AAA\"".into())));
        assert_eq!(index.lookup(&StringValue("AAA".into())), Some(0));
    }

    #[test]
    fn test_rebuild() {
        let mut index = SecondaryIndex::new();
        index.set_spec(IndexSpec::field("id")).unwrap();
        let keys = vec![Integer(10), Null, Integer(30)];
        assert_eq!(index.rebuild(keys.len(), |p| Ok(keys[p].clone())).unwrap(), 2);
        assert_eq!(index.lookup(&Integer(30)), Some(2));
    }

    #[test]
    fn test_rebuild_duplicate_leaves_seeker_empty() {
        let mut index = SecondaryIndex::new();
        index.set_spec(IndexSpec::field("id")).unwrap();
        let keys = vec![Integer(1), Integer(2), Integer(1)];
        let err = index.rebuild(keys.len(), |p| Ok(keys[p].clone())).unwrap_err();
        assert_eq!(Errors::of(&err), Some(&DuplicateKey("1".into())));
        assert!(index.is_empty());
    }

    #[test]
    fn test_rebuild_without_spec() {
        let mut index = SecondaryIndex::new();
        let err = index.rebuild(0, |_| Ok(Null)).unwrap_err();
        assert_eq!(Errors::of(&err), Some(&NoIndexSpec));
        let err = index.set_spec(IndexSpec::field("")).unwrap_err();
        assert_eq!(Errors::of(&err), Some(&NoIndexSpec));
        assert!(!index.is_active());
    }
}
