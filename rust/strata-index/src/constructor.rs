//! Per-depth index factories.

use strata_common::{Result, error::Error};

use crate::{
    flat_index::FlatIndex,
    label::{Label, LabelType},
};

/// Factory that turns a sequence of labels into a [`FlatIndex`].
///
/// A hierarchy carries one constructor per depth. Set operations resolve the
/// constructors once during validation and use them to build every union
/// basis and every empty result, so the label type of each depth survives the
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexConstructor {
    /// Accepts labels of any type.
    #[default]
    Plain,
    /// Accepts only labels of the given type. `Typed(LabelType::Mixed)`
    /// behaves like [`IndexConstructor::Plain`] but reports `Mixed`.
    Typed(LabelType),
}

impl IndexConstructor {
    /// Builds a flat index, failing on duplicate labels or on labels the
    /// constructor does not accept.
    pub fn build(&self, labels: Vec<Label>) -> Result<FlatIndex> {
        FlatIndex::try_new(labels, *self)
    }

    pub fn empty(&self) -> FlatIndex {
        FlatIndex::empty(*self)
    }

    /// Returns `depth` copies of the default constructor.
    pub fn defaults(depth: usize) -> Vec<IndexConstructor> {
        vec![IndexConstructor::default(); depth]
    }

    /// Resolves the label type of an index built by this constructor from
    /// `labels`.
    pub(crate) fn resolve_type(&self, labels: &[Label]) -> Result<LabelType> {
        match self {
            IndexConstructor::Plain => Ok(LabelType::common(labels).unwrap_or(LabelType::Mixed)),
            IndexConstructor::Typed(LabelType::Mixed) => Ok(LabelType::Mixed),
            IndexConstructor::Typed(expected) => {
                if let Some(label) = labels.iter().find(|l| l.label_type() != *expected) {
                    return Err(Error::label_type_mismatch(
                        expected.to_string(),
                        format!("{} ({label:?})", label.label_type()),
                    ));
                }
                Ok(*expected)
            }
        }
    }

    /// Label type reported by an empty index of this constructor.
    pub(crate) fn empty_type(&self) -> LabelType {
        match self {
            IndexConstructor::Plain => LabelType::Mixed,
            IndexConstructor::Typed(t) => *t,
        }
    }
}

#[cfg(test)]
mod tests {
    use strata_common::error::ErrorKind;

    use super::*;

    #[test]
    fn test_typed_rejects_foreign_labels() {
        let ctor = IndexConstructor::Typed(LabelType::Int);
        let err = ctor
            .build(vec![Label::from(1), Label::from("x")])
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::LabelTypeMismatch { .. }));

        let index = ctor.build(vec![Label::from(1), Label::from(2)]).unwrap();
        assert_eq!(index.label_type(), LabelType::Int);
        assert_eq!(index.constructor(), ctor);
    }

    #[test]
    fn test_empty_keeps_type() {
        let ctor = IndexConstructor::Typed(LabelType::Str);
        assert_eq!(ctor.empty().label_type(), LabelType::Str);
        assert_eq!(IndexConstructor::Plain.empty().label_type(), LabelType::Mixed);
    }
}
