//! Trusted-value membership oracle.

use std::collections::HashSet;

/// Set of trusted values (office IP addresses) events are checked against.
///
/// Membership is exact string equality. Network ranges in the config are
/// flat lists of addresses, not subnet specifications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    values: HashSet<String>,
}

impl ReferenceSet {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
