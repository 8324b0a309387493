//! Names of schemas, variants and fields.
use std::{borrow::Borrow, sync::Arc};

use derive_more::{Deref, Display};

/// An immutable, cheaply clonable name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, Display)]
#[deref(forward)]
pub struct Identifier(Arc<str>);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl From<&Identifier> for Identifier {
    fn from(value: &Identifier) -> Self {
        value.clone()
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
