//! Named attributes: the unit folded into a tree and produced by rendering.

use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Attr is a named value attached to a log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub key: String,
    pub value: AttrValue,
}

/// AttrValue is either an opaque scalar or an ordered group of further attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Scalar payload. Shared, never mutated once built.
    Scalar(Arc<Value>),
    /// Named collection of sub-attributes, in order.
    Group(Vec<Attr>),
}

impl Attr {
    /// Creates a scalar attribute.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Attr {
            key: key.into(),
            value: AttrValue::Scalar(Arc::new(value.into())),
        }
    }

    /// Creates a scalar attribute from an already shared payload.
    pub fn shared(key: impl Into<String>, value: Arc<Value>) -> Self {
        Attr {
            key: key.into(),
            value: AttrValue::Scalar(value),
        }
    }

    /// Creates a group attribute.
    pub fn group(key: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Attr {
            key: key.into(),
            value: AttrValue::Group(attrs),
        }
    }

    /// Creates a group attribute with no members.
    pub fn empty_group(key: impl Into<String>) -> Self {
        Attr::group(key, Vec::new())
    }

    /// Returns true if this is a group attribute.
    pub fn is_group(&self) -> bool {
        matches!(self.value, AttrValue::Group(_))
    }

    /// Returns the group members if this is a group attribute.
    pub fn as_group(&self) -> Option<&[Attr]> {
        match &self.value {
            AttrValue::Group(attrs) => Some(attrs),
            AttrValue::Scalar(_) => None,
        }
    }

    /// Returns the scalar payload if this is a scalar attribute.
    pub fn as_scalar(&self) -> Option<&Value> {
        match &self.value {
            AttrValue::Scalar(v) => Some(v),
            AttrValue::Group(_) => None,
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            AttrValue::Scalar(v) => write!(f, "{}={}", self.key, v),
            AttrValue::Group(attrs) => {
                write!(f, "{}={{", self.key)?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", attr)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_constructors() {
        let a = Attr::new("foo", "bar");
        assert!(!a.is_group());
        assert_eq!(a.as_scalar(), Some(&Value::from("bar")));
        assert_eq!(a.as_group(), None);

        let g = Attr::group("alice", vec![Attr::new("foo", "boo")]);
        assert!(g.is_group());
        assert_eq!(g.as_group().map(<[Attr]>::len), Some(1));
        assert!(Attr::empty_group("bob").as_group().unwrap().is_empty());
    }

    #[test]
    fn test_attr_display() {
        let g = Attr::group(
            "alice",
            vec![Attr::new("foo", "boo"), Attr::group("inner", vec![Attr::new("n", 1)])],
        );
        assert_eq!(g.to_string(), "alice={foo=boo inner={n=1}}");
    }

    #[test]
    fn test_shared_scalar() {
        let payload = Arc::new(Value::from("x"));
        let a = Attr::shared("k", Arc::clone(&payload));
        match &a.value {
            AttrValue::Scalar(v) => assert!(Arc::ptr_eq(v, &payload)),
            AttrValue::Group(_) => panic!("expected scalar"),
        }
    }
}
