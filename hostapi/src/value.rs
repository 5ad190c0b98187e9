//! The tagged host value held in a handle slot.
//!
//! Guests refer to host values only by integer handle; the variant tag lets
//! each call site assert the kind it expects instead of trusting caller
//! discipline. The variant set mirrors what crosses the boundary: strings,
//! raw byte and word buffers, boxed numerics, and callables.

use std::fmt;
use std::sync::Arc;

use crate::callable::Callable;
use crate::error::HostError;

/// A host-owned value addressable by handle.
#[derive(Clone)]
pub enum HostValue {
    /// A host string, marshalled as UTF-16 code units.
    Text(String),
    /// A raw byte buffer.
    Bytes(Vec<u8>),
    /// A 32-bit word buffer.
    Words(Vec<u32>),
    /// A boxed 32-bit integer.
    Int(i32),
    /// A boxed 32-bit float.
    Float(f32),
    /// A boxed 64-bit float.
    Double(f64),
    /// A host callable taking up to two value arguments.
    Callable(Arc<dyn Callable>),
}

/// The variant tag of a [`HostValue`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Bytes,
    Words,
    Int,
    Float,
    Double,
    Callable,
}

impl HostValue {
    /// The variant tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Words(_) => ValueKind::Words,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::Callable(_) => ValueKind::Callable,
        }
    }

    /// Assert the `Text` variant. `handle` is only used for the diagnostic.
    pub fn expect_text(&self, handle: u32) -> Result<&str, HostError> {
        match self {
            Self::Text(s) => Ok(s),
            other => Err(HostError::WrongKind {
                handle,
                expected: ValueKind::Text,
                found: other.kind(),
            }),
        }
    }

    /// Assert the `Bytes` variant.
    pub fn expect_bytes(&self, handle: u32) -> Result<&[u8], HostError> {
        match self {
            Self::Bytes(b) => Ok(b),
            other => Err(HostError::WrongKind {
                handle,
                expected: ValueKind::Bytes,
                found: other.kind(),
            }),
        }
    }

    /// Assert the `Words` variant.
    pub fn expect_words(&self, handle: u32) -> Result<&[u32], HostError> {
        match self {
            Self::Words(w) => Ok(w),
            other => Err(HostError::WrongKind {
                handle,
                expected: ValueKind::Words,
                found: other.kind(),
            }),
        }
    }

    /// Assert the `Int` variant.
    pub fn expect_int(&self, handle: u32) -> Result<i32, HostError> {
        match self {
            Self::Int(v) => Ok(*v),
            other => Err(HostError::WrongKind {
                handle,
                expected: ValueKind::Int,
                found: other.kind(),
            }),
        }
    }

    /// Assert the `Float` variant.
    pub fn expect_float(&self, handle: u32) -> Result<f32, HostError> {
        match self {
            Self::Float(v) => Ok(*v),
            other => Err(HostError::WrongKind {
                handle,
                expected: ValueKind::Float,
                found: other.kind(),
            }),
        }
    }

    /// Assert the `Double` variant.
    pub fn expect_double(&self, handle: u32) -> Result<f64, HostError> {
        match self {
            Self::Double(v) => Ok(*v),
            other => Err(HostError::WrongKind {
                handle,
                expected: ValueKind::Double,
                found: other.kind(),
            }),
        }
    }

    /// Assert the `Callable` variant.
    pub fn expect_callable(&self, handle: u32) -> Result<&Arc<dyn Callable>, HostError> {
        match self {
            Self::Callable(f) => Ok(f),
            other => Err(HostError::WrongKind {
                handle,
                expected: ValueKind::Callable,
                found: other.kind(),
            }),
        }
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Self::Words(w) => f.debug_tuple("Words").field(&w.len()).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Double(v) => f.debug_tuple("Double").field(v).finish(),
            Self::Callable(_) => f.write_str("Callable"),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Words => "words",
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
            Self::Callable => "callable",
        };
        f.write_str(name)
    }
}
