//! Dynamic factory surface for embedding hosts.
//!
//! Hosts that only see `serde_json::Value`s reach the factories through a
//! fixed table of named bindings. The table is a `static` of `fn` items, so
//! it can be listed and called but never reassigned or extended.
//!
//! ```
//! use sequin::{Arg, Surface};
//! use serde_json::json;
//!
//! assert!(Surface::names().any(|name| name == "range"));
//!
//! let numbers = Surface::invoke("range", &[Arg::value(3), Arg::value(2)]).unwrap();
//! assert_eq!(numbers.to_vec(), vec![json!(3), json!(4)]);
//!
//! assert!(Surface::create(json!({"not": "iterable"})).is_err());
//! ```

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::{Result, SeqError};
use crate::number::Number;
use crate::seq::Seq;

type Generator = Rc<dyn Fn() -> Box<dyn Iterator<Item = Value>>>;
type Factory = Rc<dyn Fn() -> Value>;

/// An argument passed to a binding.
#[derive(Clone)]
pub enum Arg {
    Value(Value),
    /// Produces a fresh iterator for every pass.
    Generator(Generator),
    /// Produces one value per call.
    Factory(Factory),
}

impl Arg {
    /// A plain JSON argument.
    pub fn value(value: impl Into<Value>) -> Arg {
        Arg::Value(value.into())
    }

    /// A generator argument, run once per pass.
    pub fn generator<F, I>(generator: F) -> Arg
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = Value>,
        I::IntoIter: 'static,
    {
        Arg::Generator(Rc::new(move || -> Box<dyn Iterator<Item = Value>> {
            Box::new(generator().into_iter())
        }))
    }

    /// A factory argument, called once per produced item.
    pub fn factory<F>(factory: F) -> Arg
    where
        F: Fn() -> Value + 'static,
    {
        Arg::Factory(Rc::new(factory))
    }

    fn kind(&self) -> &'static str {
        match self {
            Arg::Value(value) => json_kind(value),
            Arg::Generator(_) => "generator",
            Arg::Factory(_) => "factory",
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Arg::Generator(_) => f.write_str("Generator(..)"),
            Arg::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A named factory entry.
pub struct Binding {
    pub name: &'static str,
    pub arity: usize,
    pub summary: &'static str,
    call: fn(&'static str, &[Arg]) -> Result<Seq<Value>>,
}

impl Binding {
    /// Calls the factory after checking the argument count.
    pub fn invoke(&self, args: &[Arg]) -> Result<Seq<Value>> {
        if args.len() != self.arity {
            return Err(SeqError::InvalidArgument {
                binding: self.name,
                reason: format!("expected {} arguments, got {}", self.arity, args.len()),
            });
        }
        (self.call)(self.name, args)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

static BINDINGS: [Binding; 6] = [
    Binding {
        name: "from_generator",
        arity: 1,
        summary: "re-runs a generator for every pass",
        call: call_from_generator,
    },
    Binding {
        name: "from_single_value",
        arity: 1,
        summary: "a sequence holding exactly one value",
        call: call_from_single_value,
    },
    Binding {
        name: "range",
        arity: 2,
        summary: "count consecutive integers from start",
        call: call_range,
    },
    Binding {
        name: "repeat",
        arity: 2,
        summary: "one value repeated count times",
        call: call_repeat,
    },
    Binding {
        name: "repeat_generate",
        arity: 2,
        summary: "count values, each from a fresh factory call",
        call: call_repeat_generate,
    },
    Binding {
        name: "empty",
        arity: 0,
        summary: "the shared empty sequence",
        call: call_empty,
    },
];

fn value_arg<'a>(binding: &'static str, args: &'a [Arg], position: usize) -> Result<&'a Value> {
    match args.get(position) {
        Some(Arg::Value(value)) => Ok(value),
        Some(other) => Err(SeqError::InvalidArgument {
            binding,
            reason: format!("argument {position} must be a value, got {}", other.kind()),
        }),
        None => Err(SeqError::InvalidArgument {
            binding,
            reason: format!("missing argument {position}"),
        }),
    }
}

fn integer_arg(binding: &'static str, args: &[Arg], position: usize) -> Result<i64> {
    let value = value_arg(binding, args, position)?;
    Number::from_json(value)
        .and_then(Number::as_i64)
        .ok_or_else(|| SeqError::InvalidArgument {
            binding,
            reason: format!("argument {position} must be an integer, got {value}"),
        })
}

fn count_arg(binding: &'static str, args: &[Arg], position: usize) -> Result<usize> {
    let count = integer_arg(binding, args, position)?;
    usize::try_from(count).map_err(|_| SeqError::InvalidArgument {
        binding,
        reason: format!("argument {position} must not be negative, got {count}"),
    })
}

fn call_from_generator(binding: &'static str, args: &[Arg]) -> Result<Seq<Value>> {
    match args.first() {
        Some(Arg::Generator(generator)) => {
            let generator = Rc::clone(generator);
            Ok(Seq::from_generator(move || generator()))
        }
        _ => Err(SeqError::InvalidGenerator {
            binding,
            position: 0,
        }),
    }
}

fn call_from_single_value(binding: &'static str, args: &[Arg]) -> Result<Seq<Value>> {
    let value = value_arg(binding, args, 0)?;
    Ok(Seq::from_single_value(value.clone()))
}

fn call_range(binding: &'static str, args: &[Arg]) -> Result<Seq<Value>> {
    let start = integer_arg(binding, args, 0)?;
    let count = count_arg(binding, args, 1)?;
    Ok(Seq::range(start, count).select(Value::from))
}

fn call_repeat(binding: &'static str, args: &[Arg]) -> Result<Seq<Value>> {
    let value = value_arg(binding, args, 0)?;
    let count = count_arg(binding, args, 1)?;
    Ok(Seq::repeat(value.clone(), count))
}

fn call_repeat_generate(binding: &'static str, args: &[Arg]) -> Result<Seq<Value>> {
    let factory = match args.first() {
        Some(Arg::Factory(factory)) => Rc::clone(factory),
        _ => {
            return Err(SeqError::InvalidGenerator {
                binding,
                position: 0,
            })
        }
    };
    let count = count_arg(binding, args, 1)?;
    Ok(Seq::repeat_generate(move || factory(), count))
}

fn call_empty(_: &'static str, _: &[Arg]) -> Result<Seq<Value>> {
    Ok(Seq::empty())
}

/// Entry point for hosts working with JSON values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Surface;

impl Surface {
    /// Every binding, in a fixed order.
    pub fn bindings() -> &'static [Binding] {
        &BINDINGS
    }

    /// Binding names, in the order of [`Surface::bindings`].
    pub fn names() -> impl Iterator<Item = &'static str> {
        BINDINGS.iter().map(|binding| binding.name)
    }

    /// The binding called `name`.
    pub fn binding(name: &str) -> Option<&'static Binding> {
        BINDINGS.iter().find(|binding| binding.name == name)
    }

    /// Looks up a binding by name and invokes it.
    pub fn invoke(name: &str, args: &[Arg]) -> Result<Seq<Value>> {
        Surface::binding(name)
            .ok_or_else(|| SeqError::UnknownBinding(name.to_string()))?
            .invoke(args)
    }

    /// Wraps an iterable JSON value.
    ///
    /// Arrays yield their elements, strings yield one-character strings.
    /// Any other value fails with [`SeqError::InvalidSource`].
    pub fn create(source: Value) -> Result<Seq<Value>> {
        match source {
            Value::Array(items) => Ok(Seq::from_vec(items)),
            Value::String(text) => Ok(text
                .chars()
                .map(|c| Value::String(c.to_string()))
                .collect()),
            other => Err(SeqError::InvalidSource {
                kind: json_kind(&other),
            }),
        }
    }
}
