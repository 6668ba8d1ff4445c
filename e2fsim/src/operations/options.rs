//! The engine's option protocol and the argument vectors built from it.
//!
//! Options arrive either number-based (an index into the plugin's option
//! table) or name-based. Both forms must keep working; older engines only
//! send numbers.

use std::{fmt, str::FromStr};

use crate::{Ext2Error, Ext2Result};

/// How an option is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKey {
    /// Index into the option table
    Number(u32),
    /// Option name
    Name(String),
}

/// The value carried by an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// A flag
    Bool(bool),
    /// A string, possibly unset
    Str(Option<String>),
}

/// One option as handed over by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    /// Identifier
    pub key:   OptionKey,
    /// Value
    pub value: OptionValue,
}

impl OptionEntry {
    /// A number-based option.
    pub fn numbered(number: u32, value: OptionValue) -> OptionEntry {
        OptionEntry {
            key: OptionKey::Number(number),
            value,
        }
    }
    /// A name-based option.
    pub fn named<S: Into<String>>(name: S, value: OptionValue) -> OptionEntry {
        OptionEntry {
            key: OptionKey::Name(name.into()),
            value,
        }
    }
    /// True only for a boolean option set to true.
    pub fn is_true(&self) -> bool {
        self.value == OptionValue::Bool(true)
    }
    /// The string value, if this is a set string option.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            OptionValue::Str(Some(s)) => Some(s),
            _ => None,
        }
    }
    /// Resolves the entry against one tool's option table.
    pub fn resolve<T: ToolOption>(&self) -> Option<T> {
        match &self.key {
            OptionKey::Number(n) => T::from_index(*n),
            OptionKey::Name(name) => name.parse().ok(),
        }
    }
}

/// Parses `name`, `name=true|false|yes|no|on|off` or `name=string`.
impl FromStr for OptionEntry {
    type Err = Ext2Error;

    fn from_str(s: &str) -> Ext2Result<OptionEntry> {
        let (name, value) = match s.find('=') {
            Some(i) => (&s[..i], Some(&s[i + 1..])),
            None => (s, None),
        };
        assert_or_err!(!name.is_empty(), Ext2Error::InvalidArgument(format!("option '{}'", s)));
        let value = match value {
            None | Some("true") | Some("yes") | Some("on") => OptionValue::Bool(true),
            Some("false") | Some("no") | Some("off") => OptionValue::Bool(false),
            Some(v) => OptionValue::Str(Some(v.to_string())),
        };
        Ok(OptionEntry::named(name, value))
    }
}

/// An option table of one external tool.
pub trait ToolOption: FromStr + Copy {
    /// The option at a given index, if there is one.
    fn from_index(index: u32) -> Option<Self>;
}

/// The ordered option list for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionArray(Vec<OptionEntry>);

impl OptionArray {
    /// An empty list.
    pub fn new() -> OptionArray {
        OptionArray::default()
    }
    /// Appends an entry.
    pub fn push(&mut self, entry: OptionEntry) {
        self.0.push(entry);
    }
    /// Appends a name-based flag.
    pub fn with_bool<S: Into<String>>(mut self, name: S, value: bool) -> OptionArray {
        self.push(OptionEntry::named(name, OptionValue::Bool(value)));
        self
    }
    /// Appends a name-based string.
    pub fn with_str<S: Into<String>, V: Into<String>>(mut self, name: S, value: V) -> OptionArray {
        self.push(OptionEntry::named(name, OptionValue::Str(Some(value.into()))));
        self
    }
    /// Appends a number-based option.
    pub fn with_number(mut self, number: u32, value: OptionValue) -> OptionArray {
        self.push(OptionEntry::numbered(number, value));
        self
    }
    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Entries in order
    pub fn iter(&self) -> std::slice::Iter<'_, OptionEntry> {
        self.0.iter()
    }
}

impl std::iter::FromIterator<OptionEntry> for OptionArray {
    fn from_iter<I: IntoIterator<Item = OptionEntry>>(iter: I) -> Self {
        OptionArray(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a OptionArray {
    type Item = &'a OptionEntry;
    type IntoIter = std::slice::Iter<'a, OptionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A command line: program name followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgVector(Vec<String>);

impl ArgVector {
    /// A command line holding only the program name.
    pub fn new<S: Into<String>>(program: S) -> ArgVector {
        ArgVector(vec![program.into()])
    }
    /// Appends an argument.
    pub fn push<S: Into<String>>(&mut self, arg: S) {
        self.0.push(arg.into());
    }
    /// argv[0]
    pub fn program(&self) -> &str {
        &self.0[0]
    }
    /// Everything after argv[0]
    pub fn args(&self) -> &[String] {
        &self.0[1..]
    }
    /// The full vector, program included
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
    /// True if `arg` appears after the program name
    pub fn contains(&self, arg: &str) -> bool {
        self.args().iter().any(|a| a == arg)
    }
    /// The final argument
    pub fn last(&self) -> &str {
        &self.0[self.0.len() - 1]
    }
}

/// Quotes every element, the way the vector is logged.
impl fmt::Display for ArgVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let quoted: Vec<String> = self.0.iter().map(|a| format!("'{}'", a)).collect();
        write!(f, "{}", quoted.join(" "))
    }
}
