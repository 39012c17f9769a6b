//! Static name → native function tables and call dispatch

extern crate alloc;

use alloc::format;
use alloc::string::String;

use crate::args::Args;
use crate::error::BadgeError;
use crate::hal::Board;
use crate::os_module::MountTable;
use crate::ugfx::Ugfx;
use crate::value::Value;

/// Mutable state a native function may touch during one call.
pub struct Session<'a> {
    pub board: &'a mut dyn Board,
    pub gfx: &'a mut Ugfx,
    pub mounts: &'a mut MountTable,
}

pub type NativeFn = fn(&mut Session<'_>, &Args<'_>) -> Result<Value, BadgeError>;

/// Compile-time constant bound in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Const {
    Int(i64),
    Str(&'static str),
}

impl Const {
    pub fn to_value(self) -> Value {
        match self {
            Const::Int(v) => Value::Int(v),
            Const::Str(s) => Value::from(s),
        }
    }
}

#[derive(Clone, Copy)]
pub enum Binding {
    Function {
        func: NativeFn,
        min_args: usize,
        max_args: usize,
    },
    Constant(Const),
}

#[derive(Clone, Copy)]
pub struct Entry {
    pub name: &'static str,
    pub binding: Binding,
}

impl Entry {
    pub const fn function(name: &'static str, func: NativeFn, min_args: usize, max_args: usize) -> Self {
        Self {
            name,
            binding: Binding::Function {
                func,
                min_args,
                max_args,
            },
        }
    }

    pub const fn int(name: &'static str, value: i64) -> Self {
        Self {
            name,
            binding: Binding::Constant(Const::Int(value)),
        }
    }

    pub const fn str(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            binding: Binding::Constant(Const::Str(value)),
        }
    }
}

/// One importable module.
pub struct Module {
    pub name: &'static str,
    pub entries: &'static [Entry],
}

impl Module {
    pub fn lookup(&self, name: &str) -> Option<&'static Entry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    fn missing(&self, name: &str) -> BadgeError {
        BadgeError::Attribute {
            module: String::from(self.name),
            name: String::from(name),
        }
    }

    /// Read `module.name` without calling it.
    pub fn attr(&self, name: &str) -> Result<Value, BadgeError> {
        match self.lookup(name).map(|entry| entry.binding) {
            Some(Binding::Constant(value)) => Ok(value.to_value()),
            Some(Binding::Function { .. }) => {
                Ok(Value::Str(format!("<function {}.{}>", self.name, name)))
            }
            None => Err(self.missing(name)),
        }
    }

    /// Call `module.name(*args)` after checking the argument count.
    pub fn call(
        &self,
        session: &mut Session<'_>,
        name: &str,
        args: &[Value],
    ) -> Result<Value, BadgeError> {
        let entry = self.lookup(name).ok_or_else(|| self.missing(name))?;
        let (func, min_args, max_args) = match entry.binding {
            Binding::Function {
                func,
                min_args,
                max_args,
            } => (func, min_args, max_args),
            Binding::Constant(value) => {
                return Err(BadgeError::Type(format!(
                    "'{}' object isn't callable",
                    value.to_value().type_name()
                )))
            }
        };
        check_arity(entry.name, args.len(), min_args, max_args)?;
        log::debug!("{}.{}({} args)", self.name, entry.name, args.len());
        func(session, &Args::new(entry.name, args))
    }
}

fn check_arity(name: &str, given: usize, min: usize, max: usize) -> Result<(), BadgeError> {
    if min == max && given != min {
        return Err(BadgeError::Type(format!(
            "{}() takes {} positional arguments but {} were given",
            name, min, given
        )));
    }
    if given < min {
        return Err(BadgeError::Type(format!(
            "{}() missing {} required positional arguments",
            name,
            min - given
        )));
    }
    if given > max {
        return Err(BadgeError::Type(format!(
            "{}() expected at most {} arguments, got {}",
            name, max, given
        )));
    }
    Ok(())
}
