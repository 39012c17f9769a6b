//! Typed extraction of positional call arguments

extern crate alloc;

use alloc::format;
use alloc::vec::Vec;

use embedded_graphics::prelude::Point;

use crate::error::BadgeError;
use crate::value::Value;

/// Upper bound on the points a polygon call accepts.
pub const MAX_POLY_POINTS: usize = 20;

/// Positional arguments of one native call.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    func: &'a str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub fn new(func: &'a str, values: &'a [Value]) -> Self {
        Self { func, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&'a Value> {
        self.values.get(idx)
    }

    fn required(&self, idx: usize) -> Result<&'a Value, BadgeError> {
        self.values.get(idx).ok_or_else(|| {
            BadgeError::Type(format!("{}() missing argument {}", self.func, idx + 1))
        })
    }

    /// Integer argument (`int` or `bool`).
    pub fn int(&self, idx: usize) -> Result<i64, BadgeError> {
        let value = self.required(idx)?;
        value.as_int().ok_or_else(|| {
            BadgeError::Type(format!("can't convert {} to int", value.type_name()))
        })
    }

    /// Integer argument that must fit a machine word, used for coordinates.
    pub fn coord(&self, idx: usize) -> Result<i32, BadgeError> {
        let raw = self.int(idx)?;
        i32::try_from(raw).map_err(|_| {
            BadgeError::Value(format!("{}() argument {} out of range", self.func, idx + 1))
        })
    }

    /// Optional integer argument.
    pub fn int_or(&self, idx: usize, default: i64) -> Result<i64, BadgeError> {
        match self.values.get(idx) {
            Some(_) => self.int(idx),
            None => Ok(default),
        }
    }

    /// String argument, full length.
    pub fn str(&self, idx: usize) -> Result<&'a str, BadgeError> {
        let value = self.required(idx)?;
        value.as_str().ok_or_else(|| {
            BadgeError::Type(format!("can't convert '{}' object to str", value.type_name()))
        })
    }

    /// Tuple or list argument.
    pub fn array(&self, idx: usize) -> Result<&'a [Value], BadgeError> {
        let value = self.required(idx)?;
        value.as_items().ok_or_else(|| {
            BadgeError::Type(format!("object '{}' isn't a tuple or list", value.type_name()))
        })
    }

    /// Point list argument.
    ///
    /// Entries that are not two-item arrays are skipped. Collection stops once
    /// [`MAX_POLY_POINTS`] points are accepted; the rest are ignored.
    pub fn points(&self, idx: usize) -> Result<Vec<Point>, BadgeError> {
        let entries = self.array(idx)?;
        let mut points = Vec::with_capacity(entries.len().min(MAX_POLY_POINTS));
        for entry in entries {
            if points.len() == MAX_POLY_POINTS {
                log::debug!(
                    "{}(): {} points given, keeping the first {}",
                    self.func,
                    entries.len(),
                    MAX_POLY_POINTS
                );
                break;
            }
            let pair = match entry.as_items() {
                Some(pair) if pair.len() == 2 => pair,
                _ => continue,
            };
            let pair = Args::new(self.func, pair);
            points.push(Point::new(pair.coord(0)?, pair.coord(1)?));
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn pair(x: i64, y: i64) -> Value {
        Value::Tuple(vec![Value::Int(x), Value::Int(y)])
    }

    #[test]
    fn int_accepts_bool_and_rejects_str() {
        let values = [Value::Bool(true), Value::from("3")];
        let args = Args::new("f", &values);
        assert_eq!(args.int(0), Ok(1));
        assert!(matches!(args.int(1), Err(BadgeError::Type(_))));
    }

    #[test]
    fn str_keeps_full_length() {
        let values = [Value::from("hello world")];
        let args = Args::new("f", &values);
        assert_eq!(args.str(0), Ok("hello world"));
    }

    #[test]
    fn coord_rejects_values_beyond_machine_word() {
        let values = [Value::Int(1 << 40)];
        let args = Args::new("f", &values);
        assert!(matches!(args.coord(0), Err(BadgeError::Value(_))));
    }

    #[test]
    fn points_skip_malformed_entries() {
        let values = [Value::List(vec![
            pair(1, 2),
            Value::Int(7),
            Value::Tuple(vec![Value::Int(1)]),
            Value::List(vec![Value::Int(3), Value::Int(4)]),
        ])];
        let args = Args::new("polygon", &values);
        assert_eq!(args.points(0), Ok(vec![Point::new(1, 2), Point::new(3, 4)]));
    }

    #[test]
    fn points_stop_at_cap() {
        let list: Vec<Value> = (0..25).map(|i| pair(i, i)).collect();
        let values = [Value::List(list)];
        let points = Args::new("polygon", &values).points(0).unwrap();
        assert_eq!(points.len(), MAX_POLY_POINTS);
        assert_eq!(points[19], Point::new(19, 19));
    }

    #[test]
    fn points_require_an_array() {
        let values = [Value::Int(3)];
        assert!(matches!(
            Args::new("polygon", &values).points(0),
            Err(BadgeError::Type(_))
        ));
    }
}
