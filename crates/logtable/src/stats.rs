//! Stats — stock reducers for summaries.
//!
//! Every reducer yields `Option<Value>` so they can share one list.
//! Numeric reducers return `None` for an empty group or when any value is
//! not numeric; `min`/`max` work on any value type.

use crate::table::Reducer;
use crate::value::Value;

pub type StatReducer = Reducer<Option<Value>>;

/// Names accepted by [`by_name`].
pub const REDUCER_NAMES: [&str; 6] = ["count", "sum", "min", "max", "mean", "std"];

/// Look up a stock reducer by name.
pub fn by_name(name: &str) -> Option<StatReducer> {
    match name {
        "count" => Some(count()),
        "sum" => Some(sum()),
        "min" => Some(min()),
        "max" => Some(max()),
        "mean" => Some(mean()),
        "std" => Some(std()),
        _ => None,
    }
}

pub fn count() -> StatReducer {
    Reducer::new("count", |values: &[Value]| Some(Value::Int(values.len() as i64)))
}

/// Integer sum when every value is an integer and it fits, float otherwise.
pub fn sum() -> StatReducer {
    Reducer::new("sum", |values: &[Value]| {
        if values.is_empty() {
            return None;
        }
        let ints: Option<i64> = values
            .iter()
            .try_fold(0i64, |acc, v| v.as_i64().and_then(|i| acc.checked_add(i)));
        match ints {
            Some(total) => Some(Value::Int(total)),
            None => numeric(values).map(|xs| Value::Float(xs.iter().sum())),
        }
    })
}

pub fn min() -> StatReducer {
    Reducer::new("min", |values: &[Value]| values.iter().min().cloned())
}

pub fn max() -> StatReducer {
    Reducer::new("max", |values: &[Value]| values.iter().max().cloned())
}

pub fn mean() -> StatReducer {
    Reducer::new("mean", |values: &[Value]| {
        numeric(values).map(|xs| Value::Float(mean_of(&xs)))
    })
}

/// Population standard deviation.
pub fn std() -> StatReducer {
    Reducer::new("std", |values: &[Value]| {
        numeric(values).map(|xs| {
            let m = mean_of(&xs);
            let var = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64;
            Value::Float(var.sqrt())
        })
    })
}

fn numeric(values: &[Value]) -> Option<Vec<f64>> {
    if values.is_empty() {
        return None;
    }
    values.iter().map(Value::as_f64).collect()
}

fn mean_of(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}
