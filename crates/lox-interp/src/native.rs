//! Native functions provided by the host.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::control::RuntimeError;
use crate::value::Value;

/// A builtin callable backed by a Rust function.
#[derive(Debug)]
pub struct NativeFn {
    /// Name used nowhere but diagnostics; stringify renders `<native fn>`
    pub name: &'static str,
    /// Number of arguments expected
    pub arity: usize,
    /// Implementation; receives already-evaluated arguments
    pub func: fn(&[Value]) -> Result<Value, RuntimeError>,
}

/// `clock()` - seconds since the Unix epoch, as a double.
pub fn clock(_args: &[Value]) -> Result<Value, RuntimeError> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Ok(Value::Number(elapsed.as_secs_f64()))
}
