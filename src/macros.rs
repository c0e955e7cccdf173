/// Unwraps an `Ok(Option<T>)` inside an iterator's `next`, returning
/// `Some(Err(..))` from the enclosing function on error.
macro_rules! try_some {
    ($expr:expr) => {
        match $expr {
            Ok(Some(v)) => Some(v),
            Ok(None) => None,
            Err(e) => return Some(Err(From::from(e))),
        }
    };
}

/// Returns `DecodeError::InvalidField` from the enclosing decode rule when
/// `$fields` has fewer than `$min` entries. The reported index is the first
/// missing one.
macro_rules! require_fields {
    ($code:expr, $fields:expr, $min:expr) => {
        if $fields.len() < $min {
            return Err($crate::err::DecodeError::invalid(
                $code,
                $fields.len(),
                format!(
                    "expected at least {} fields, found {}",
                    $min,
                    $fields.len()
                ),
            ));
        }
    };
}
