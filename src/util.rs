/// Checks that a numerical value lies in the closed interval `[a,b]`
///
/// Returns early from the enclosing function with [`ConfigError::OutOfInterval`](crate::error::ConfigError::OutOfInterval)
/// naming the offending expression.
///
/// ### Example
/// ```ignore
/// fn validate(alpha: f32) -> Result<(), ConfigError> {
///     check_interval!(alpha, 0.0, 1.0);
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! check_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::error::ConfigError::OutOfInterval {
                name: stringify!($var),
                value: $var,
                min: $a,
                max: $b,
            }
            .into());
        }
    };
}

/// Like [`check_interval!`], but with an open lower bound `(a,b]`
#[macro_export]
macro_rules! check_half_open {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var > $a && $var <= $b) {
            return Err($crate::error::ConfigError::OutOfHalfOpenInterval {
                name: stringify!($var),
                value: $var,
                min: $a,
                max: $b,
            }
            .into());
        }
    };
}
