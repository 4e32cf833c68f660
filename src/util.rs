/// Asserts that a numerical hyperparameter is in the interval `[a,b]` and panics
/// with a message naming the offending expression if not
///
/// ### Example
/// ```should_panic
/// let learn_rate = 1.5;
/// knight::assert_interval!(learn_rate, 0.0, 1.0);
/// ```
/// This panics with the message "Invalid value for \`learn_rate\`: 1.5. Must be in the interval \[0, 1\]."
#[macro_export]
macro_rules! assert_interval {
    ($var:expr, $a:expr, $b:expr) => {
        assert!(
            $var >= $a && $var <= $b,
            "Invalid value for `{}`: {}. Must be in the interval [{}, {}].",
            stringify!($var),
            $var,
            $a,
            $b,
        );
    };
}
