//! Terse macros for everyday usage

/// Build an [`OptionSet`](crate::config::OptionSet) from literal pairs, bypassing the parser.
#[macro_export]
macro_rules! options {
    ( $( $k:expr => $v:expr ),* $(,)? ) => {{
        let mut __s = $crate::config::OptionSet::new();
        $( __s = __s.with($k, $v); )*
        __s
    }};
}
