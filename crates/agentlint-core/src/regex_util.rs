//! Lazily compiled regexes for constant patterns.

/// Declare a function returning a lazily compiled `&'static Regex`.
///
/// Only for literal patterns; every pattern declared this way is compiled by
/// the unit tests of its module.
macro_rules! static_regex {
    ($vis:vis fn $name:ident, $pattern:expr) => {
        $vis fn $name() -> &'static ::regex::Regex {
            static RE: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            RE.get_or_init(|| {
                ::regex::Regex::new($pattern).expect(concat!("invalid static regex in ", stringify!($name)))
            })
        }
    };
}

pub(crate) use static_regex;
