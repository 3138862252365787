//! The helper library bound to every program.
//!
//! Templates get MiniJinja's built-in filters, tests and functions plus the
//! `minijinja-contrib` collection, with Python-style methods on strings,
//! lists and maps (`"x".upper()`, `d.items()`). Nothing here is defined by
//! sprig itself.

use minijinja::{AutoEscape, Environment, UndefinedBehavior};

/// Registers the helper library with `env`.
pub fn register_helpers(env: &mut Environment<'static>) {
    minijinja_contrib::add_to_environment(env);
    env.set_unknown_method_callback(minijinja_contrib::pycompat::unknown_method_callback);
}

/// Creates an environment configured for plain-text, strict-key rendering.
///
/// Undefined values are errors, trailing newlines are kept, and nothing is
/// auto-escaped.
pub fn strict_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    register_helpers(&mut env);
    env
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> String {
        strict_environment()
            .render_str(source, minijinja::context! { name => "World" })
            .unwrap()
    }

    #[test]
    fn builtin_filters_are_available() {
        assert_eq!(render("{{ name | upper }}"), "WORLD");
        assert_eq!(render("{{ [3, 1, 2] | sort | join(',') }}"), "1,2,3");
    }

    #[test]
    fn contrib_filters_are_available() {
        assert_eq!(render("{{ 2 | pluralize('y', 'ies') }}"), "ies");
    }

    #[test]
    fn python_methods_are_available() {
        assert_eq!(render("{{ name.lower() }}"), "world");
        assert_eq!(render("{{ 'a-b'.replace('-', '+') }}"), "a+b");
    }

    #[test]
    fn trailing_newline_is_kept() {
        assert_eq!(render("Hello {{ name }}\n"), "Hello World\n");
    }

    #[test]
    fn html_is_not_escaped() {
        assert_eq!(render("{{ '<b>' }}"), "<b>");
    }
}
