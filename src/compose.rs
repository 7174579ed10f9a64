//! Right-to-left composition of unary functions.

/// A boxed unary function from `T` to `T`.
pub type Composable<T> = Box<dyn Fn(T) -> T>;

/// Compose functions right to left: `compose([f, g, h])` behaves as
/// `|x| f(g(h(x)))`.
///
/// No functions yields the identity, and a single function is returned
/// unwrapped — the middleware chain relies on that to avoid an extra call
/// frame around a lone layer.
pub fn compose<T: 'static>(mut functions: Vec<Composable<T>>) -> Composable<T> {
    match functions.len() {
        0 => Box::new(|value| value),
        1 => functions.remove(0),
        _ => Box::new(move |value| functions.iter().rev().fold(value, |acc, f| f(acc))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_composition_is_identity() {
        let composed = compose::<i64>(Vec::new());
        assert_eq!(composed(41), 41);
    }

    #[test]
    fn single_function_passes_through() {
        let composed = compose::<i64>(vec![Box::new(|x| x + 1)]);
        assert_eq!(composed(41), 42);
    }

    #[test]
    fn composes_right_to_left() {
        let composed = compose::<i64>(vec![
            Box::new(|x| x + 1),
            Box::new(|x| x * 2),
            Box::new(|x| x - 3),
        ]);
        // f(g(h(10))) = ((10 - 3) * 2) + 1
        assert_eq!(composed(10), 15);
    }

    #[test]
    fn composes_over_non_copy_values() {
        let composed = compose::<String>(vec![
            Box::new(|s| format!("f({s})")),
            Box::new(|s| format!("g({s})")),
        ]);
        assert_eq!(composed(String::from("x")), "f(g(x))");
    }
}
