//! Native functions reachable from every program.
use crate::{
    object::{new_error, Builtin, Object},
    prelude::*,
};

/// Every builtin, fixed at compile time.
pub const BUILTINS: [Builtin; 5] = [
    Builtin {
        name: "len",
        func: core::len,
    },
    Builtin {
        name: "first",
        func: array::first,
    },
    Builtin {
        name: "last",
        func: array::last,
    },
    Builtin {
        name: "rest",
        func: array::rest,
    },
    Builtin {
        name: "push",
        func: array::push,
    },
];

/// Finds the builtin bound to `name`.
pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.iter().find(|b| b.name == name).copied()
}

fn wrong_arg_count(passed: usize, required: usize) -> Object {
    new_error!("wrong number of arguments. got={passed}, want={required}")
}

pub mod core {
    use super::*;

    pub fn len(args: &[Object]) -> Object {
        let [arg] = args else {
            return wrong_arg_count(args.len(), 1);
        };
        let len = match arg {
            Object::String(s) => s.chars().count(),
            Object::Array(elements) => elements.len(),
            other => return new_error!("argument to 'len' not supported, got {}", other.kind()),
        };
        i64::try_from(len).unwrap_or(i64::MAX).pipe(Object::Integer)
    }
}

/// NOTE: none of these mutate their argument, `rest` and `push` build new arrays
pub mod array {
    use super::*;

    macro_rules! expect_array {
        ($name:literal, $arg:expr) => {
            match $arg {
                Object::Array(elements) => elements,
                other => {
                    return new_error!(
                        "argument to '{}' must be ARRAY, got {}",
                        $name,
                        other.kind()
                    )
                }
            }
        };
    }

    pub fn first(args: &[Object]) -> Object {
        let [arg] = args else {
            return wrong_arg_count(args.len(), 1);
        };
        let elements = expect_array!("first", arg);
        elements.first().cloned().unwrap_or(Object::Null)
    }

    pub fn last(args: &[Object]) -> Object {
        let [arg] = args else {
            return wrong_arg_count(args.len(), 1);
        };
        let elements = expect_array!("last", arg);
        elements.last().cloned().unwrap_or(Object::Null)
    }

    pub fn rest(args: &[Object]) -> Object {
        let [arg] = args else {
            return wrong_arg_count(args.len(), 1);
        };
        let elements = expect_array!("rest", arg);
        match elements.split_first() {
            Some((_, rest)) => Object::new_array(rest.to_vec()),
            None => Object::Null,
        }
    }

    pub fn push(args: &[Object]) -> Object {
        let [arr, elem] = args else {
            return wrong_arg_count(args.len(), 2);
        };
        let elements = expect_array!("push", arr);
        elements
            .iter()
            .cloned()
            .chain(std::iter::once(elem.clone()))
            .collect_vec()
            .pipe(Object::new_array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call(name: &str, args: Vec<Object>) -> Object {
        let builtin = lookup(name).unwrap_or_else(|| panic!("no builtin named {name}"));
        (builtin.func)(&args)
    }

    fn arr(elements: Vec<i64>) -> Object {
        elements.into_iter().map(Object::from).collect_vec().into()
    }

    /// macro to setup test boilerplate for a direct builtin call
    macro_rules! builtin_test {
        ($fn_name:ident, $name:literal, [$($arg:expr),* $(,)?], $expected:expr) => {
            #[test]
            fn $fn_name() {
                let result = call($name, vec![$($arg),*]);
                let expected: Object = $expected;
                assert_eq!(result, expected);
            }
        };
    }

    mod core {
        use super::*;
        use pretty_assertions::assert_eq;

        builtin_test!(len_empty_string, "len", ["".into()], 0.into());
        builtin_test!(len_string, "len", ["four".into()], 4.into());
        builtin_test!(len_unicode, "len", ["zażółć".into()], 6.into());
        builtin_test!(len_array, "len", [arr(vec![1, 2, 3])], 3.into());
        builtin_test!(
            len_integer,
            "len",
            [1.into()],
            Object::Error("argument to 'len' not supported, got INTEGER".into())
        );
        builtin_test!(
            len_too_many,
            "len",
            ["one".into(), "two".into()],
            Object::Error("wrong number of arguments. got=2, want=1".into())
        );
    }

    mod array {
        use super::*;
        use pretty_assertions::assert_eq;

        builtin_test!(first, "first", [arr(vec![1, 2, 3])], 1.into());
        builtin_test!(first_empty, "first", [arr(vec![])], Object::Null);
        builtin_test!(
            first_not_array,
            "first",
            [1.into()],
            Object::Error("argument to 'first' must be ARRAY, got INTEGER".into())
        );
        builtin_test!(last, "last", [arr(vec![1, 2, 3])], 3.into());
        builtin_test!(last_empty, "last", [arr(vec![])], Object::Null);
        builtin_test!(rest, "rest", [arr(vec![1, 2, 3])], arr(vec![2, 3]));
        builtin_test!(rest_single, "rest", [arr(vec![1])], arr(vec![]));
        builtin_test!(rest_empty, "rest", [arr(vec![])], Object::Null);
        builtin_test!(push, "push", [arr(vec![1, 2]), 3.into()], arr(vec![1, 2, 3]));
        builtin_test!(push_empty, "push", [arr(vec![]), 1.into()], arr(vec![1]));
        builtin_test!(
            push_arity,
            "push",
            [arr(vec![])],
            Object::Error("wrong number of arguments. got=1, want=2".into())
        );
        builtin_test!(
            push_not_array,
            "push",
            [1.into(), 1.into()],
            Object::Error("argument to 'push' must be ARRAY, got INTEGER".into())
        );

        #[test]
        fn push_leaves_original_alone() {
            let original = arr(vec![1, 2]);
            let pushed = call("push", vec![original.clone(), 3.into()]);
            assert_eq!(original, arr(vec![1, 2]));
            assert_eq!(pushed, arr(vec![1, 2, 3]));
        }
    }

    #[test]
    fn unknown_names_are_not_builtins() {
        assert!(lookup("puts").is_none());
        assert!(BUILTINS.iter().all(|b| lookup(b.name) == Some(*b)));
    }
}
