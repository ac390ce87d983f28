use monkey::{
    interpreter::{self, Error, Interpreter},
    object::Object,
    parser,
};

fn assert_value(src: &str, expected: Object) {
    match interpreter::eval(src) {
        Ok(obj) => assert_eq!(obj, expected, "program:\n{src}"),
        Err(e) => panic!("program failed:\n{src}\nError: {e}"),
    }
}

fn assert_runtime_error(src: &str, message: &str) {
    match interpreter::eval(src) {
        Err(Error::Eval(e)) => assert_eq!(e.message, message, "program:\n{src}"),
        other => panic!("expected runtime error for:\n{src}\ngot: {other:?}"),
    }
}

fn assert_rendered(src: &str, expected: &str) {
    match interpreter::eval(src) {
        Ok(obj) => assert_eq!(obj.to_string(), expected, "program:\n{src}"),
        Err(e) => panic!("program failed:\n{src}\nError: {e}"),
    }
}

#[test]
fn arithmetic_precedence() {
    assert_value("5 + 2 * 10", Object::Integer(25));
    assert_value("(5 + 10 * 2 + 15 / 3) * 2 + -10", Object::Integer(50));
}

#[test]
fn truthiness() {
    assert_value("!5", Object::Boolean(false));
    assert_value("!!5", Object::Boolean(true));
    assert_value("if (1) { 10 }", Object::Integer(10));
    assert_value("if (false) { 10 }", Object::Null);
}

#[test]
fn closures() {
    assert_value(
        "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); addTwo(2);",
        Object::Integer(4),
    );
}

#[test]
fn runtime_error_messages() {
    assert_runtime_error("5 + true;", "type mismatch: INTEGER + BOOLEAN");
    assert_runtime_error("foobar", "identifier not found: foobar");
    assert_runtime_error("len(1)", "argument to 'len' not supported, got INTEGER");
}

#[test]
fn array_bounds() {
    assert_value("[1, 2, 3][3]", Object::Null);
    assert_value("[1, 2, 3][-1]", Object::Null);
}

#[test]
fn hash_duplicate_keys() {
    assert_value(r#"let h = {"k": 1, "k": 2}; h["k"]"#, Object::Integer(2));
    assert_rendered(r#"{"k": 1, "k": 2}"#, "{k: 2}");
}

#[test]
fn builtins() {
    assert_value(r#"len("four")"#, Object::Integer(4));
    assert_rendered(
        "let a = [1, 2]; let b = push(a, 3); [a, b]",
        "[[1, 2], [1, 2, 3]]",
    );
}

#[test]
fn parse_errors_accumulate() {
    let errors = match parser::parse("let x 5; 1 + 2; let = 10; 3") {
        Err(errors) => errors,
        Ok(program) => panic!("expected parse errors, got {program}"),
    };
    assert_eq!(errors.0.len(), 2);
    assert_eq!(
        errors.to_string(),
        "expected next token to be ASSIGN, got INT instead\n\
         expected next token to be IDENT, got ASSIGN instead"
    );
}

#[test]
fn canonical_rendering() {
    let program = parser::parse("a + b * c").expect("valid program");
    assert_eq!(program.to_string(), "(a + (b * c))");
}

#[test]
fn session_keeps_bindings() {
    let mut session = Interpreter::default();
    for line in ["let counter = fn(n) { n + 1 };", "let x = counter(1);"] {
        session.eval(line).expect("line evaluates");
    }
    assert_eq!(session.eval("counter(x)").ok(), Some(Object::Integer(3)));
}

#[test]
fn programs() {
    assert_value(
        "let reduce = fn(arr, initial, f) {
            let iter = fn(arr, result) {
                if (len(arr) == 0) { result } else { iter(rest(arr), f(result, first(arr))) }
            };
            iter(arr, initial);
        };
        let sum = fn(arr) { reduce(arr, 0, fn(initial, el) { initial + el }) };
        sum([1, 2, 3, 4, 5]);",
        Object::Integer(15),
    );
    assert_rendered(
        r#"let people = [{"name": "Alice", "age": 24}, {"name": "Anna", "age": 28}];
        let getName = fn(person) { person["name"] };
        [getName(people[0]), getName(people[1]), last(people)["age"]]"#,
        "[Alice, Anna, 28]",
    );
    assert_rendered(r#""Hello" + ", " + "World!""#, "Hello, World!");
}
