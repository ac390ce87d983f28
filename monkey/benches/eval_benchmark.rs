use criterion::{black_box, criterion_group, criterion_main, Criterion};
use itertools::Itertools;
use monkey::{env::Env, eval, interpreter, parser};
use pprof::criterion::{Output, PProfProfiler};
use rand::{thread_rng, Rng};

const FIB: &str = "
let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } };
fib(15)";

const SUM: &str = "
let sum = fn(arr, acc) { if (len(arr) == 0) { acc } else { sum(rest(arr), acc + first(arr)) } };
sum(numbers, 0)";

// generate rand

fn generate_rand_array(size: usize) -> String {
    let numbers = thread_rng()
        .sample_iter(rand::distributions::Uniform::new(-1000_i64, 1000))
        .take(size)
        .join(", ");
    format!("let numbers = [{numbers}];")
}

fn generate_rand_hash(size: usize) -> String {
    let mut rng = thread_rng();
    let pairs = (0..size)
        .map(|i| format!("\"k{i}\": {}", rng.gen_range(0..100)))
        .join(", ");
    format!("let h = {{{pairs}}}; h[\"k0\"] + h[\"k{}\"]", size - 1)
}

// bench

pub fn criterion_benchmark(c: &mut Criterion) {
    const N: usize = 100;
    let array_source = format!("{}{SUM}", generate_rand_array(N));
    let hash_source = generate_rand_hash(N);
    let fib_program = parser::parse(FIB).expect("benchmark program parses");

    c.bench_function("lex_parse", |b| {
        b.iter(|| parser::parse(black_box(&array_source)))
    });
    c.bench_function("eval_fib", |b| {
        b.iter(|| eval::eval(black_box(&fib_program), &Env::new_rc()))
    });
    c.bench_function("sum_array", |b| {
        b.iter(|| interpreter::eval(black_box(&array_source)))
    });
    c.bench_function("hash_literal", |b| {
        b.iter(|| interpreter::eval(black_box(&hash_source)))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = criterion_benchmark
}

criterion_main!(benches);
