//! Micro-benchmarks driving the dispatcher directly, no sockets involved.
//!
//! Run with `cargo bench`.

use std::time::Instant;

use coraldb::commands::{CommandDispatcher, DispatchResult};
use coraldb::resp;
use coraldb::server::Engine;

struct BenchmarkResult {
    name: &'static str,
    operations: usize,
    duration_ms: f64,
}

fn dispatch(dispatcher: &CommandDispatcher, engine: &mut Engine, args: &[&[u8]]) {
    match dispatcher.dispatch(engine, 0, args) {
        DispatchResult::Reply(_) => {}
        DispatchResult::Deferred => panic!("benchmark commands never defer"),
    }
}

fn bench_set_get(iterations: usize) -> BenchmarkResult {
    let dispatcher = CommandDispatcher::new();
    let mut engine = Engine::new();

    let start = Instant::now();
    for i in 0..iterations {
        let key = format!("key:{i}");
        let value = format!("value:{i}");
        dispatch(&dispatcher, &mut engine, &[b"SET", key.as_bytes(), value.as_bytes()]);
        dispatch(&dispatcher, &mut engine, &[b"GET", key.as_bytes()]);
    }

    BenchmarkResult {
        name: "SET+GET round-trip",
        operations: iterations * 2,
        duration_ms: start.elapsed().as_secs_f64() * 1000.0,
    }
}

fn bench_list_push_pop(iterations: usize) -> BenchmarkResult {
    let dispatcher = CommandDispatcher::new();
    let mut engine = Engine::new();

    let start = Instant::now();
    for i in 0..iterations {
        let payload = format!("job:{i}");
        dispatch(&dispatcher, &mut engine, &[b"RPUSH", b"jobs", payload.as_bytes()]);
        dispatch(&dispatcher, &mut engine, &[b"LPOP", b"jobs"]);
    }

    BenchmarkResult {
        name: "List RPUSH+LPOP",
        operations: iterations * 2,
        duration_ms: start.elapsed().as_secs_f64() * 1000.0,
    }
}

fn bench_stream_xadd(iterations: usize) -> BenchmarkResult {
    let dispatcher = CommandDispatcher::new();
    let mut engine = Engine::new();

    let start = Instant::now();
    for i in 0..iterations {
        let value = format!("reading:{i}");
        dispatch(
            &dispatcher,
            &mut engine,
            &[b"XADD", b"telemetry", b"*", b"sensor", value.as_bytes()],
        );
    }

    BenchmarkResult {
        name: "Stream XADD",
        operations: iterations,
        duration_ms: start.elapsed().as_secs_f64() * 1000.0,
    }
}

fn bench_stream_xrange(iterations: usize) -> BenchmarkResult {
    let dispatcher = CommandDispatcher::new();
    let mut engine = Engine::new();

    for i in 0..10_000u64 {
        let id = format!("{}-0", i + 1);
        dispatch(
            &dispatcher,
            &mut engine,
            &[b"XADD", b"telemetry", id.as_bytes(), b"sensor", b"1"],
        );
    }

    let start = Instant::now();
    for i in 0..iterations {
        let low = (i as u64 % 9_000) + 1;
        let lo = format!("{low}-0");
        let hi = format!("{}-0", low + 100);
        dispatch(
            &dispatcher,
            &mut engine,
            &[b"XRANGE", b"telemetry", lo.as_bytes(), hi.as_bytes()],
        );
    }

    BenchmarkResult {
        name: "Stream XRANGE (100 of 10k)",
        operations: iterations,
        duration_ms: start.elapsed().as_secs_f64() * 1000.0,
    }
}

fn bench_resp_parse(iterations: usize) -> BenchmarkResult {
    let buffer = b"*3\r\n$3\r\nSET\r\n$8\r\nbenchkey\r\n$10\r\nbenchvalue\r\n";

    let start = Instant::now();
    for _ in 0..iterations {
        let args = resp::parse_command(buffer);
        assert_eq!(args.len(), 3);
    }

    BenchmarkResult {
        name: "RESP parse",
        operations: iterations,
        duration_ms: start.elapsed().as_secs_f64() * 1000.0,
    }
}

fn main() {
    let iterations = 100_000;
    let results = vec![
        bench_set_get(iterations),
        bench_list_push_pop(iterations),
        bench_stream_xadd(iterations),
        bench_stream_xrange(iterations),
        bench_resp_parse(iterations),
    ];

    println!("coraldb micro-benchmarks ({iterations} iterations)");
    println!("{:-<64}", "");
    println!("{:<30}{:>18}{:>16}", "Benchmark", "Throughput", "Duration");

    for result in results {
        let ops_per_sec = result.operations as f64 / (result.duration_ms / 1000.0);
        println!(
            "{:<30}{:>12.0} ops/s{:>13.1} ms",
            result.name, ops_per_sec, result.duration_ms
        );
    }
}
