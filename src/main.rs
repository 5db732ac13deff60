use std::io::{self, Write};

use eyre::WrapErr;
use fibonacci_pi::fibonacci::{
    fib_cached, fib_iterative, fib_recursive, fib_sequence, fib_unbounded, FibonacciMemo,
};
use fibonacci_pi::pi::calculate_pi;
use log::{error, info};

// Writes one line per computed value; failures only go to the log.
fn run(out: &mut impl Write) -> eyre::Result<()> {
    match fib_unbounded(5) {
        Ok(value) => writeln!(out, "{value}")?,
        Err(e) => error!("fib_unbounded(5) failed: {e}"),
    }

    writeln!(out, "{}", fib_recursive(20))?;

    let mut memo = FibonacciMemo::new();
    writeln!(out, "{}", memo.fib(50))?;
    info!("manual memo holds {} entries", memo.len());

    writeln!(out, "{}", fib_cached(50))?;
    writeln!(out, "{}", fib_iterative(50))?;

    for value in fib_sequence(10) {
        writeln!(out, "{value}")?;
    }

    writeln!(out, "{}", calculate_pi(100_000))?;

    out.flush().wrap_err("failed to flush output")
}

fn main() -> eyre::Result<()> {
    pretty_env_logger::init();

    let stdout = io::stdout();
    run(&mut stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_one_line_per_value() {
        let mut out = Vec::new();
        run(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let expected = [
            "6765",
            "12586269025",
            "12586269025",
            "12586269025",
            "0",
            "1",
            "1",
            "2",
            "3",
            "5",
            "8",
            "13",
            "21",
            "34",
            "55",
            "3.1415826535897198",
        ];
        assert_eq!(text.lines().collect::<Vec<_>>(), expected);
    }
}
