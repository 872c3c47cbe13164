use std::time::Instant;

pub fn elapsed_seconds(since: Instant) -> f64 {
    let dt = since.elapsed();
    (dt.as_secs() as f64) + (f64::from(dt.subsec_nanos()) * 1e-9)
}

/// Inserts thousands separators, so 1234567 becomes "1,234,567".
pub fn prettyprint_usize(x: usize) -> String {
    let num = format!("{}", x);
    let mut result = String::new();
    let mut i = num.len();
    for c in num.chars() {
        result.push(c);
        i -= 1;
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
    }
    result
}

pub fn prettyprint_time(seconds: f64) -> String {
    if seconds < 1.0 {
        format!("{:.1}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.2}s", seconds)
    } else {
        format!("{}m{:.0}s", (seconds / 60.0).floor(), seconds % 60.0)
    }
}

struct TimerSpan {
    name: String,
    started_at: Instant,
}

/// Measures nested phases of some long-running work, logging as each one finishes. When the
/// Timer is dropped, a summary of everything it measured is logged.
pub struct Timer {
    outermost_name: String,
    stack: Vec<TimerSpan>,
    results: Vec<String>,
    notes: Vec<String>,
}

impl Timer {
    pub fn new<S: Into<String>>(name: S) -> Timer {
        let mut t = Timer {
            outermost_name: name.into(),
            stack: Vec::new(),
            results: Vec::new(),
            notes: Vec::new(),
        };
        let name = t.outermost_name.clone();
        t.start(name);
        t
    }

    // TODO Shouldn't use this much.
    pub fn throwaway() -> Timer {
        Timer::new("throwaway")
    }

    pub fn start<S: Into<String>>(&mut self, name: S) {
        let name = name.into();
        log::info!("{}...", name);
        self.stack.push(TimerSpan {
            name,
            started_at: Instant::now(),
        });
    }

    /// Panics if `name` doesn't match the most recent `start`. That's always a bug in the caller.
    pub fn stop<S: AsRef<str>>(&mut self, name: S) {
        let name = name.as_ref();
        let span = match self.stack.pop() {
            Some(span) => span,
            None => panic!("Timer::stop({}) with nothing started", name),
        };
        assert_eq!(span.name, name);

        let line = format!(
            "{} took {}",
            name,
            prettyprint_time(elapsed_seconds(span.started_at))
        );
        log::info!("{}", line);
        let padding = "  ".repeat(self.stack.len());
        self.results.push(format!("{}- {}", padding, line));
    }

    /// Log immediately, but also repeat at the end, to avoid having to scroll up and find
    /// interesting stuff.
    pub fn note<S: Into<String>>(&mut self, line: S) {
        let line = line.into();
        log::info!("{}", line);
        self.notes.push(line);
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        // If we're in the middle of unwinding a panic, the stack may be unbalanced. Close what's
        // left without further blowing up.
        while let Some(span) = self.stack.pop() {
            let padding = "  ".repeat(self.stack.len());
            self.results.push(format!(
                "{}- {} took {}",
                padding,
                span.name,
                prettyprint_time(elapsed_seconds(span.started_at))
            ));
        }

        if self.outermost_name == "throwaway" {
            return;
        }
        // Spans are recorded as they finish, so the outermost one comes last
        for line in self.results.iter().rev() {
            log::info!("{}", line);
        }
        for line in &self.notes {
            log::info!("{}", line);
        }
    }
}
