// src/progress.rs

/// Status sink for a scrape run. Every method defaults to a no-op so
/// frontends only implement what they show.
pub trait Progress {
    /// Number of timetable tables about to be decoded.
    fn begin(&mut self, _total: usize) {}

    fn log(&mut self, _msg: &str) {}

    /// A table was decoded and stored under canonical id `id`.
    fn item_done(&mut self, _id: &str) {}

    /// End of the run, whether or not it succeeded.
    fn finish(&mut self) {}
}

pub struct NullProgress;
impl Progress for NullProgress {}

/// Status lines on stderr, so stdout stays free for the output path.
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl ConsoleProgress {
    fn tally(&self) -> String {
        format!("Decoded {}/{} tables", self.done, self.total)
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("Decoding {total} tables");
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn item_done(&mut self, _id: &str) {
        self.done += 1;
    }

    fn finish(&mut self) {
        if self.total > 0 {
            eprintln!("{}", self.tally());
        }
    }
}
