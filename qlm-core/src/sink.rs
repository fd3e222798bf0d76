/// Destination for normalized result lines.
///
/// Implementations must not block on delivery: the runner calls `append`
/// between stages and expects to move on immediately.
pub trait DataSink {
    fn append(&mut self, file: &str, line: String);
}

impl<S: DataSink + ?Sized> DataSink for &mut S {
    fn append(&mut self, file: &str, line: String) {
        (**self).append(file, line)
    }
}

/// In-memory sink, keeps `(file, line)` pairs in call order.
impl DataSink for Vec<(String, String)> {
    fn append(&mut self, file: &str, line: String) {
        self.push((file.to_string(), line));
    }
}
