/// Line-oriented buffer used to emit generated documents
pub(crate) struct DocumentWriter {
    depth: usize,
    indent: &'static str,
    buffer: String,
}

impl DocumentWriter {
    pub fn new() -> Self {
        Self {
            depth: 0,
            indent: "  ",
            buffer: String::new(),
        }
    }

    pub fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn add_line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.buffer.push_str(self.indent);
        }
        self.add(text);
        self.add("\n");
    }

    /// Append text verbatim, without indentation. Used for user sources,
    /// which must reach the sandbox byte-for-byte.
    pub fn add_raw_block(&mut self, text: &str) {
        self.add(text);
        if !text.ends_with('\n') {
            self.add("\n");
        }
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}
