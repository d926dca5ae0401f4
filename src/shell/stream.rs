//! Synchronous text streams used as a command's stdin/stdout/stderr.
//!
//! A [`Stream`] is a shared handle: cloning it yields another handle to the
//! same buffer, which is how `2>&1` makes two descriptors write to one place.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Sink = Rc<dyn Fn(&str)>;

enum Target {
    /// Accumulate until drained with [`Stream::read`].
    Buffer,
    /// Forward every write immediately (the display).
    Destination(Sink),
    /// Forward every write to another stream.
    Chain(Stream),
    /// Accumulate; the orchestrator appends the contents to `path` when the stage ends.
    File(String),
}

struct Inner {
    buffer: String,
    target: Target,
}

#[derive(Clone)]
pub struct Stream(Rc<RefCell<Inner>>);

impl Stream {
    fn with_target(target: Target, buffer: String) -> Self {
        Self(Rc::new(RefCell::new(Inner { buffer, target })))
    }

    pub fn buffer() -> Self {
        Self::with_target(Target::Buffer, String::new())
    }

    /// A buffer that already holds `content`, e.g. stdin fed from a file.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self::with_target(Target::Buffer, content.into())
    }

    pub fn to_destination(sink: impl Fn(&str) + 'static) -> Self {
        Self::with_target(Target::Destination(Rc::new(sink)), String::new())
    }

    pub fn to_file(path: impl Into<String>) -> Self {
        Self::with_target(Target::File(path.into()), String::new())
    }

    pub fn write(&self, data: &str) {
        let forward = {
            let mut inner = self.0.borrow_mut();
            match &inner.target {
                Target::Buffer | Target::File(_) => {
                    inner.buffer.push_str(data);
                    None
                }
                Target::Destination(sink) => Some(Err(sink.clone())),
                Target::Chain(next) => Some(Ok(next.clone())),
            }
        };

        match forward {
            Some(Ok(next)) => next.write(data),
            Some(Err(sink)) => sink(data),
            None => {}
        }
    }

    /// Take everything buffered so far, leaving the buffer empty.
    pub fn read(&self) -> String {
        std::mem::take(&mut self.0.borrow_mut().buffer)
    }

    /// Forward future writes to `dest`. Chaining a stream to itself is ignored.
    pub fn pipe(&self, dest: &Stream) {
        if self.same_as(dest) {
            return;
        }
        self.0.borrow_mut().target = Target::Chain(dest.clone());
    }

    pub fn same_as(&self, other: &Stream) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Path this stream is bound to by an output redirection.
    pub fn file_path(&self) -> Option<String> {
        match &self.0.borrow().target {
            Target::File(path) => Some(path.clone()),
            _ => None,
        }
    }
}

impl fmt::Write for Stream {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Stream::write(self, s);
        Ok(())
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        let kind = match &inner.target {
            Target::Buffer => "buffer".to_string(),
            Target::Destination(_) => "destination".to_string(),
            Target::Chain(_) => "chain".to_string(),
            Target::File(path) => format!("file:{}", path),
        };
        f.debug_struct("Stream")
            .field("target", &kind)
            .field("buffered", &inner.buffer.len())
            .finish()
    }
}
