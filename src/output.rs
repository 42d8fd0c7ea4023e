use crate::elements::Area;
use std::mem;

const DEFAULT_FLUSH_AFTER: usize = 1024;

pub type FlushCallback = Box<dyn FnMut(Vec<Area>)>;

/// Collects finished area records for the consumer. Exactly one record
/// is pushed per assembled relation, rings in emission order. The
/// driver either installs a flush callback or drains with read().
pub struct OutputBuffer {
    areas: Vec<Area>,
    callback: Option<FlushCallback>,
    flush_after: usize,
}

impl OutputBuffer {
    pub fn new() -> OutputBuffer {
        OutputBuffer {
            areas: Vec::new(),
            callback: None,
            flush_after: DEFAULT_FLUSH_AFTER,
        }
    }

    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: FnMut(Vec<Area>) + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    pub fn set_flush_after(&mut self, flush_after: usize) {
        self.flush_after = flush_after;
    }

    pub fn push(&mut self, area: Area) {
        self.areas.push(area);
    }

    /// Hand everything collected so far to the callback. Without a
    /// callback the records stay buffered for read().
    pub fn flush(&mut self) {
        if self.areas.is_empty() {
            return;
        }
        if let Some(callback) = &mut self.callback {
            callback(mem::replace(&mut self.areas, Vec::new()));
        }
    }

    pub fn possibly_flush(&mut self) {
        if self.areas.len() >= self.flush_after {
            self.flush();
        }
    }

    /// Drain the buffered records.
    pub fn read(&mut self) -> Vec<Area> {
        mem::replace(&mut self.areas, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

impl Default for OutputBuffer {
    fn default() -> OutputBuffer {
        OutputBuffer::new()
    }
}
