//! Destinations for markup fragments.
//!
//! Layout components write fragments to a [`MarkupSink`] as soon as they
//! are produced. [`MarkupCollector`] keeps them in memory as
//! [`PageMarkup`]s; [`ChannelSink`] forwards them as [`MarkupEvent`]s to
//! another thread.
//!
//! # Example
//!
//! ```
//! use pdflayout::engine::PageInfo;
//! use pdflayout::model::PageBox;
//! use pdflayout::render::{ChannelSink, MarkupEvent, MarkupSink};
//!
//! let (mut sink, events) = ChannelSink::unbounded();
//! let worker = std::thread::spawn(move || -> pdflayout::Result<()> {
//!     sink.start_page(&PageInfo::new(1, PageBox::letter()))?;
//!     sink.end_page()
//! });
//!
//! for event in events {
//!     if let MarkupEvent::PageStart(page) = event {
//!         println!("page {}", page.number);
//!     }
//! }
//! worker.join().unwrap().unwrap();
//! ```

use crossbeam_channel::{Receiver, Sender};

use crate::engine::PageInfo;
use crate::error::{Error, Result};
use crate::model::{Fragment, PageMarkup};

/// Receives page boundaries and fragments in output order.
pub trait MarkupSink {
    fn start_page(&mut self, page: &PageInfo) -> Result<()>;

    fn emit(&mut self, fragment: Fragment) -> Result<()>;

    fn end_page(&mut self) -> Result<()>;
}

/// Collects fragments into pages.
#[derive(Debug, Default)]
pub struct MarkupCollector {
    pages: Vec<PageMarkup>,
    current: Option<PageMarkup>,
}

impl MarkupCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finished pages, plus the page in progress if any.
    pub fn into_pages(mut self) -> Vec<PageMarkup> {
        if let Some(page) = self.current.take() {
            self.pages.push(page);
        }
        self.pages
    }

    pub fn pages(&self) -> &[PageMarkup] {
        &self.pages
    }
}

impl MarkupSink for MarkupCollector {
    fn start_page(&mut self, page: &PageInfo) -> Result<()> {
        if let Some(unfinished) = self.current.take() {
            self.pages.push(unfinished);
        }
        self.current = Some(
            PageMarkup::new(page.number, page.width(), page.height()).with_rotation(page.rotation),
        );
        Ok(())
    }

    fn emit(&mut self, fragment: Fragment) -> Result<()> {
        match self.current.as_mut() {
            Some(page) => {
                page.push(fragment);
                Ok(())
            }
            None => Err(Error::Render(format!(
                "<{}> emitted outside of a page",
                fragment.tag()
            ))),
        }
    }

    fn end_page(&mut self) -> Result<()> {
        if let Some(page) = self.current.take() {
            self.pages.push(page);
        }
        Ok(())
    }
}

/// Events sent by [`ChannelSink`].
#[derive(Debug, Clone)]
pub enum MarkupEvent {
    PageStart(PageInfo),
    Fragment(Fragment),
    PageEnd,
}

/// Streams markup over a crossbeam channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<MarkupEvent>,
}

impl ChannelSink {
    pub fn new(sender: Sender<MarkupEvent>) -> Self {
        Self { sender }
    }

    pub fn unbounded() -> (Self, Receiver<MarkupEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self::new(sender), receiver)
    }

    /// A channel holding at most `capacity` undelivered events.
    pub fn bounded(capacity: usize) -> (Self, Receiver<MarkupEvent>) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        (Self::new(sender), receiver)
    }

    fn send(&self, event: MarkupEvent) -> Result<()> {
        self.sender
            .send(event)
            .map_err(|_| Error::Render("markup receiver disconnected".to_string()))
    }
}

impl MarkupSink for ChannelSink {
    fn start_page(&mut self, page: &PageInfo) -> Result<()> {
        self.send(MarkupEvent::PageStart(page.clone()))
    }

    fn emit(&mut self, fragment: Fragment) -> Result<()> {
        self.send(MarkupEvent::Fragment(fragment))
    }

    fn end_page(&mut self) -> Result<()> {
        self.send(MarkupEvent::PageEnd)
    }
}

/// Enforces the document character limit on the way to another sink.
pub struct LimitedSink<'a> {
    inner: &'a mut dyn MarkupSink,
    limit: Option<usize>,
    written: usize,
}

impl<'a> LimitedSink<'a> {
    pub fn new(inner: &'a mut dyn MarkupSink, limit: Option<usize>) -> Self {
        Self {
            inner,
            limit,
            written: 0,
        }
    }

    /// Characters written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl MarkupSink for LimitedSink<'_> {
    fn start_page(&mut self, page: &PageInfo) -> Result<()> {
        self.inner.start_page(page)
    }

    fn emit(&mut self, fragment: Fragment) -> Result<()> {
        let chars = fragment.char_count();
        if let Some(limit) = self.limit {
            if self.written + chars > limit {
                return Err(Error::WriteLimitReached(limit));
            }
        }
        self.written += chars;
        self.inner.emit(fragment)
    }

    fn end_page(&mut self) -> Result<()> {
        self.inner.end_page()
    }
}
