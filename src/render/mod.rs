//! Output: markup sinks and document serializers.

mod json;
mod sink;
mod xhtml;

pub use json::{to_json, JsonFormat};
pub use sink::{ChannelSink, LimitedSink, MarkupCollector, MarkupEvent, MarkupSink};
pub use xhtml::{to_xhtml, write_fragment, XhtmlOptions, XhtmlRenderer};
