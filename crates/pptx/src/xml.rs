//! Small helpers shared by the XML readers.

use notes_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract the namespace prefix of an element name, if it has one.
pub(crate) fn prefix(name: &[u8]) -> Option<&[u8]> {
    name.iter().position(|&b| b == b':').map(|pos| &name[..pos])
}

/// Read every event of `xml` into owned events, stopping at end of input.
pub(crate) fn read_events(xml: &str, part_name: &str) -> Result<Vec<Event<'static>>> {
    let mut reader = Reader::from_str(xml);
    let mut events = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(event) => events.push(event.into_owned()),
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing '{}' at position {}: {}",
                    part_name,
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }

    Ok(events)
}
