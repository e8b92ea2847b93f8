#![cfg_attr(docsrs, feature(doc_cfg))]
//#![warn(missing_docs)]

/*!
 # MWS Runtime

 Runtime support for the generated Amazon Marketplace Web Service (MWS) model
 types. Responses arrive as XML; each model type knows which child elements
 it expects and asks for them by name, and the runtime finds, converts and
 assigns them.

 ## Core Concepts

- **MwsObject:** a model type that fills itself from the element it was read from, field by field.
- **MwsXmlReader:** a cursor over a parsed document. It remembers where the last field was found so that fields read in document order are found immediately, and it wraps around when they are not.
- **XmlValue:** the conversion from element text (or a whole element) into a field type: strings, numbers, booleans, decimals, dates, enumerations, nested objects and opaque XML fragments.
- **mws_enum!:** declares an enumeration whose members are written by their symbolic name.

 ## Features

| **Feature** | **Description**                                                     |
|-------------|---------------------------------------------------------------------|
| decimal     | Converts element text into `rust_decimal::Decimal` (default)        |
| chrono      | Converts ISO-8601 timestamps into `chrono` date and time types (default) |
| serde       | Derives `Serialize` and `Deserialize` for copied XML fragments       |
| full        | Enables all available features                                      |

 ## Getting Started

```toml
[dependencies]
mws-runtime = { version = "<version>" }
```

Then describe the model and read it:

```rust
use mws_runtime::{core::object::MwsObject, item::xml::MwsXmlReader, MwsError, Result};

#[derive(Debug, Default)]
struct ServiceStatus {
    status: String,
    message_id: Option<String>,
    messages: Option<Vec<String>>,
}

impl MwsObject for ServiceStatus {
    fn read_fragment_from(&mut self, reader: &MwsXmlReader) -> Result<()> {
        self.status = reader.read("Status")?;
        self.message_id = reader.read("MessageId")?;
        self.messages = reader.read_list_members("Messages", "Message")?;
        Ok(())
    }
}

fn main() -> std::result::Result<(), MwsError> {
    let xml = r#"
    <GetServiceStatusResult>
      <Status>YELLOW</Status>
      <MessageId>173964729I</MessageId>
      <Messages>
        <Message>Delays in order processing</Message>
        <Message>Report generation is slow</Message>
      </Messages>
    </GetServiceStatusResult>"#;

    let reader = MwsXmlReader::new(xml)?;
    let mut status = ServiceStatus::default();
    status.read_fragment_from(&reader)?;

    assert_eq!(status.status, "YELLOW");
    assert_eq!(status.message_id.as_deref(), Some("173964729I"));
    assert_eq!(status.messages.map(|m| m.len()), Some(2));

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.

 */

/// Core traits for model objects, value conversion and enumerations
pub mod core;

/// Error types for document loading and object reads
pub mod error;

#[doc(inline)]
pub use error::*;

/// XML document model and cursor reader
pub mod item;
