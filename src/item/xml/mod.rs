/// XML support for reading typed object graphs.
///
/// This module turns an XML document into an in-memory tree (parsed with
/// `quick-xml`) and walks it with a cursor. Domain types ask for their
/// fields by name, in the order they expect them; the reader finds each one
/// among the children of the current element, converts it, and moves on.
///
/// # Features
///
/// - Circular sibling search: a read continues where the previous one
///   stopped and wraps around once before giving up
/// - Nested objects through the [`MwsObject`](crate::core::object::MwsObject) trait
/// - Repeated elements and wrapped lists
/// - Attribute and text-node conversion
/// - Schema-less content copied out as [`XmlElement`] fragments
///
/// # Examples
///
/// ```
/// use mws_runtime::core::object::MwsObject;
/// use mws_runtime::item::xml::MwsXmlReader;
/// use mws_runtime::mws_enum;
/// use mws_runtime::Result;
///
/// mws_enum! {
///     #[derive(Default)]
///     pub enum OrderStatus {
///         #[default]
///         Pending,
///         Shipped,
///         Canceled,
///     }
/// }
///
/// #[derive(Debug, Default)]
/// struct Order {
///     id: String,
///     status: OrderStatus,
///     items: u32,
/// }
///
/// impl MwsObject for Order {
///     fn read_fragment_from(&mut self, reader: &MwsXmlReader) -> Result<()> {
///         self.id = reader.read_attribute("id")?;
///         self.status = reader.read("OrderStatus")?;
///         self.items = reader.read("NumberOfItemsShipped")?;
///         Ok(())
///     }
/// }
///
/// let xml = r#"
/// <ListOrdersResult>
///   <Orders>
///     <Order id="058-1233752-8214740">
///       <OrderStatus>Shipped</OrderStatus>
///       <NumberOfItemsShipped>2</NumberOfItemsShipped>
///     </Order>
///     <Order id="058-1233752-8214741">
///       <OrderStatus>Pending</OrderStatus>
///       <NumberOfItemsShipped>0</NumberOfItemsShipped>
///     </Order>
///   </Orders>
/// </ListOrdersResult>"#;
///
/// let reader = MwsXmlReader::new(xml).unwrap();
/// let orders: Vec<Order> = reader.read_list_members("Orders", "Order").unwrap().unwrap();
///
/// assert_eq!(orders.len(), 2);
/// assert_eq!(orders[0].id, "058-1233752-8214740");
/// assert_eq!(orders[0].status, OrderStatus::Shipped);
/// assert_eq!(orders[0].items, 2);
/// assert_eq!(orders[1].status, OrderStatus::Pending);
/// ```
pub mod document;
pub mod element;
pub mod xml_reader;

pub use document::{Children, Document, NodeId, NodeType, ParseOptions, XmlNode};
pub use element::{XmlContent, XmlElement};
pub use xml_reader::{MwsXmlReader, MwsXmlReaderBuilder};
