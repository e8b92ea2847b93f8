use crate::error::Result;
use crate::item::xml::MwsXmlReader;

/// A domain type that deserializes its own fields from a reader.
///
/// When an element is read as an `MwsObject`, the reader builds a default
/// instance, enters the element and hands itself to
/// [`read_fragment_from`](MwsObject::read_fragment_from). The implementation
/// asks for its fields in the order they appear in the document; the reader
/// restores the enclosing element once the call returns, whether it
/// succeeded or not.
///
/// # Examples
///
/// ```
/// use mws_runtime::core::object::MwsObject;
/// use mws_runtime::item::xml::MwsXmlReader;
/// use mws_runtime::Result;
///
/// #[derive(Debug, Default)]
/// struct Money {
///     currency: String,
///     amount: String,
/// }
///
/// impl MwsObject for Money {
///     fn read_fragment_from(&mut self, reader: &MwsXmlReader) -> Result<()> {
///         self.currency = reader.read("CurrencyCode")?;
///         self.amount = reader.read("Amount")?;
///         Ok(())
///     }
/// }
///
/// #[derive(Debug, Default)]
/// struct Order {
///     id: String,
///     total: Option<Money>,
/// }
///
/// impl MwsObject for Order {
///     fn read_fragment_from(&mut self, reader: &MwsXmlReader) -> Result<()> {
///         self.id = reader.read("AmazonOrderId")?;
///         self.total = reader.read("OrderTotal")?;
///         Ok(())
///     }
/// }
///
/// let xml = r#"
/// <Order>
///   <AmazonOrderId>902-3159896-1390916</AmazonOrderId>
///   <OrderTotal>
///     <CurrencyCode>USD</CurrencyCode>
///     <Amount>25.00</Amount>
///   </OrderTotal>
/// </Order>"#;
///
/// let reader = MwsXmlReader::new(xml).unwrap();
/// let mut order = Order::default();
/// order.read_fragment_from(&reader).unwrap();
///
/// assert_eq!(order.id, "902-3159896-1390916");
/// assert_eq!(order.total.unwrap().amount, "25.00");
/// ```
pub trait MwsObject: Default {
    /// Read this object's fields from the element the reader is positioned in.
    fn read_fragment_from(&mut self, reader: &MwsXmlReader) -> Result<()>;
}
