#![allow(dead_code)]

pub mod mocks;

use chrono::{DateTime, Utc};
use mws_runtime::{
    core::object::MwsObject, item::xml::MwsXmlReader, item::xml::XmlElement, mws_enum, Result,
};
use rust_decimal::Decimal;

mws_enum! {
    #[derive(Default)]
    pub enum OrderStatus {
        #[default]
        Pending,
        Unshipped,
        PartiallyShipped,
        Shipped,
        Canceled,
    }
}

mws_enum! {
    pub enum FulfillmentChannel {
        AFN,
        MFN,
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Money {
    pub currency_code: String,
    pub amount: Decimal,
}

impl MwsObject for Money {
    fn read_fragment_from(&mut self, reader: &MwsXmlReader) -> Result<()> {
        self.currency_code = reader.read("CurrencyCode")?;
        self.amount = reader.read("Amount")?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Address {
    pub name: String,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country_code: Option<String>,
}

impl MwsObject for Address {
    fn read_fragment_from(&mut self, reader: &MwsXmlReader) -> Result<()> {
        self.name = reader.read("Name")?;
        self.address_line1 = reader.read("AddressLine1")?;
        self.city = reader.read("City")?;
        self.postal_code = reader.read("PostalCode")?;
        self.country_code = reader.read("CountryCode")?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PaymentExecutionDetailItem {
    pub payment: Option<Money>,
    pub payment_method: String,
}

impl MwsObject for PaymentExecutionDetailItem {
    fn read_fragment_from(&mut self, reader: &MwsXmlReader) -> Result<()> {
        self.payment = reader.read("Payment")?;
        self.payment_method = reader.read("PaymentMethod")?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Order {
    pub amazon_order_id: String,
    pub purchase_date: Option<DateTime<Utc>>,
    pub order_status: OrderStatus,
    pub fulfillment_channel: Option<FulfillmentChannel>,
    pub shipping_address: Option<Address>,
    pub order_total: Option<Money>,
    pub number_of_items_shipped: Option<u32>,
    pub number_of_items_unshipped: Option<u32>,
    pub payment_execution_detail: Option<Vec<PaymentExecutionDetailItem>>,
    pub is_prime: Option<bool>,
}

impl MwsObject for Order {
    fn read_fragment_from(&mut self, reader: &MwsXmlReader) -> Result<()> {
        self.amazon_order_id = reader.read("AmazonOrderId")?;
        self.purchase_date = reader.read("PurchaseDate")?;
        self.order_status = reader.read("OrderStatus")?;
        self.fulfillment_channel = reader.read("FulfillmentChannel")?;
        self.shipping_address = reader.read("ShippingAddress")?;
        self.order_total = reader.read("OrderTotal")?;
        self.number_of_items_shipped = reader.read("NumberOfItemsShipped")?;
        self.number_of_items_unshipped = reader.read("NumberOfItemsUnshipped")?;
        self.payment_execution_detail =
            reader.read_list_members("PaymentExecutionDetail", "PaymentExecutionDetailItem")?;
        self.is_prime = reader.read("IsPrime")?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListOrdersResult {
    pub next_token: Option<String>,
    pub last_updated_before: Option<DateTime<Utc>>,
    pub orders: Option<Vec<Order>>,
}

impl MwsObject for ListOrdersResult {
    fn read_fragment_from(&mut self, reader: &MwsXmlReader) -> Result<()> {
        self.next_token = reader.read("NextToken")?;
        self.last_updated_before = reader.read("LastUpdatedBefore")?;
        self.orders = reader.read_list_members("Orders", "Order")?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResponseMetadata {
    pub request_id: String,
}

impl MwsObject for ResponseMetadata {
    fn read_fragment_from(&mut self, reader: &MwsXmlReader) -> Result<()> {
        self.request_id = reader.read("RequestId")?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListOrdersResponse {
    pub xmlns: Option<String>,
    pub result: Option<ListOrdersResult>,
    pub metadata: Option<ResponseMetadata>,
}

impl MwsObject for ListOrdersResponse {
    fn read_fragment_from(&mut self, reader: &MwsXmlReader) -> Result<()> {
        self.xmlns = reader.read_attribute("xmlns")?;
        self.result = reader.read("ListOrdersResult")?;
        self.metadata = reader.read("ResponseMetadata")?;
        Ok(())
    }
}

/// A price written as `<Price currency="USD">12.50</Price>`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Price {
    pub currency: String,
    pub value: Decimal,
}

impl MwsObject for Price {
    fn read_fragment_from(&mut self, reader: &MwsXmlReader) -> Result<()> {
        self.currency = reader.read_attribute("currency")?;
        self.value = reader.read_value()?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AttributeSets {
    pub any: Vec<XmlElement>,
}

impl MwsObject for AttributeSets {
    fn read_fragment_from(&mut self, reader: &MwsXmlReader) -> Result<()> {
        self.any = reader.read_any();
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Product {
    pub asin: String,
    pub attribute_sets: Option<AttributeSets>,
    pub price: Option<Price>,
}

impl MwsObject for Product {
    fn read_fragment_from(&mut self, reader: &MwsXmlReader) -> Result<()> {
        self.asin = reader.read("ASIN")?;
        self.attribute_sets = reader.read("AttributeSets")?;
        self.price = reader.read("Price")?;
        Ok(())
    }
}

pub const LIST_ORDERS_RESPONSE: &str = r#"<?xml version="1.0"?>
<ListOrdersResponse xmlns="https://mws.amazonservices.com/Orders/2013-09-01">
  <ListOrdersResult>
    <NextToken>2YgYW55IGNhcm5hbCBwbGVhc3VyZS4=</NextToken>
    <LastUpdatedBefore>2017-02-25T18:10:21.687Z</LastUpdatedBefore>
    <Orders>
      <Order>
        <AmazonOrderId>902-3159896-1390916</AmazonOrderId>
        <PurchaseDate>2017-02-20T19:49:35Z</PurchaseDate>
        <OrderStatus>Shipped</OrderStatus>
        <FulfillmentChannel>MFN</FulfillmentChannel>
        <ShippingAddress>
          <Name>Buyer name</Name>
          <AddressLine1>1234 Any St.</AddressLine1>
          <City>Seattle</City>
          <PostalCode>98103</PostalCode>
          <CountryCode>US</CountryCode>
        </ShippingAddress>
        <OrderTotal>
          <CurrencyCode>USD</CurrencyCode>
          <Amount>25.00</Amount>
        </OrderTotal>
        <NumberOfItemsShipped>1</NumberOfItemsShipped>
        <NumberOfItemsUnshipped>0</NumberOfItemsUnshipped>
        <PaymentExecutionDetail>
          <PaymentExecutionDetailItem>
            <Payment>
              <Amount>10.00</Amount>
              <CurrencyCode>USD</CurrencyCode>
            </Payment>
            <PaymentMethod>COD</PaymentMethod>
          </PaymentExecutionDetailItem>
          <PaymentExecutionDetailItem>
            <Payment>
              <Amount>15.00</Amount>
              <CurrencyCode>USD</CurrencyCode>
            </Payment>
            <PaymentMethod>GC</PaymentMethod>
          </PaymentExecutionDetailItem>
        </PaymentExecutionDetail>
        <IsPrime>false</IsPrime>
      </Order>
      <Order>
        <AmazonOrderId>058-1233752-8214740</AmazonOrderId>
        <PurchaseDate>2017-02-05T00:06:07Z</PurchaseDate>
        <OrderStatus>Pending</OrderStatus>
        <FulfillmentChannel>AFN</FulfillmentChannel>
        <NumberOfItemsShipped></NumberOfItemsShipped>
        <IsPrime>true</IsPrime>
      </Order>
    </Orders>
  </ListOrdersResult>
  <ResponseMetadata>
    <RequestId>88faca76-b600-46d2-b53c-0c8c4533e43a</RequestId>
  </ResponseMetadata>
</ListOrdersResponse>
"#;

pub fn read_response(xml: &str) -> Result<ListOrdersResponse> {
    let reader = MwsXmlReader::new(xml)?;
    let mut response = ListOrdersResponse::default();
    response.read_fragment_from(&reader)?;
    Ok(response)
}
