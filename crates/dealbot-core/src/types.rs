use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DealbotError;

/// Longest query, in characters, accepted by the client and the provider.
pub const MAX_QUERY_LENGTH: usize = 256;

// =============================================================================
// Product
// =============================================================================

/// A product record as returned by the search provider.
///
/// Prices are currency-formatted strings (`"₹55,000"`), not numbers. A price
/// missing from the payload deserializes as an empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    #[serde(default)]
    pub amazon_price: String,
    #[serde(default)]
    pub flipkart_price: String,
    #[serde(default)]
    pub best_card: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amazon_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flipkart_link: Option<String>,
}

impl Product {
    pub fn has_amazon_price(&self) -> bool {
        !self.amazon_price.is_empty()
    }

    pub fn has_flipkart_price(&self) -> bool {
        !self.flipkart_price.is_empty()
    }
}

// =============================================================================
// Chat messages
// =============================================================================

/// Author of a chat entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One entry of the conversation log.
///
/// A bot entry carries either text or a product, never both and never
/// neither. The JSON form is the flat `{sender, text?, product?}` object;
/// payloads breaking the text-or-product rule are rejected on deserialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMessage", into = "RawMessage")]
pub enum ChatMessage {
    User { text: String },
    BotText { text: String },
    BotProduct { product: Product },
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        ChatMessage::User { text: text.into() }
    }

    pub fn bot_text(text: impl Into<String>) -> Self {
        ChatMessage::BotText { text: text.into() }
    }

    pub fn bot_product(product: Product) -> Self {
        ChatMessage::BotProduct { product }
    }

    pub fn sender(&self) -> Sender {
        match self {
            ChatMessage::User { .. } => Sender::User,
            ChatMessage::BotText { .. } | ChatMessage::BotProduct { .. } => Sender::Bot,
        }
    }

    /// Text body, if this entry is a text bubble (user or bot).
    pub fn text(&self) -> Option<&str> {
        match self {
            ChatMessage::User { text } | ChatMessage::BotText { text } => Some(text),
            ChatMessage::BotProduct { .. } => None,
        }
    }

    pub fn product(&self) -> Option<&Product> {
        match self {
            ChatMessage::BotProduct { product } => Some(product),
            _ => None,
        }
    }
}

/// Flat wire representation shared by storage and any JSON consumer.
#[derive(Serialize, Deserialize)]
struct RawMessage {
    sender: Sender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    product: Option<Product>,
}

impl TryFrom<RawMessage> for ChatMessage {
    type Error = String;

    fn try_from(raw: RawMessage) -> Result<Self, Self::Error> {
        match (raw.sender, raw.text, raw.product) {
            (Sender::User, Some(text), None) => Ok(ChatMessage::User { text }),
            (Sender::User, _, _) => Err("user message must carry text only".to_string()),
            (Sender::Bot, Some(text), None) => Ok(ChatMessage::BotText { text }),
            (Sender::Bot, None, Some(product)) => Ok(ChatMessage::BotProduct { product }),
            (Sender::Bot, Some(_), Some(_)) => {
                Err("bot message carries both text and product".to_string())
            }
            (Sender::Bot, None, None) => {
                Err("bot message carries neither text nor product".to_string())
            }
        }
    }
}

impl From<ChatMessage> for RawMessage {
    fn from(msg: ChatMessage) -> Self {
        match msg {
            ChatMessage::User { text } => RawMessage {
                sender: Sender::User,
                text: Some(text),
                product: None,
            },
            ChatMessage::BotText { text } => RawMessage {
                sender: Sender::Bot,
                text: Some(text),
                product: None,
            },
            ChatMessage::BotProduct { product } => RawMessage {
                sender: Sender::Bot,
                text: None,
                product: Some(product),
            },
        }
    }
}

// =============================================================================
// View state
// =============================================================================

/// Which marketplace the product view is restricted to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFilter {
    #[default]
    All,
    Amazon,
    Flipkart,
}

impl PlatformFilter {
    /// Whether a product passes this filter. Checks field presence only.
    pub fn accepts(&self, product: &Product) -> bool {
        match self {
            PlatformFilter::All => true,
            PlatformFilter::Amazon => product.has_amazon_price(),
            PlatformFilter::Flipkart => product.has_flipkart_price(),
        }
    }

    /// The price field used for sorting under this filter.
    pub fn sort_price<'a>(&self, product: &'a Product) -> &'a str {
        match self {
            PlatformFilter::Flipkart => &product.flipkart_price,
            PlatformFilter::All | PlatformFilter::Amazon => &product.amazon_price,
        }
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformFilter::All => write!(f, "all"),
            PlatformFilter::Amazon => write!(f, "amazon"),
            PlatformFilter::Flipkart => write!(f, "flipkart"),
        }
    }
}

impl FromStr for PlatformFilter {
    type Err = DealbotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(PlatformFilter::All),
            "amazon" => Ok(PlatformFilter::Amazon),
            "flipkart" => Ok(PlatformFilter::Flipkart),
            other => Err(DealbotError::Config(format!(
                "Invalid platform filter '{}'. Must be one of: all, amazon, flipkart",
                other
            ))),
        }
    }
}

/// Price ordering applied to the product view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    PriceAsc,
    PriceDesc,
    #[default]
    None,
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortBy::PriceAsc => write!(f, "priceAsc"),
            SortBy::PriceDesc => write!(f, "priceDesc"),
            SortBy::None => write!(f, "none"),
        }
    }
}

impl FromStr for SortBy {
    type Err = DealbotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "priceasc" => Ok(SortBy::PriceAsc),
            "desc" | "pricedesc" => Ok(SortBy::PriceDesc),
            "none" => Ok(SortBy::None),
            other => Err(DealbotError::Config(format!(
                "Invalid sort order '{}'. Must be one of: asc, desc, none",
                other
            ))),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn iphone() -> Product {
        Product {
            name: "iPhone 13".to_string(),
            amazon_price: "₹58,999".to_string(),
            flipkart_price: "₹59,999".to_string(),
            best_card: "HDFC Bank Credit Card".to_string(),
            ..Product::default()
        }
    }

    #[test]
    fn test_product_camel_case_fields() {
        let json = serde_json::to_value(iphone()).unwrap();
        assert_eq!(json["amazonPrice"], "₹58,999");
        assert_eq!(json["flipkartPrice"], "₹59,999");
        assert_eq!(json["bestCard"], "HDFC Bank Credit Card");
        // Absent optionals are omitted entirely.
        assert!(json.get("image").is_none());
        assert!(json.get("amazonLink").is_none());
    }

    #[test]
    fn test_product_missing_prices_default_to_empty() {
        let product: Product = serde_json::from_str(r#"{"name":"Pixel 7"}"#).unwrap();
        assert_eq!(product.name, "Pixel 7");
        assert!(!product.has_amazon_price());
        assert!(!product.has_flipkart_price());
        assert!(product.best_card.is_empty());
    }

    #[test]
    fn test_user_message_wire_format() {
        let msg = ChatMessage::user("Find best deal for iPhone 13");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"sender":"user","text":"Find best deal for iPhone 13"}"#
        );
    }

    #[test]
    fn test_bot_product_wire_format() {
        let msg = ChatMessage::bot_product(iphone());
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["sender"], "bot");
        assert!(value.get("text").is_none());
        assert_eq!(value["product"]["name"], "iPhone 13");
    }

    #[test]
    fn test_bot_message_with_both_fields_is_rejected() {
        let json = r#"{"sender":"bot","text":"hi","product":{"name":"x"}}"#;
        let result: Result<ChatMessage, _> = serde_json::from_str(json);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("both"));
    }

    #[test]
    fn test_bot_message_with_neither_field_is_rejected() {
        let result: Result<ChatMessage, _> = serde_json::from_str(r#"{"sender":"bot"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_user_message_with_product_is_rejected() {
        let json = r#"{"sender":"user","product":{"name":"x"}}"#;
        let result: Result<ChatMessage, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_sender_is_rejected() {
        let result: Result<ChatMessage, _> =
            serde_json::from_str(r#"{"sender":"system","text":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_message_accessors() {
        let user = ChatMessage::user("hello");
        assert_eq!(user.sender(), Sender::User);
        assert_eq!(user.text(), Some("hello"));
        assert!(user.product().is_none());

        let bot = ChatMessage::bot_product(iphone());
        assert_eq!(bot.sender(), Sender::Bot);
        assert!(bot.text().is_none());
        assert_eq!(bot.product().map(|p| p.name.as_str()), Some("iPhone 13"));
    }

    #[test]
    fn test_platform_filter_accepts_on_presence() {
        let mut product = iphone();
        product.flipkart_price = String::new();
        product.amazon_price = "N/A".to_string();

        assert!(PlatformFilter::All.accepts(&product));
        // Presence, not numeric validity.
        assert!(PlatformFilter::Amazon.accepts(&product));
        assert!(!PlatformFilter::Flipkart.accepts(&product));
    }

    #[test]
    fn test_sort_price_field_selection() {
        let product = iphone();
        assert_eq!(PlatformFilter::All.sort_price(&product), "₹58,999");
        assert_eq!(PlatformFilter::Amazon.sort_price(&product), "₹58,999");
        assert_eq!(PlatformFilter::Flipkart.sort_price(&product), "₹59,999");
    }

    #[test]
    fn test_filter_and_sort_parse() {
        assert_eq!("Amazon".parse::<PlatformFilter>().unwrap(), PlatformFilter::Amazon);
        assert_eq!(" flipkart ".parse::<PlatformFilter>().unwrap(), PlatformFilter::Flipkart);
        assert!("ebay".parse::<PlatformFilter>().is_err());

        assert_eq!("asc".parse::<SortBy>().unwrap(), SortBy::PriceAsc);
        assert_eq!("priceDesc".parse::<SortBy>().unwrap(), SortBy::PriceDesc);
        assert_eq!("none".parse::<SortBy>().unwrap(), SortBy::None);
        assert!("cheapest".parse::<SortBy>().is_err());
    }

    #[test]
    fn test_view_state_defaults_and_display() {
        assert_eq!(PlatformFilter::default(), PlatformFilter::All);
        assert_eq!(SortBy::default(), SortBy::None);
        assert_eq!(PlatformFilter::Flipkart.to_string(), "flipkart");
        assert_eq!(SortBy::PriceAsc.to_string(), "priceAsc");
        assert_eq!(
            serde_json::to_string(&SortBy::PriceDesc).unwrap(),
            r#""priceDesc""#
        );
    }
}
