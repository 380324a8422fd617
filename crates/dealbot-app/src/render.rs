//! Plain-text rendering for the terminal assistant.

use dealbot_chat::ChatController;
use dealbot_core::types::{ChatMessage, Product, Sender};

pub const TYPING_INDICATOR: &str = "Bot is typing...";

/// One chat bubble. Product messages render as cards instead.
pub fn render_message(message: &ChatMessage) -> Option<String> {
    let text = message.text()?;
    let line = match message.sender() {
        Sender::User => format!("  you > {}", text),
        Sender::Bot => format!("  bot > {}", text),
    };
    Some(line)
}

pub fn render_product(product: &Product) -> String {
    let mut card = format!("  [{}]", product.name);
    if let Some(category) = &product.category {
        card.push_str(&format!(" ({})", category));
    }
    card.push('\n');
    if product.has_amazon_price() {
        card.push_str(&format!("    Amazon:   {}\n", product.amazon_price));
    }
    if product.has_flipkart_price() {
        card.push_str(&format!("    Flipkart: {}\n", product.flipkart_price));
    }
    if !product.best_card.is_empty() {
        card.push_str(&format!("    Best card: {}\n", product.best_card));
    }
    if let Some(link) = &product.amazon_link {
        card.push_str(&format!("    View on Amazon:   {}\n", link));
    }
    if let Some(link) = &product.flipkart_link {
        card.push_str(&format!("    View on Flipkart: {}\n", link));
    }
    card
}

/// The whole screen: bubbles, typing indicator, then the product view.
pub fn render_view(ctrl: &ChatController) -> String {
    let mut out = String::new();
    for line in ctrl.messages().iter().filter_map(render_message) {
        out.push_str(&line);
        out.push('\n');
    }
    if ctrl.is_loading() {
        out.push_str(&format!("  {}\n", TYPING_INDICATOR));
    }

    let products = ctrl.products();
    out.push_str(&format!(
        "\n-- products ({}, filter: {}, sort: {}) --\n",
        products.len(),
        ctrl.filter(),
        ctrl.sort()
    ));
    for product in products {
        out.push_str(&render_product(product));
    }
    out
}

pub const HELP: &str = "\
Type a product to search for, or a command:
  /filter all|amazon|flipkart   restrict the product view
  /sort asc|desc|none           order the product view by price
  /voice                        search by voice
  /history                      show the whole conversation
  /help                         show this message
  /quit                         exit";

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            name: "iPhone 13".to_string(),
            amazon_price: "₹58,999".to_string(),
            flipkart_price: String::new(),
            best_card: "HDFC".to_string(),
            category: Some("Smartphones".to_string()),
            ..Product::default()
        }
    }

    #[test]
    fn test_render_text_messages() {
        assert_eq!(
            render_message(&ChatMessage::user("iPhone 13")).unwrap(),
            "  you > iPhone 13"
        );
        assert_eq!(
            render_message(&ChatMessage::bot_text("🔍 No products found.")).unwrap(),
            "  bot > 🔍 No products found."
        );
    }

    #[test]
    fn test_product_messages_are_not_bubbles() {
        assert!(render_message(&ChatMessage::bot_product(product())).is_none());
    }

    #[test]
    fn test_render_product_skips_missing_prices() {
        let card = render_product(&product());
        assert!(card.contains("[iPhone 13] (Smartphones)"));
        assert!(card.contains("Amazon:   ₹58,999"));
        assert!(!card.contains("Flipkart"));
        assert!(card.contains("Best card: HDFC"));
        assert!(!card.contains("View on"));
    }

    #[test]
    fn test_render_product_links() {
        let card = render_product(&Product {
            amazon_link: Some("https://www.amazon.in/s?k=iphone+13".to_string()),
            flipkart_link: Some("https://www.flipkart.com/search?q=iphone+13".to_string()),
            ..product()
        });
        assert!(card.contains("View on Amazon:   https://www.amazon.in/s?k=iphone+13"));
        assert!(card.contains("View on Flipkart: https://www.flipkart.com/search?q=iphone+13"));
    }
}
